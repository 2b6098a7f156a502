// Copyright (c) 2025 - Cowboy AI, Inc.
//! Simplified Simulation Spec Validation
//!
//! Parses the hand-written (or auto-generated) simplified spec into validated
//! [`SimNodeSpec`] and [`AttachmentSpec`] records.
//!
//! # Accepted shapes
//!
//! ```yaml
//! simNodes: [...]              # bare
//! topology: [...]
//! ---
//! spec: {simNodes: [...], topology: [...]}            # wrapped
//! ---
//! items: [{spec: {simNodes: [...], topology: [...]}}] # list (first item only)
//! ```
//!
//! # Rules
//!
//! - `simNodes` is a non-empty list of mappings with unique `name` and an `image`
//! - `type` defaults to `linux`
//! - `topology` is a non-empty list; every `simNode` must name a known node
//! - `simNodeInterface` defaults to the fabric `interface`
//! - VLANs may be strings or integers and are kept as strings

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{AttachError, AttachResult};

/// Fields a node may set on the rendered SimNode spec, at top level or under `spec`
pub const SIMNODE_ALLOWED_FIELDS: [&str; 13] = [
    "component",
    "containerImage",
    "dhcp",
    "imagePullSecret",
    "license",
    "operatingSystem",
    "platform",
    "platformPath",
    "port",
    "serialNumberPath",
    "version",
    "versionMatch",
    "versionPath",
];

/// Node type assumed when `type` is omitted
pub const DEFAULT_SPEC_NODE_TYPE: &str = "linux";

/// A validated simulated device
#[derive(Debug, Clone, PartialEq)]
pub struct SimNodeSpec {
    pub name: String,
    pub image: String,
    pub node_type: String,
    pub vlan: Option<String>,
    pub ip_address: Option<String>,
    pub interface: Option<String>,
    pub gateway: Option<String>,
    pub labels: BTreeMap<String, String>,
    /// `Some` whenever the node carries an `annotations` mapping, even empty
    pub annotations: Option<BTreeMap<String, String>>,
    /// Allow-listed fields given at the node's top level
    pub passthrough: Map<String, Value>,
    /// Allow-listed fields given under the node's `spec`
    pub overrides: Map<String, Value>,
}

impl SimNodeSpec {
    /// Minimal node, mostly for tests and programmatic construction
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            node_type: DEFAULT_SPEC_NODE_TYPE.to_string(),
            vlan: None,
            ip_address: None,
            interface: None,
            gateway: None,
            labels: BTreeMap::new(),
            annotations: None,
            passthrough: Map::new(),
            overrides: Map::new(),
        }
    }

    fn from_entry(entry: &Map<String, Value>, name: String, image: String, node_type: String) -> Self {
        Self {
            vlan: first_scalar(entry, &["vlan", "vlanId"]),
            ip_address: first_scalar(entry, &["ipAddress", "ip"]),
            interface: first_text(entry, &["interface", "simInterface"]),
            gateway: first_text(entry, &["gateway"]),
            labels: entry.get("labels").map(string_map).unwrap_or_default(),
            annotations: entry
                .get("annotations")
                .filter(|value| value.is_object())
                .map(string_map),
            passthrough: allowed_fields(entry),
            overrides: entry
                .get("spec")
                .and_then(Value::as_object)
                .map(allowed_fields)
                .unwrap_or_default(),
            name,
            image,
            node_type,
        }
    }
}

/// A validated fabric-to-device attachment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentSpec {
    pub fabric_node: String,
    pub fabric_interface: String,
    pub sim_node: String,
    pub sim_interface: String,
    pub vlan: Option<String>,
}

/// Validated nodes in declaration order plus their attachments
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSpec {
    pub nodes: Vec<SimNodeSpec>,
    pub attachments: Vec<AttachmentSpec>,
}

impl SimulationSpec {
    /// Attachments of one node in declaration order
    pub fn attachments_for<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a AttachmentSpec> {
        self.attachments
            .iter()
            .filter(move |attachment| attachment.sim_node == node)
    }
}

/// Validate a simplified spec document
pub fn parse_simulation_spec(raw: &Value) -> AttachResult<SimulationSpec> {
    let base = spec_body(raw)?;

    let nodes = parse_sim_nodes(ensure_list(base.get("simNodes"), "simNodes")?)?;
    let attachments = parse_attachments(ensure_list(base.get("topology"), "topology")?, &nodes)?;

    Ok(SimulationSpec { nodes, attachments })
}

/// Read a YAML spec file whose root must be a mapping
pub fn read_spec_file(path: &Path) -> AttachResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => {
            AttachError::Io(format!("YAML file not found: {}", path.display()))
        }
        _ => AttachError::from(err),
    })?;

    if text.trim().is_empty() {
        return Err(AttachError::spec(format!("YAML file {} is empty", path.display())));
    }

    let document: Value = serde_yaml::from_str(&text)?;
    match document {
        Value::Null => Err(AttachError::spec(format!("YAML file {} is empty", path.display()))),
        Value::Object(_) => Ok(document),
        _ => Err(AttachError::spec(format!(
            "YAML file {} must contain a mapping at its root",
            path.display()
        ))),
    }
}

fn spec_body(raw: &Value) -> AttachResult<&Map<String, Value>> {
    let root = raw
        .as_object()
        .ok_or_else(|| AttachError::spec("Simulation spec must be a mapping"))?;

    if let Some(items) = root.get("items") {
        let first = items
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| AttachError::spec("'items' must contain at least one entry"))?;
        return first
            .get("spec")
            .and_then(Value::as_object)
            .ok_or_else(|| AttachError::spec("items[0].spec must be a mapping"));
    }

    Ok(root.get("spec").and_then(Value::as_object).unwrap_or(root))
}

fn ensure_list<'a>(value: Option<&'a Value>, key: &str) -> AttachResult<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(AttachError::spec(format!(
            "Expected list for '{key}', got {}",
            type_name(other)
        ))),
    }
}

fn parse_sim_nodes(entries: &[Value]) -> AttachResult<Vec<SimNodeSpec>> {
    let mut nodes: Vec<SimNodeSpec> = Vec::with_capacity(entries.len());

    for entry in entries {
        let entry = entry
            .as_object()
            .ok_or_else(|| AttachError::spec("Entries under 'simNodes' must be mappings"))?;

        let name = non_blank(entry.get("name"))
            .ok_or_else(|| AttachError::spec("Each simNode requires a string 'name'"))?;
        if nodes.iter().any(|node| node.name == name) {
            return Err(AttachError::spec(format!(
                "Duplicate simNode name '{name}' detected"
            )));
        }
        let image = non_blank(entry.get("image"))
            .ok_or_else(|| AttachError::spec(format!("simNode '{name}' requires a string 'image'")))?;
        let node_type = match entry.get("type") {
            None => DEFAULT_SPEC_NODE_TYPE.to_string(),
            Some(value) => non_blank(Some(value))
                .ok_or_else(|| AttachError::spec(format!("simNode '{name}' requires a valid 'type'")))?,
        };

        nodes.push(SimNodeSpec::from_entry(entry, name, image, node_type));
    }

    if nodes.is_empty() {
        return Err(AttachError::spec("At least one simNode must be provided"));
    }
    Ok(nodes)
}

fn parse_attachments(entries: &[Value], nodes: &[SimNodeSpec]) -> AttachResult<Vec<AttachmentSpec>> {
    let mut attachments = Vec::with_capacity(entries.len());

    for entry in entries {
        let entry = entry
            .as_object()
            .ok_or_else(|| AttachError::spec("Entries under 'topology' must be mappings"))?;

        let fabric_node = non_blank(entry.get("node"));
        let fabric_interface = non_blank(entry.get("interface"));
        let sim_node = non_blank(entry.get("simNode"));
        let sim_interface = non_blank(entry.get("simNodeInterface")).or_else(|| fabric_interface.clone());

        let (Some(fabric_node), Some(fabric_interface), Some(sim_node), Some(sim_interface)) =
            (fabric_node, fabric_interface, sim_node, sim_interface)
        else {
            return Err(AttachError::spec(
                "Topology entries require node/interface pairs on both fabric and sim sides",
            ));
        };

        if !nodes.iter().any(|node| node.name == sim_node) {
            let mut known: Vec<&str> = nodes.iter().map(|node| node.name.as_str()).collect();
            known.sort_unstable();
            let known = if known.is_empty() {
                "<none>".to_string()
            } else {
                known.join(", ")
            };
            return Err(AttachError::spec(format!(
                "Topology entry references unknown simNode '{sim_node}'. Available simNodes: {known}"
            )));
        }

        attachments.push(AttachmentSpec {
            fabric_node,
            fabric_interface,
            sim_node,
            sim_interface,
            vlan: first_scalar(entry, &["vlan", "vlanId"]),
        });
    }

    if attachments.is_empty() {
        return Err(AttachError::spec(
            "At least one topology attachment must be provided",
        ));
    }
    Ok(attachments)
}

/// Trimmed string that is not blank
fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// First key holding a non-empty string or an integer, as text
fn first_scalar(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match entry.get(*key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        _ => None,
    })
}

/// First key holding a non-blank string, untrimmed
fn first_text(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        entry
            .get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    })
}

/// Mapping values rendered as strings; nulls dropped
fn string_map(value: &Value) -> BTreeMap<String, String> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Allow-listed, non-null fields in source order
fn allowed_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(key, value)| SIMNODE_ALLOWED_FIELDS.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manifest Rendering
//!
//! Turns a validated [`SimulationSpec`] into a multi-document manifest bundle
//! plus the in-pod interface configuration each device needs.
//!
//! # Bundle layout
//!
//! ```text
//! SimNode  (one per node, declaration order)
//! ---
//! SimLink  (one per attachment)
//! ---
//! TopoLink (one per attachment, edge role)
//! ```
//!
//! SimLink and TopoLink share the name `<node>-<interface>-<simnode>` built from
//! slugified parts, so re-rendering the same spec always yields the same names.

use serde_json::{json, Map, Value};

use crate::domain::{interface_resource, link_name};
use crate::errors::AttachResult;
use crate::resources::ResourceKind;
use crate::spec::{AttachmentSpec, SimNodeSpec, SimulationSpec};

/// API group/version of every rendered resource
pub const API_VERSION: &str = "core.eda.nokia.com/v1";

/// Label marking resources owned by a simulation topology
pub const SIMTOPOLOGY_LABEL: &str = "eda.nokia.com/simtopology";

/// Role label carried by rendered TopoLinks
pub const ROLE_LABEL: &str = "eda.nokia.com/role";

/// Management port Linux simulation nodes listen on
pub const LINUX_DEFAULT_PORT: u16 = 57400;

/// Kind and name of one rendered resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub kind: ResourceKind,
    pub name: String,
}

/// Address assignment to push into a simulation pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInterfaceConfig {
    /// Device name, also the container name inside the pod
    pub name: String,
    pub interface: String,
    pub ip_address: String,
    pub vlan: Option<String>,
    pub gateway: Option<String>,
}

impl NodeInterfaceConfig {
    /// Interface the address lands on: `<iface>.<vlan>` or the bare interface
    pub fn target_interface(&self) -> String {
        match &self.vlan {
            Some(vlan) => format!("{}.{vlan}", self.interface),
            None => self.interface.clone(),
        }
    }
}

/// Everything produced by one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBundle {
    pub manifest_text: String,
    pub documents: Vec<Value>,
    pub summaries: Vec<ResourceSummary>,
    pub node_configs: Vec<NodeInterfaceConfig>,
    /// Device names in render order
    pub sim_nodes: Vec<String>,
}

impl RenderedBundle {
    /// Summaries grouped by kind, kinds in first-seen order
    pub fn grouped_summaries(&self) -> Vec<(ResourceKind, Vec<String>)> {
        let mut grouped: Vec<(ResourceKind, Vec<String>)> = Vec::new();
        for summary in &self.summaries {
            match grouped.iter_mut().find(|(kind, _)| *kind == summary.kind) {
                Some((_, names)) => names.push(summary.name.clone()),
                None => grouped.push((summary.kind, vec![summary.name.clone()])),
            }
        }
        grouped
    }
}

/// Render every node and attachment of `spec` into `namespace`
pub fn render_bundle(spec: &SimulationSpec, namespace: &str) -> AttachResult<RenderedBundle> {
    let mut documents = Vec::new();
    let mut summaries = Vec::new();
    let mut node_configs = Vec::new();

    for node in &spec.nodes {
        let attachments: Vec<&AttachmentSpec> = spec.attachments_for(&node.name).collect();
        let (document, config) = render_sim_node(node, namespace, &attachments);
        documents.push(document);
        summaries.push(ResourceSummary {
            kind: ResourceKind::SimNode,
            name: node.name.clone(),
        });
        node_configs.extend(config);
    }

    for attachment in &spec.attachments {
        documents.push(render_sim_link(attachment, namespace));
        summaries.push(ResourceSummary {
            kind: ResourceKind::SimLink,
            name: attachment_link_name(attachment),
        });
    }

    for attachment in &spec.attachments {
        documents.push(render_topo_link(attachment, namespace));
        summaries.push(ResourceSummary {
            kind: ResourceKind::TopoLink,
            name: attachment_link_name(attachment),
        });
    }

    let rendered = documents
        .iter()
        .map(|document| serde_yaml::to_string(document).map(|text| text.trim_end().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let manifest_text = format!("{}\n", rendered.join("\n---\n"));

    Ok(RenderedBundle {
        manifest_text,
        documents,
        summaries,
        node_configs,
        sim_nodes: spec.nodes.iter().map(|node| node.name.clone()).collect(),
    })
}

fn attachment_link_name(attachment: &AttachmentSpec) -> String {
    link_name(
        &attachment.fabric_node,
        &attachment.fabric_interface,
        &attachment.sim_node,
    )
}

fn render_sim_node(
    node: &SimNodeSpec,
    namespace: &str,
    attachments: &[&AttachmentSpec],
) -> (Value, Option<NodeInterfaceConfig>) {
    let vlan = node
        .vlan
        .clone()
        .or_else(|| attachments.iter().find_map(|attachment| attachment.vlan.clone()));
    let interface = node
        .interface
        .clone()
        .or_else(|| attachments.first().map(|attachment| attachment.sim_interface.clone()));

    let mut labels = Map::new();
    labels.insert(SIMTOPOLOGY_LABEL.to_string(), json!("true"));
    for (key, value) in &node.labels {
        labels.insert(key.clone(), json!(value));
    }
    labels.insert(SIMTOPOLOGY_LABEL.to_string(), json!("true"));

    let mut metadata = Map::new();
    metadata.insert("name".to_string(), json!(node.name));
    metadata.insert("namespace".to_string(), json!(namespace));
    metadata.insert("labels".to_string(), Value::Object(labels));
    if let Some(annotations) = &node.annotations {
        metadata.insert("annotations".to_string(), json!(annotations));
    }

    let operating_system = node.node_type.to_lowercase();
    let mut spec = Map::new();
    spec.insert("containerImage".to_string(), json!(node.image));
    spec.insert("operatingSystem".to_string(), json!(operating_system));
    spec.insert("dhcp".to_string(), json!({}));
    if operating_system == "linux" {
        spec.insert("port".to_string(), json!(LINUX_DEFAULT_PORT));
        spec.insert("serialNumberPath".to_string(), json!(""));
        spec.insert("versionPath".to_string(), json!(""));
    }
    for (key, value) in node.passthrough.iter().chain(node.overrides.iter()) {
        spec.insert(key.clone(), value.clone());
    }
    // Canonical fields always reflect the node itself.
    spec.insert("containerImage".to_string(), json!(node.image));
    spec.insert("operatingSystem".to_string(), json!(operating_system));

    let document = json!({
        "apiVersion": API_VERSION,
        "kind": ResourceKind::SimNode.kind(),
        "metadata": metadata,
        "spec": spec,
    });

    let config = match (interface, &node.ip_address) {
        (Some(interface), Some(ip_address)) => Some(NodeInterfaceConfig {
            name: node.name.clone(),
            interface,
            ip_address: ip_address.clone(),
            vlan,
            gateway: node.gateway.clone(),
        }),
        _ => None,
    };

    (document, config)
}

fn link_metadata(name: String, namespace: &str, extra_labels: &[(&str, &str)]) -> Value {
    let mut labels = Map::new();
    for (key, value) in extra_labels {
        labels.insert(key.to_string(), json!(value));
    }
    labels.insert(SIMTOPOLOGY_LABEL.to_string(), json!("true"));

    json!({
        "name": name,
        "namespace": namespace,
        "labels": labels,
    })
}

fn endpoint(node: &str, interface: &str) -> Value {
    json!({
        "node": node,
        "interface": interface,
        "interfaceResource": interface_resource(node, interface),
    })
}

fn render_sim_link(attachment: &AttachmentSpec, namespace: &str) -> Value {
    json!({
        "apiVersion": API_VERSION,
        "kind": ResourceKind::SimLink.kind(),
        "metadata": link_metadata(attachment_link_name(attachment), namespace, &[]),
        "spec": {
            "links": [{
                "local": endpoint(&attachment.fabric_node, &attachment.fabric_interface),
                "sim": endpoint(&attachment.sim_node, &attachment.sim_interface),
            }],
        },
    })
}

fn render_topo_link(attachment: &AttachmentSpec, namespace: &str) -> Value {
    json!({
        "apiVersion": API_VERSION,
        "kind": ResourceKind::TopoLink.kind(),
        "metadata": link_metadata(
            attachment_link_name(attachment),
            namespace,
            &[(ROLE_LABEL, "edge")],
        ),
        "spec": {
            "links": [{
                "type": "edge",
                "local": endpoint(&attachment.fabric_node, &attachment.fabric_interface),
                "remote": endpoint(&attachment.sim_node, &attachment.sim_interface),
            }],
        },
    })
}

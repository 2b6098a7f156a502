// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed Views over Cluster Documents
//!
//! Cluster resources arrive as schemaless JSON documents. Each view here pulls
//! out only the fields this crate reads, through total extraction functions:
//! a missing or wrongly typed optional field becomes `None` or an empty list,
//! and a document without the fields a view needs yields no view at all.
//! Nothing in this module fails.
//!
//! # Views
//!
//! - [`VirtualNetworkView`] - `spec.vlans[]` and `spec.irbInterfaces[]`
//! - [`InterfaceView`] - labels and the first `spec.members[]` endpoint
//! - [`TopoNodeView`] / [`TopoLinkView`] - existing fabric inventory

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

/// Name used for a VirtualNetwork document without `metadata.name`
pub const UNNAMED_VIRTUAL_NETWORK: &str = "virtualnetwork";

/// Resource kinds this crate reads or renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    VirtualNetwork,
    Interface,
    TopoNode,
    TopoLink,
    SimNode,
    SimLink,
}

impl ResourceKind {
    /// Resource name as understood by `kubectl get`
    pub fn resource(&self) -> &'static str {
        match self {
            ResourceKind::VirtualNetwork => "virtualnetwork",
            ResourceKind::Interface => "interface",
            ResourceKind::TopoNode => "toponodes",
            ResourceKind::TopoLink => "topolinks",
            ResourceKind::SimNode => "simnode",
            ResourceKind::SimLink => "simlink",
        }
    }

    /// Kind as written in a manifest
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::VirtualNetwork => "VirtualNetwork",
            ResourceKind::Interface => "Interface",
            ResourceKind::TopoNode => "TopoNode",
            ResourceKind::TopoLink => "TopoLink",
            ResourceKind::SimNode => "SimNode",
            ResourceKind::SimLink => "SimLink",
        }
    }

    /// Singular resource name used when checking a rendered object still exists
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::TopoNode => "toponode",
            ResourceKind::TopoLink => "topolink",
            other => other.resource(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A typed view extracted from one cluster document
pub trait ResourceView: Sized {
    const KIND: ResourceKind;

    /// Extract the view, or `None` when the document lacks what the view needs
    fn from_document(document: &Value) -> Option<Self>;
}

/// Extract every document that yields a view, in input order
pub fn views<V: ResourceView>(documents: &[Value]) -> Vec<V> {
    documents.iter().filter_map(V::from_document).collect()
}

/// Fabric side of an attachment: a physical node and one of its ports
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FabricEndpoint {
    pub node: String,
    pub interface: String,
}

/// Interface resource: labels plus the endpoint of its first member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceView {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    /// `None` when there are no members or the first one is malformed
    pub endpoint: Option<FabricEndpoint>,
}

impl ResourceView for InterfaceView {
    const KIND: ResourceKind = ResourceKind::Interface;

    fn from_document(document: &Value) -> Option<Self> {
        let name = metadata_name(document)?;
        let endpoint = document
            .pointer("/spec/members")
            .and_then(Value::as_array)
            .and_then(|members| members.first())
            .and_then(|member| {
                let node = member.get("node")?.as_str()?;
                let interface = member.get("interface")?.as_str()?;
                Some(FabricEndpoint {
                    node: node.to_string(),
                    interface: interface.to_string(),
                })
            });

        Some(Self {
            name,
            labels: string_labels(document),
            endpoint,
        })
    }
}

/// One `spec.vlans[]` entry of a VirtualNetwork
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanEntry {
    pub name: Option<String>,
    pub selectors: Vec<String>,
    pub bridge_domain: Option<String>,
    pub vlan_id: Option<String>,
}

/// One address of an IRB interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrbAddress {
    pub prefix: String,
    pub primary: bool,
}

/// One `spec.irbInterfaces[]` entry with a bridge domain and address list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrbEntry {
    pub bridge_domain: String,
    pub addresses: Vec<IrbAddress>,
}

/// VirtualNetwork resource: VLAN slices and the IRB interfaces that route them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNetworkView {
    pub name: String,
    pub vlans: Vec<VlanEntry>,
    pub irb_interfaces: Vec<IrbEntry>,
}

impl ResourceView for VirtualNetworkView {
    const KIND: ResourceKind = ResourceKind::VirtualNetwork;

    fn from_document(document: &Value) -> Option<Self> {
        let spec = document.get("spec")?.as_object()?;
        let name =
            metadata_name(document).unwrap_or_else(|| UNNAMED_VIRTUAL_NETWORK.to_string());

        let vlans = spec
            .get("vlans")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(vlan_entry).collect())
            .unwrap_or_default();

        let irb_interfaces = spec
            .get("irbInterfaces")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(irb_entry).collect())
            .unwrap_or_default();

        Some(Self {
            name,
            vlans,
            irb_interfaces,
        })
    }
}

fn vlan_entry(entry: &Value) -> Option<VlanEntry> {
    let entry = entry.as_object()?;
    let empty = Map::new();
    let spec = entry.get("spec").and_then(Value::as_object).unwrap_or(&empty);

    let selectors = match spec.get("interfaceSelector") {
        Some(Value::String(selector)) => vec![selector.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    // A zero or false `vlanID` counts as unset and falls through to `vlanId`.
    let vlan_id = ["vlanID", "vlanId"]
        .iter()
        .find_map(|key| spec.get(*key).filter(|value| is_set(value)).and_then(scalar_string));

    Some(VlanEntry {
        name: entry.get("name").and_then(non_empty_str),
        selectors,
        bridge_domain: spec
            .get("bridgeDomain")
            .and_then(Value::as_str)
            .map(str::to_string),
        vlan_id,
    })
}

fn irb_entry(entry: &Value) -> Option<IrbEntry> {
    let spec = entry.get("spec")?.as_object()?;
    let bridge_domain = spec.get("bridgeDomain")?.as_str()?.to_string();
    let addresses = spec
        .get("ipAddresses")?
        .as_array()?
        .iter()
        .filter_map(|address| {
            let ipv4 = address.get("ipv4Address")?.as_object()?;
            let prefix = ipv4.get("ipPrefix")?.as_str()?.to_string();
            let primary = is_true(address.get("primary")) || is_true(ipv4.get("primary"));
            Some(IrbAddress { prefix, primary })
        })
        .collect();

    Some(IrbEntry {
        bridge_domain,
        addresses,
    })
}

/// TopoNode resource: a fabric node already known to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoNodeView {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl ResourceView for TopoNodeView {
    const KIND: ResourceKind = ResourceKind::TopoNode;

    fn from_document(document: &Value) -> Option<Self> {
        let name = metadata_name(document)?;
        Some(Self {
            labels: string_labels(document),
            name,
        })
    }
}

/// TopoLink resource: the endpoints of every link it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoLinkView {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    /// `local` endpoints in declaration order
    pub local: Vec<FabricEndpoint>,
}

impl ResourceView for TopoLinkView {
    const KIND: ResourceKind = ResourceKind::TopoLink;

    fn from_document(document: &Value) -> Option<Self> {
        let name = metadata_name(document)?;
        let local = document
            .pointer("/spec/links")
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| {
                        let local = link.get("local")?;
                        Some(FabricEndpoint {
                            node: local.get("node")?.as_str()?.to_string(),
                            interface: local.get("interface")?.as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            labels: string_labels(document),
            name,
            local,
        })
    }
}

/// Non-empty `metadata.name`
pub fn metadata_name(document: &Value) -> Option<String> {
    document.pointer("/metadata/name").and_then(non_empty_str)
}

/// `metadata.labels` with scalar values rendered as strings
pub fn string_labels(document: &Value) -> BTreeMap<String, String> {
    document
        .pointer("/metadata/labels")
        .and_then(Value::as_object)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(key, value)| scalar_string(value).map(|v| (key.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

/// String or number as text; `None` for empty strings, null and containers
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Whether a scalar carries a value: zero, `false` and `""` do not
fn is_set(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        _ => false,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

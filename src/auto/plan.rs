// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attachment Merge, Renaming and Plan Assembly
//!
//! # Merge
//!
//! Attachments are grouped by Interface resource name so each physical port
//! yields one logical attachment. The primary of a group is the first after
//! sorting on:
//!
//! 1. has an allocated address (with address first)
//! 2. VLAN id, compared as text (missing sorts as empty)
//! 3. VirtualNetwork name
//!
//! # Rename
//!
//! Merged attachments are sorted by
//! `(fabric node, fabric port, virtual network, vlan name, interface name)` and
//! devices are renamed `server1`, `server2`, ... in that order, the first
//! occurrence of a prior name fixing its new one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collect::{AutoAttachment, SimDeviceRecord};
use super::DEFAULT_SIM_INTERFACE;
use crate::errors::AttachResult;

/// Prefix of renamed simulated devices
pub const SERVER_PREFIX: &str = "server";

/// Keep one primary attachment per Interface resource
pub fn merge_attachments(
    devices: &mut BTreeMap<String, SimDeviceRecord>,
    attachments: Vec<AutoAttachment>,
) -> Vec<AutoAttachment> {
    let mut grouped: BTreeMap<String, Vec<AutoAttachment>> = BTreeMap::new();
    for attachment in attachments {
        grouped
            .entry(attachment.interface_name.clone())
            .or_default()
            .push(attachment);
    }

    grouped
        .into_values()
        .filter_map(|mut group| {
            group.sort_by(|a, b| {
                let key = |att: &AutoAttachment| {
                    (
                        att.ip_address.is_none(),
                        att.vlan_id.clone().unwrap_or_default(),
                        att.virtual_network.clone(),
                    )
                };
                key(a).cmp(&key(b))
            });
            let primary = group.into_iter().next()?;
            if let Some(device) = devices.get_mut(&primary.sim_name) {
                device.absorb(primary.vlan_id.as_deref(), primary.ip_address, None);
            }
            Some(primary)
        })
        .collect()
}

/// Renumber devices `server1..N` in canonical attachment order
pub fn rename_servers(
    devices: &BTreeMap<String, SimDeviceRecord>,
    mut attachments: Vec<AutoAttachment>,
) -> (Vec<SimDeviceRecord>, Vec<AutoAttachment>) {
    attachments.sort_by(|a, b| {
        (
            &a.fabric_node,
            &a.fabric_interface,
            &a.virtual_network,
            &a.vlan_name,
            &a.interface_name,
        )
            .cmp(&(
                &b.fabric_node,
                &b.fabric_interface,
                &b.virtual_network,
                &b.vlan_name,
                &b.interface_name,
            ))
    });

    let mut name_map: BTreeMap<String, String> = BTreeMap::new();
    let mut renamed_devices = Vec::new();

    for attachment in &mut attachments {
        let new_name = match name_map.get(&attachment.sim_name) {
            Some(name) => name.clone(),
            None => {
                let name = format!("{SERVER_PREFIX}{}", name_map.len() + 1);
                name_map.insert(attachment.sim_name.clone(), name.clone());

                let mut device = devices
                    .get(&attachment.sim_name)
                    .cloned()
                    .unwrap_or_else(|| SimDeviceRecord::new(name.clone()));
                device.name = name.clone();
                renamed_devices.push(device);
                name
            }
        };
        attachment.sim_name = new_name;
    }

    (renamed_devices, attachments)
}

/// A `simNodes[]` entry of a generated spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSimNode {
    pub name: String,
    pub image: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

impl From<SimDeviceRecord> for PlannedSimNode {
    fn from(record: SimDeviceRecord) -> Self {
        Self {
            name: record.name,
            image: record.image,
            node_type: record.node_type,
            interface: record.interface,
            vlan: record.vlan,
            ip_address: record.ip_address.map(|ip| ip.to_string()),
            gateway: record.gateway.map(|gw| gw.to_string()),
        }
    }
}

/// A `topology[]` entry of a generated spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedAttachment {
    pub node: String,
    pub interface: String,
    pub sim_node: String,
    pub sim_node_interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
}

impl From<&AutoAttachment> for PlannedAttachment {
    fn from(attachment: &AutoAttachment) -> Self {
        Self {
            node: attachment.fabric_node.clone(),
            interface: attachment.fabric_interface.clone(),
            sim_node: attachment.sim_name.clone(),
            sim_node_interface: DEFAULT_SIM_INTERFACE.to_string(),
            vlan: attachment.vlan_id.clone().filter(|v| !v.is_empty()),
        }
    }
}

/// Simplified spec synthesized from cluster resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSpec {
    pub sim_nodes: Vec<PlannedSimNode>,
    pub topology: Vec<PlannedAttachment>,
}

/// Generated spec plus the attachments it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPlan {
    pub spec: PlannedSpec,
    pub attachments: Vec<AutoAttachment>,
}

impl AutoPlan {
    /// Assemble a plan from renamed devices and attachments
    pub fn new(devices: Vec<SimDeviceRecord>, attachments: Vec<AutoAttachment>) -> Self {
        let spec = PlannedSpec {
            sim_nodes: devices.into_iter().map(PlannedSimNode::from).collect(),
            topology: attachments.iter().map(PlannedAttachment::from).collect(),
        };
        Self { spec, attachments }
    }

    pub fn sim_node_names(&self) -> Vec<&str> {
        self.spec
            .sim_nodes
            .iter()
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Generated spec as a document accepted by the spec validator
    pub fn to_document(&self) -> AttachResult<Value> {
        Ok(serde_json::to_value(&self.spec)?)
    }

    /// Generated spec as YAML
    pub fn to_yaml(&self) -> AttachResult<String> {
        Ok(serde_yaml::to_string(&self.spec)?)
    }
}

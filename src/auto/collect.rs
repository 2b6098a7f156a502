// Copyright (c) 2025 - Cowboy AI, Inc.
//! Auto-Attachment Collection
//!
//! Cross-products every VLAN definition of every VirtualNetwork against the
//! discovered Interface resources. Each selected interface with a usable fabric
//! endpoint becomes an [`AutoAttachment`] and seeds a [`SimDeviceRecord`].
//!
//! # Invariants
//!
//! - `(vlan_name, interface_name)` pairs are unique; the first match wins
//! - Interfaces without a fabric endpoint are skipped silently
//! - Device records are first-writer-wins per field (VLAN, IP, gateway)
//! - VirtualNetworks and Interfaces are visited in name order, so allocation
//!   does not depend on the order the cluster listed them in

use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use tracing::debug;

use super::vlan::vlan_definitions;
use super::{DEFAULT_IMAGE, DEFAULT_NODE_TYPE, DEFAULT_SIM_INTERFACE};
use crate::domain::{matches_any, sim_name_for_interface};
use crate::resources::{InterfaceView, VirtualNetworkView};

/// Attachment inferred from a VirtualNetwork VLAN and an Interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAttachment {
    pub virtual_network: String,
    pub vlan_name: String,
    pub vlan_id: Option<String>,
    /// Interface resource name
    pub interface_name: String,
    pub fabric_node: String,
    pub fabric_interface: String,
    pub sim_name: String,
    pub ip_address: Option<Ipv4Net>,
}

/// Simulated device being assembled from one or more attachments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimDeviceRecord {
    pub name: String,
    pub image: String,
    pub node_type: String,
    pub interface: String,
    pub vlan: Option<String>,
    pub ip_address: Option<Ipv4Net>,
    pub gateway: Option<Ipv4Addr>,
}

impl SimDeviceRecord {
    /// Record with the default image, type and interface
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: DEFAULT_IMAGE.to_string(),
            node_type: DEFAULT_NODE_TYPE.to_string(),
            interface: DEFAULT_SIM_INTERFACE.to_string(),
            vlan: None,
            ip_address: None,
            gateway: None,
        }
    }

    /// Fill fields that are still unset; never overwrites
    pub fn absorb(
        &mut self,
        vlan: Option<&str>,
        ip_address: Option<Ipv4Net>,
        gateway: Option<Ipv4Addr>,
    ) {
        if self.vlan.is_none() {
            self.vlan = vlan.filter(|v| !v.is_empty()).map(str::to_string);
        }
        if self.ip_address.is_none() {
            self.ip_address = ip_address;
        }
        if self.gateway.is_none() {
            self.gateway = gateway;
        }
    }
}

/// Raw result of one collection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub devices: BTreeMap<String, SimDeviceRecord>,
    pub attachments: Vec<AutoAttachment>,
}

/// Collect attachments and device records for every selector match
pub fn collect_attachments(
    virtual_networks: &[VirtualNetworkView],
    interfaces: &[InterfaceView],
) -> Collection {
    let mut networks: Vec<&VirtualNetworkView> = virtual_networks.iter().collect();
    networks.sort_by(|a, b| a.name.cmp(&b.name));

    // Later duplicates of a name replace earlier ones.
    let interfaces: BTreeMap<&str, &InterfaceView> = interfaces
        .iter()
        .map(|interface| (interface.name.as_str(), interface))
        .collect();

    let mut collection = Collection::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for network in networks {
        for mut definition in vlan_definitions(network) {
            for (name, interface) in &interfaces {
                if !matches_any(&interface.labels, &definition.selectors) {
                    continue;
                }
                if !seen.insert((definition.vlan_name.clone(), name.to_string())) {
                    continue;
                }
                let Some(endpoint) = interface.endpoint.as_ref() else {
                    debug!(interface = %name, "selected interface has no fabric member, skipping");
                    continue;
                };

                let sim_name = sim_name_for_interface(name);
                let ip_address = definition.allocate();
                let gateway = ip_address
                    .and(definition.ip_pool.as_ref())
                    .map(|pool| pool.gateway());

                collection
                    .devices
                    .entry(sim_name.clone())
                    .or_insert_with(|| SimDeviceRecord::new(sim_name.clone()))
                    .absorb(definition.vlan_id.as_deref(), ip_address, gateway);

                debug!(
                    virtual_network = %definition.virtual_network,
                    vlan = %definition.vlan_name,
                    interface = %name,
                    device = %sim_name,
                    "collected attachment"
                );

                collection.attachments.push(AutoAttachment {
                    virtual_network: definition.virtual_network.clone(),
                    vlan_name: definition.vlan_name.clone(),
                    vlan_id: definition.vlan_id.clone(),
                    interface_name: name.to_string(),
                    fabric_node: endpoint.node.clone(),
                    fabric_interface: endpoint.interface.clone(),
                    sim_name,
                    ip_address,
                });
            }
        }
    }

    collection
}

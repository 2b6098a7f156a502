// Copyright (c) 2025 - Cowboy AI, Inc.
//! VLAN Definition Extraction
//!
//! Normalizes the `spec.vlans[]` of a VirtualNetwork into [`VlanDefinition`]s
//! and resolves each one's address pool through the IRB interfaces of the same
//! VirtualNetwork.
//!
//! # Pool resolution
//!
//! ```text
//! irbInterfaces[].spec.bridgeDomain ──► primary ipv4 prefix ──► IpPool
//!                                              ▲
//! vlans[].spec.bridgeDomain ───── exact match ─┘
//! ```
//!
//! The primary address of an IRB interface is the first entry flagged
//! `primary: true`; without a flag the last parseable entry is used.

use std::collections::HashMap;

use ipnet::Ipv4Net;
use tracing::debug;

use crate::domain::IpPool;
use crate::resources::{IrbEntry, VirtualNetworkView};

/// A VLAN slice of a VirtualNetwork that selects fabric interfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanDefinition {
    pub virtual_network: String,
    /// `vlans[].name`, falling back to the VirtualNetwork name
    pub vlan_name: String,
    pub vlan_id: Option<String>,
    /// OR-ed label selectors; never empty
    pub selectors: Vec<String>,
    /// Owned exclusively by this definition for one planning pass
    pub ip_pool: Option<IpPool>,
}

impl VlanDefinition {
    /// Draw the next address from this definition's pool
    pub fn allocate(&mut self) -> Option<Ipv4Net> {
        self.ip_pool.as_mut().and_then(IpPool::next_address)
    }
}

/// Primary gateway prefix of one IRB interface
pub fn primary_prefix(irb: &IrbEntry) -> Option<Ipv4Net> {
    let mut primary = None;
    for address in &irb.addresses {
        let Ok(prefix) = address.prefix.trim().parse::<Ipv4Net>() else {
            debug!(
                bridge_domain = %irb.bridge_domain,
                prefix = %address.prefix,
                "skipping unparseable IRB address"
            );
            continue;
        };
        primary = Some(prefix);
        if address.primary {
            break;
        }
    }
    primary
}

/// Bridge-domain name to address pool, one per IRB interface
pub fn ip_pools(virtual_network: &VirtualNetworkView) -> HashMap<String, IpPool> {
    virtual_network
        .irb_interfaces
        .iter()
        .filter_map(|irb| {
            primary_prefix(irb).map(|prefix| (irb.bridge_domain.clone(), IpPool::from_gateway(prefix)))
        })
        .collect()
}

/// VLAN definitions of one VirtualNetwork, skipping entries without selectors
pub fn vlan_definitions(virtual_network: &VirtualNetworkView) -> Vec<VlanDefinition> {
    let pools = ip_pools(virtual_network);

    virtual_network
        .vlans
        .iter()
        .filter(|vlan| !vlan.selectors.is_empty())
        .map(|vlan| VlanDefinition {
            virtual_network: virtual_network.name.clone(),
            vlan_name: vlan
                .name
                .clone()
                .unwrap_or_else(|| virtual_network.name.clone()),
            vlan_id: vlan.vlan_id.clone(),
            selectors: vlan.selectors.clone(),
            ip_pool: vlan
                .bridge_domain
                .as_ref()
                .and_then(|domain| pools.get(domain).cloned()),
        })
        .collect()
}

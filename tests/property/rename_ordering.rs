// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Auto-Plan Determinism
//!
//! Plans are built from randomly labelled edge interfaces under the two fixed
//! VirtualNetworks. Whatever order the cluster returns documents in, the plan
//! must come out identical with contiguous `serverN` names.

use std::collections::BTreeMap;

use cx_attach::auto::{plan_from_documents, PlannedSpec};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

use cx_attach::build_auto_plan;

use crate::fixtures::{bridged_virtual_network, interface, routed_virtual_network, FakeStore, TOPO_NS};

// ============================================================================
// Strategies
// ============================================================================

/// (leaf, port) → (selected by VLAN 1001, selected by VLAN 201)
fn edge_ports() -> impl Strategy<Value = BTreeMap<(u8, u8), (bool, bool)>> {
    prop::collection::btree_map((1u8..4, 1u8..12), (any::<bool>(), any::<bool>()), 1..10)
}

fn interface_documents(ports: &BTreeMap<(u8, u8), (bool, bool)>) -> Vec<Value> {
    ports
        .iter()
        .map(|((leaf, port), (routed, bridged))| {
            let mut labels = Map::new();
            if *routed {
                labels.insert("eda.nokia.com/macvrf1001".to_string(), json!("true"));
            }
            if *bridged {
                labels.insert("eda.nokia.com/macvrf201".to_string(), json!("true"));
            }
            interface(
                &format!("leaf{leaf}-ethernet-1-{port}"),
                Value::Object(labels),
                &format!("leaf{leaf}"),
                &format!("ethernet-1-{port}"),
            )
        })
        .collect()
}

fn plan(virtual_networks: &[Value], interfaces: &[Value]) -> Option<PlannedSpec> {
    plan_from_documents(TOPO_NS, virtual_networks, interfaces)
        .ok()
        .map(|plan| plan.spec)
}

fn ports_and_shuffle() -> impl Strategy<Value = (Vec<Value>, Vec<Value>)> {
    edge_ports().prop_flat_map(|ports| {
        let sorted = interface_documents(&ports);
        (Just(sorted.clone()), Just(sorted).prop_shuffle())
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Document order never changes the plan
    #[test]
    fn prop_plan_ignores_document_order((sorted, shuffled) in ports_and_shuffle(), flip in any::<bool>()) {
        let mut networks = vec![routed_virtual_network(), bridged_virtual_network()];
        let baseline = plan(&networks, &sorted);
        if flip {
            networks.reverse();
        }
        prop_assert_eq!(plan(&networks, &shuffled), baseline);
    }

    /// Devices are server1..N, each attached exactly once, in fabric order
    #[test]
    fn prop_servers_are_contiguous_and_attached_once(ports in edge_ports()) {
        let selected = ports.values().filter(|(routed, bridged)| *routed || *bridged).count();
        let networks = [routed_virtual_network(), bridged_virtual_network()];

        let Some(spec) = plan(&networks, &interface_documents(&ports)) else {
            prop_assert_eq!(selected, 0);
            return Ok(());
        };

        let names: Vec<String> = spec.sim_nodes.iter().map(|node| node.name.clone()).collect();
        let expected: Vec<String> = (1..=selected).map(|n| format!("server{n}")).collect();
        prop_assert_eq!(&names, &expected);

        let attached: Vec<String> = spec.topology.iter().map(|entry| entry.sim_node.clone()).collect();
        prop_assert_eq!(&attached, &expected);

        let endpoints: Vec<(String, String)> = spec
            .topology
            .iter()
            .map(|entry| (entry.node.clone(), entry.interface.clone()))
            .collect();
        let mut ordered = endpoints.clone();
        ordered.sort();
        prop_assert_eq!(endpoints, ordered);
    }

    /// Only routed devices get addresses, all from the IRB subnet
    #[test]
    fn prop_addresses_come_from_routed_vlan(ports in edge_ports()) {
        let networks = [routed_virtual_network(), bridged_virtual_network()];
        let Some(spec) = plan(&networks, &interface_documents(&ports)) else {
            return Ok(());
        };

        let routed = ports.values().filter(|(routed, _)| *routed).count();
        let addressed: Vec<_> = spec.sim_nodes.iter().filter(|node| node.ip_address.is_some()).collect();
        prop_assert_eq!(addressed.len(), routed);

        for node in addressed {
            let ip = node.ip_address.as_deref().unwrap_or_default();
            prop_assert!(ip.starts_with("10.10.1.") && ip.ends_with("/24"));
            prop_assert_eq!(node.gateway.as_deref(), Some("10.10.1.254"));
        }
    }

    /// Reading through a resource store plans exactly like the raw documents
    #[test]
    fn prop_store_plan_matches_document_plan(ports in edge_ports()) {
        let networks = vec![routed_virtual_network(), bridged_virtual_network()];
        let interfaces = interface_documents(&ports);
        let store = FakeStore::new();
        store.insert("virtualnetwork", networks.clone());
        store.insert("interface", interfaces.clone());

        let through_store = tokio_test::block_on(build_auto_plan(&store, TOPO_NS))
            .ok()
            .map(|plan| plan.spec);
        prop_assert_eq!(through_store, plan(&networks, &interfaces));
    }
}

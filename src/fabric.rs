// Copyright (c) 2025 - Cowboy AI, Inc.
//! Existing fabric inventory
//!
//! TopoNode and TopoLink resources describe the physical fabric a simulation
//! attaches to. They are re-read from the cluster for every check.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cluster::ResourceStore;
use crate::errors::{AttachError, AttachResult};
use crate::render::SIMTOPOLOGY_LABEL;
use crate::resources::{views, FabricEndpoint, ResourceView, TopoLinkView, TopoNodeView};
use crate::spec::SimulationSpec;

/// Fabric nodes and links currently defined in a namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FabricInventory {
    pub nodes: Vec<TopoNodeView>,
    pub links: Vec<TopoLinkView>,
}

impl FabricInventory {
    /// Read TopoNodes and TopoLinks; an empty node list is an error
    pub async fn fetch(store: &dyn ResourceStore, namespace: &str) -> AttachResult<Self> {
        let nodes: Vec<TopoNodeView> =
            views(&store.list(namespace, TopoNodeView::KIND.resource()).await?);
        if nodes.is_empty() {
            return Err(AttachError::spec(format!(
                "No TopoNode resources found in namespace {namespace}; cannot verify fabric attachments"
            )));
        }
        let links: Vec<TopoLinkView> =
            views(&store.list(namespace, TopoLinkView::KIND.resource()).await?);

        debug!(
            namespace,
            nodes = nodes.len(),
            links = links.len(),
            "fabric inventory loaded"
        );
        Ok(Self { nodes, links })
    }

    pub fn node_names(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }

    /// Reject attachments whose fabric node is not a known TopoNode
    pub fn ensure_known_nodes(&self, spec: &SimulationSpec) -> AttachResult<()> {
        let known = self.node_names();
        for attachment in &spec.attachments {
            if known.contains(attachment.fabric_node.as_str()) {
                continue;
            }
            let available = if known.is_empty() {
                "<none>".to_string()
            } else {
                known.iter().copied().collect::<Vec<_>>().join(", ")
            };
            return Err(AttachError::spec(format!(
                "Topology entry references unknown node '{}'. Available fabric nodes: {available}",
                attachment.fabric_node
            )));
        }
        Ok(())
    }

    /// Name of a non-simulation TopoLink already using `endpoint`
    pub fn claimed_by(&self, endpoint: &FabricEndpoint) -> Option<&str> {
        self.links
            .iter()
            .filter(|link| !link.labels.contains_key(SIMTOPOLOGY_LABEL))
            .find(|link| link.local.contains(endpoint))
            .map(|link| link.name.as_str())
    }
}

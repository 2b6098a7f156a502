// Copyright (c) 2025 - Cowboy AI, Inc.
//! Auto-Generated Simulation Specs
//!
//! Synthesizes a simplified simulation spec from the VirtualNetwork and
//! Interface resources already present in the cluster.
//!
//! ```text
//! VirtualNetwork ──► vlan::vlan_definitions ──┐
//!                                             ├─► collect ──► merge ──► rename ──► AutoPlan
//! Interface ──────────────────────────────────┘
//! ```
//!
//! Cluster resources are always re-read; nothing is cached between runs.

use serde_json::Value;
use tracing::{debug, info};

use crate::cluster::ResourceStore;
use crate::errors::{AttachError, AttachResult};
use crate::resources::{views, InterfaceView, ResourceKind, ResourceView, VirtualNetworkView};

pub mod collect;
pub mod plan;
pub mod vlan;

pub use collect::{collect_attachments, AutoAttachment, Collection, SimDeviceRecord};
pub use plan::{
    merge_attachments, rename_servers, AutoPlan, PlannedAttachment, PlannedSimNode, PlannedSpec,
};
pub use vlan::{vlan_definitions, VlanDefinition};

/// Container image for generated simulated devices
pub const DEFAULT_IMAGE: &str = "ghcr.io/srl-labs/network-multitool:v0.4.1";

/// Node type for generated simulated devices
pub const DEFAULT_NODE_TYPE: &str = "Linux";

/// Interface every generated simulated device attaches with
pub const DEFAULT_SIM_INTERFACE: &str = "eth1";

/// List documents of one kind, reporting failures as spec errors
async fn load_documents(
    store: &dyn ResourceStore,
    namespace: &str,
    kind: ResourceKind,
) -> AttachResult<Vec<Value>> {
    let resource = kind.resource();
    store.list(namespace, resource).await.map_err(|err| {
        AttachError::spec(format!(
            "Failed to load {resource} from namespace {namespace}: {err}"
        ))
    })
}

/// Read VirtualNetwork and Interface resources and synthesize a plan
pub async fn build_auto_plan(store: &dyn ResourceStore, namespace: &str) -> AttachResult<AutoPlan> {
    info!(namespace, "building auto plan");

    let virtual_networks = load_documents(store, namespace, VirtualNetworkView::KIND).await?;
    let interfaces = load_documents(store, namespace, InterfaceView::KIND).await?;
    plan_from_documents(namespace, &virtual_networks, &interfaces)
}

/// Synthesize a plan from already-fetched documents
pub fn plan_from_documents(
    namespace: &str,
    virtual_networks: &[Value],
    interfaces: &[Value],
) -> AttachResult<AutoPlan> {
    if virtual_networks.is_empty() {
        return Err(AttachError::spec(format!(
            "No VirtualNetwork resources found in namespace {namespace}"
        )));
    }
    if interfaces.is_empty() {
        return Err(AttachError::spec(format!(
            "No Interface resources found in namespace {namespace}"
        )));
    }

    // Documents without the fields a view needs still count as present above.
    let virtual_networks: Vec<VirtualNetworkView> = views(virtual_networks);
    let interfaces: Vec<InterfaceView> = views(interfaces);

    let Collection {
        mut devices,
        attachments,
    } = collect_attachments(&virtual_networks, &interfaces);
    let attachments = merge_attachments(&mut devices, attachments);

    if attachments.is_empty() {
        return Err(AttachError::spec(
            "No interfaces matched the VirtualNetwork selectors; cannot synthesise simulation spec.",
        ));
    }

    let (devices, attachments) = rename_servers(&devices, attachments);
    debug!(
        devices = devices.len(),
        attachments = attachments.len(),
        "auto plan assembled"
    );
    Ok(AutoPlan::new(devices, attachments))
}

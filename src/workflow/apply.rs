// Copyright (c) 2025 - Cowboy AI, Inc.
//! Apply path

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use super::{Lifecycle, SpecSource, Trail, Workflow};
use crate::errors::AttachResult;
use crate::fabric::FabricInventory;
use crate::render::ResourceSummary;
use crate::resources::FabricEndpoint;
use crate::spec::{parse_simulation_spec, SimulationSpec};
use crate::state_machine::WorkflowStep;

use super::manifest::ManifestFile;

/// Outcome of a successful apply
#[derive(Debug, Clone)]
pub struct ApplyReport {
    /// Manifest kept on disk, when one was requested
    pub manifest_path: Option<PathBuf>,
    pub resources: Vec<ResourceSummary>,
    /// Device name → pod backing it
    pub pods: BTreeMap<String, String>,
    /// Devices whose interfaces were configured, in order
    pub configured: Vec<String>,
    pub trail: Trail,
}

impl Workflow<'_> {
    /// Render, apply and configure a simulation
    pub async fn apply(&self, source: &SpecSource) -> AttachResult<ApplyReport> {
        let document = self.load(source, "Using auto-generated simulation spec").await?;
        let spec = parse_simulation_spec(&document)?;
        let mut lifecycle = Lifecycle::new();

        if self.config.check_fabric {
            self.check_fabric(&spec).await?;
        }

        let bundle = self.render(&spec, &mut lifecycle)?;
        self.echo_manifest(&bundle, "Debug: generated simulation manifest");

        let manifest = ManifestFile::write(&bundle.manifest_text, self.config.emit_crds.as_deref())?;
        lifecycle.step(WorkflowStep::WriteManifest)?;
        let path = manifest.path();
        self.echo(format!("Applying simulation bundle with ETC using {}", path.display()));

        self.echo("Running etc apply --dry-run");
        let output = self.orchestrator.apply(path, true).await?;
        self.report_output(&output);
        lifecycle.step(WorkflowStep::DryRunApply)?;

        self.echo("Running etc apply");
        let output = self.orchestrator.apply(path, false).await?;
        self.report_output(&output);
        lifecycle.step(WorkflowStep::Apply)?;

        let manifest_path = manifest.is_kept().then(|| path.to_path_buf());
        drop(manifest);
        info!(kept = ?manifest_path, "simulation bundle applied");

        self.echo("Updated resources:");
        for (kind, names) in bundle.grouped_summaries() {
            self.echo(format!("  {kind}: {}", names.join(", ")));
        }

        let mut pods = self.collect_pods(&bundle.sim_nodes).await?;
        lifecycle.step(WorkflowStep::AwaitPods)?;

        let configured = if bundle.node_configs.is_empty() {
            self.echo("No Linux interface configuration required");
            Vec::new()
        } else {
            self.configure_interfaces(&bundle.node_configs, &mut pods).await?
        };
        lifecycle.step(WorkflowStep::Configure)?;

        self.dump_simulation_state().await;
        lifecycle.step(WorkflowStep::Finish)?;

        Ok(ApplyReport {
            manifest_path,
            resources: bundle.summaries,
            pods,
            configured,
            trail: lifecycle.into_trail(),
        })
    }

    /// Reject unknown fabric nodes and flag endpoints held by other links
    async fn check_fabric(&self, spec: &SimulationSpec) -> AttachResult<()> {
        let inventory = FabricInventory::fetch(self.store, &self.config.topology_namespace).await?;
        inventory.ensure_known_nodes(spec)?;

        for attachment in &spec.attachments {
            let endpoint = FabricEndpoint {
                node: attachment.fabric_node.clone(),
                interface: attachment.fabric_interface.clone(),
            };
            if let Some(link) = inventory.claimed_by(&endpoint) {
                self.echo(format!(
                    "Warning: fabric endpoint {}/{} is already used by TopoLink {link}",
                    endpoint.node, endpoint.interface
                ));
            }
        }
        Ok(())
    }
}

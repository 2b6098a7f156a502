// Copyright (c) 2025 - Cowboy AI, Inc.
//! Remove path

use tracing::{info, warn};

use super::{Lifecycle, SpecSource, Trail, Workflow};
use crate::errors::AttachResult;
use crate::render::{ResourceSummary, API_VERSION};
use crate::spec::parse_simulation_spec;
use crate::state_machine::WorkflowStep;

use super::manifest::ManifestFile;

/// Outcome of a removal; lingering resources are warnings only
#[derive(Debug, Clone)]
pub struct RemoveReport {
    pub resources: Vec<ResourceSummary>,
    /// `<resource>.<group>/<name>` for every object still present
    pub lingering: Vec<String>,
    pub trail: Trail,
}

impl RemoveReport {
    pub fn is_clean(&self) -> bool {
        self.lingering.is_empty()
    }
}

impl Workflow<'_> {
    /// Render and delete a simulation, then check what is left behind
    pub async fn remove(&self, source: &SpecSource) -> AttachResult<RemoveReport> {
        let document = self
            .load(source, "Using auto-generated simulation spec for deletion")
            .await?;
        let spec = parse_simulation_spec(&document)?;
        let mut lifecycle = Lifecycle::new();

        let bundle = self.render(&spec, &mut lifecycle)?;
        self.echo_manifest(&bundle, "Debug: generated simulation manifest for deletion");

        let manifest = ManifestFile::write(&bundle.manifest_text, None)?;
        lifecycle.step(WorkflowStep::WriteManifest)?;
        let path = manifest.path();
        self.echo(format!("Deleting simulation bundle with ETC using {}", path.display()));

        self.echo("Running etc delete --dry-run");
        let output = self.orchestrator.delete(path, true).await?;
        self.report_output(&output);
        lifecycle.step(WorkflowStep::DryRunDelete)?;

        self.echo("Running etc delete");
        let output = self.orchestrator.delete(path, false).await?;
        self.report_output(&output);
        lifecycle.step(WorkflowStep::Delete)?;
        drop(manifest);
        info!("simulation bundle deleted");

        self.dump_simulation_state().await;

        let lingering = self.verify_cleanup(&bundle.summaries).await;
        lifecycle.step(WorkflowStep::VerifyCleanup)?;
        lifecycle.step(WorkflowStep::Finish)?;

        Ok(RemoveReport {
            resources: bundle.summaries,
            lingering,
            trail: lifecycle.into_trail(),
        })
    }

    /// Names of rendered resources that still exist
    async fn verify_cleanup(&self, summaries: &[ResourceSummary]) -> Vec<String> {
        let namespace = &self.config.topology_namespace;
        let group = API_VERSION.split('/').next().unwrap_or(API_VERSION);
        let mut lingering = Vec::new();

        for summary in summaries {
            let resource = summary.kind.singular();
            match self.store.exists(namespace, resource, &summary.name).await {
                Ok(true) => lingering.push(format!("{resource}.{group}/{}", summary.name)),
                Ok(false) => {}
                Err(err) => warn!(resource, name = %summary.name, error = %err, "cleanup check failed"),
            }
        }

        if !lingering.is_empty() {
            self.echo(format!(
                "Warning: lingering simulation resources detected:\n{}",
                lingering.join("\n")
            ));
        }
        lingering
    }
}

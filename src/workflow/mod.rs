// Copyright (c) 2025 - Cowboy AI, Inc.
//! Apply/Remove Workflow
//!
//! Drives a simulation spec through rendering, orchestration and in-pod
//! configuration against the collaborators in [`crate::cluster`].
//!
//! ```text
//! apply:  load → render → write manifest → etc apply --dry-run → etc apply
//!              → wait for pods → configure interfaces
//! remove: load → render → write manifest → etc delete --dry-run → etc delete
//!              → verify cleanup
//! ```
//!
//! Every completed step is recorded on a [`WorkflowState`] machine; the
//! resulting trail is returned in the report.
//!
//! # Failure semantics
//!
//! - Orchestration failures abort immediately and carry the tool's output
//! - Scratch manifests are removed whether the run succeeds or fails
//! - Nothing is rolled back; re-running is safe because names are idempotent
//! - Resources still present after removal are warnings, not errors

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::auto::build_auto_plan;
use crate::cluster::{Orchestrator, PodExecutor, ResourceStore};
use crate::config::AttachConfig;
use crate::console::Console;
use crate::errors::{AttachError, AttachResult};
use crate::render::{render_bundle, RenderedBundle};
use crate::spec::{read_spec_file, SimulationSpec};
use crate::state_machine::{StateMachineWithHistory, Transition, WorkflowState, WorkflowStep};

mod apply;
mod configure;
pub mod manifest;
mod pods;
mod remove;

pub use apply::ApplyReport;
pub use configure::{configure_script, is_device_pending, DEVICE_PENDING_PHRASES};
pub use manifest::ManifestFile;
pub use remove::RemoveReport;

/// Resources dumped after apply/remove in debug mode
const DEBUG_DUMPS: [(&str, &str); 2] = [("simnodes", "-o wide"), ("simlinks", "-o yaml")];

/// Recorded lifecycle of one run
pub type Trail = Vec<Transition<WorkflowState, WorkflowStep>>;

/// Where the simplified spec comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SpecSource {
    /// YAML file on disk
    File(PathBuf),
    /// Already-parsed document, e.g. a previously generated plan
    Document(Value),
    /// Synthesized from cluster VirtualNetworks and Interfaces
    Auto,
}

/// Lifecycle tracker mapping invalid steps to configuration errors
struct Lifecycle(StateMachineWithHistory<WorkflowState>);

impl Lifecycle {
    fn new() -> Self {
        Self(StateMachineWithHistory::new(WorkflowState::SpecLoaded))
    }

    fn step(&mut self, step: WorkflowStep) -> AttachResult<()> {
        self.0
            .transition_with_history(step, Utc::now())
            .map_err(|err| AttachError::Configuration(err.to_string()))?;
        debug!(state = %self.0.current_state(), %step, "workflow advanced");
        Ok(())
    }

    fn into_trail(self) -> Trail {
        self.0.history
    }
}

/// Apply/remove entry points bound to a set of collaborators
pub struct Workflow<'a> {
    store: &'a dyn ResourceStore,
    orchestrator: &'a dyn Orchestrator,
    pods: &'a dyn PodExecutor,
    console: &'a dyn Console,
    config: &'a AttachConfig,
}

impl<'a> Workflow<'a> {
    pub fn new(
        store: &'a dyn ResourceStore,
        orchestrator: &'a dyn Orchestrator,
        pods: &'a dyn PodExecutor,
        console: &'a dyn Console,
        config: &'a AttachConfig,
    ) -> Self {
        Self {
            store,
            orchestrator,
            pods,
            console,
            config,
        }
    }

    fn echo(&self, message: impl AsRef<str>) {
        self.console.echo(message.as_ref());
    }

    fn debug_echo(&self, message: impl AsRef<str>) {
        if self.config.debug {
            self.console.echo(message.as_ref());
        }
    }

    /// Resolve the spec document, announcing where it came from
    async fn load(&self, source: &SpecSource, auto_message: &str) -> AttachResult<Value> {
        match source {
            SpecSource::File(path) => {
                self.echo(format!("Loading simulation spec from {}", path.display()));
                read_spec_file(path)
            }
            SpecSource::Document(document) => {
                self.echo(auto_message);
                Ok(document.clone())
            }
            SpecSource::Auto => {
                let plan = build_auto_plan(self.store, &self.config.topology_namespace).await?;
                info!(devices = ?plan.sim_node_names(), "auto plan built");
                self.echo(auto_message);
                plan.to_document()
            }
        }
    }

    /// Echo orchestration output in debug mode only
    fn report_output(&self, output: &str) {
        let output = if output.is_empty() { "<no output>" } else { output };
        self.debug_echo(format!("Debug: command output\n{output}"));
    }

    fn echo_manifest(&self, bundle: &RenderedBundle, heading: &str) {
        if self.config.debug {
            self.echo(heading);
            self.echo(bundle.manifest_text.trim_end());
        }
    }

    /// Dump simulation resources; failures are reported, never fatal
    async fn dump_simulation_state(&self) {
        if !self.config.debug {
            return;
        }
        let namespace = &self.config.topology_namespace;
        for (resource, output) in DEBUG_DUMPS {
            let command = format!("kubectl -n {namespace} get {resource} {output}");
            match self.store.show(namespace, resource, output).await {
                Ok(text) => {
                    let text = if text.is_empty() { "<no output>" } else { text.as_str() };
                    self.echo(format!("Debug: {command}\n{text}"));
                }
                Err(err) => self.echo(format!("Debug: failed to run {command}: {err}")),
            }
        }
    }

    fn render(&self, spec: &SimulationSpec, lifecycle: &mut Lifecycle) -> AttachResult<RenderedBundle> {
        let bundle = render_bundle(spec, &self.config.topology_namespace)?;
        lifecycle.step(WorkflowStep::Render)?;
        info!(
            nodes = bundle.sim_nodes.len(),
            documents = bundle.documents.len(),
            "simulation bundle rendered"
        );
        Ok(bundle)
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Simulation attachment for EDA fabrics
//!
//! Attaches simulated edge devices to a fabric: a simplified spec (hand-written
//! or synthesized from cluster VirtualNetworks and Interfaces) is rendered into
//! SimNode, SimLink and TopoLink resources, applied or removed through `etc`,
//! and the resulting simulation pods get their IP/VLAN configuration.

pub mod auto;
pub mod cluster;
pub mod config;
pub mod console;
pub mod domain;
pub mod errors;
pub mod fabric;
pub mod render;
pub mod resources;
pub mod spec;
pub mod state_machine;
pub mod workflow;

// Re-export commonly used types
pub use auto::{build_auto_plan, AutoPlan};
pub use cluster::{Etc, Kubectl, Orchestrator, PodExecutor, ResourceStore};
pub use config::{AttachConfig, Timeouts};
pub use console::{Console, RecordingConsole, StdoutConsole};
pub use errors::{AttachError, AttachResult, CommandError};
pub use render::{render_bundle, NodeInterfaceConfig, RenderedBundle};
pub use spec::{parse_simulation_spec, SimulationSpec};
pub use workflow::{ApplyReport, RemoveReport, SpecSource, Workflow};

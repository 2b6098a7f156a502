// Copyright (c) 2025 - Cowboy AI, Inc.
//! cx-attach
//!
//! Attach simulated devices to an EDA fabric, remove them again, or print the
//! spec auto mode would generate.
//!
//! Prerequisites:
//! 1. `kubectl` configured for the target cluster
//! 2. `etc` on PATH (apply/remove)
//!
//! Namespaces default to `TOPO_NS` / `CORE_NS`, then `eda` / `eda-system`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cx_attach::{
    build_auto_plan, AttachConfig, Etc, Kubectl, SpecSource, StdoutConsole, Workflow,
};

#[derive(Debug, Parser)]
#[command(name = "cx-attach", version, about = "Attach simulated edge devices to an EDA fabric")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render, apply and configure a simulation
    Apply(ApplyArgs),
    /// Delete a previously applied simulation
    Remove(CommonArgs),
    /// Print the auto-generated simulation spec as YAML
    Plan(PlanArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Simplified simulation spec (YAML)
    #[arg(long, conflicts_with = "auto", required_unless_present = "auto")]
    spec: Option<PathBuf>,

    /// Generate the spec from VirtualNetwork and Interface resources
    #[arg(long)]
    auto: bool,

    /// Namespace holding topology and simulation resources
    #[arg(short = 'n', long = "topology-namespace")]
    topology_namespace: Option<String>,

    /// Namespace the simulation pods run in
    #[arg(short = 'c', long = "core-namespace")]
    core_namespace: Option<String>,

    /// Echo manifests, command output and interface state
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Keep the rendered manifest at this path
    #[arg(long)]
    emit_crds: Option<PathBuf>,

    /// Reject attachments to fabric nodes that do not exist
    #[arg(long)]
    check_fabric: bool,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Namespace holding VirtualNetwork and Interface resources
    #[arg(short = 'n', long = "topology-namespace")]
    topology_namespace: Option<String>,
}

impl CommonArgs {
    fn config(&self) -> AttachConfig {
        let mut config = AttachConfig::from_env().with_debug(self.debug);
        if let Some(namespace) = &self.topology_namespace {
            config = config.with_topology_namespace(namespace);
        }
        if let Some(namespace) = &self.core_namespace {
            config = config.with_core_namespace(namespace);
        }
        config
    }

    fn source(&self) -> SpecSource {
        match &self.spec {
            Some(path) => SpecSource::File(path.clone()),
            None => SpecSource::Auto,
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let kubectl = Kubectl::default();
    let etc = Etc::default();
    let console = StdoutConsole;

    match cli.command {
        Command::Apply(args) => {
            let config = args
                .common
                .config()
                .with_emit_crds(args.emit_crds.clone())
                .with_check_fabric(args.check_fabric);
            let workflow = Workflow::new(&kubectl, &etc, &kubectl, &console, &config);
            let report = workflow
                .apply(&args.common.source())
                .await
                .context("apply failed")?;
            info!(
                configured = report.configured.len(),
                steps = report.trail.len(),
                "apply complete"
            );
        }
        Command::Remove(args) => {
            let config = args.config();
            let workflow = Workflow::new(&kubectl, &etc, &kubectl, &console, &config);
            let report = workflow
                .remove(&args.source())
                .await
                .context("remove failed")?;
            info!(lingering = report.lingering.len(), "remove complete");
        }
        Command::Plan(args) => {
            let mut config = AttachConfig::from_env();
            if let Some(namespace) = args.topology_namespace {
                config = config.with_topology_namespace(namespace);
            }
            let plan = build_auto_plan(&kubectl, &config.topology_namespace)
                .await
                .context("auto plan failed")?;
            print!("{}", plan.to_yaml()?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let debug = match &cli.command {
        Command::Apply(args) => args.common.debug,
        Command::Remove(args) => args.debug,
        Command::Plan(_) => false,
    };
    init_tracing(debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! External Collaborators
//!
//! The workflow talks to the outside world through three seams:
//!
//! - [`ResourceStore`] - list and look up custom resources by namespace
//! - [`Orchestrator`] - reconcile a rendered manifest bundle (apply / delete)
//! - [`PodExecutor`] - find simulation pods, wait for readiness, run commands
//!
//! Production implementations shell out to `kubectl` and `etc` through a
//! [`CommandRunner`]; tests substitute in-memory fakes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{AttachResult, CommandError};

pub mod etc;
pub mod kubectl;
pub mod process;

pub use etc::Etc;
pub use kubectl::Kubectl;
pub use process::{CommandRunner, ProcessRunner};

/// Read access to cluster resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All documents of `resource` in `namespace`
    async fn list(&self, namespace: &str, resource: &str) -> AttachResult<Vec<Value>>;

    /// Whether the named object still exists
    async fn exists(&self, namespace: &str, resource: &str, name: &str)
        -> Result<bool, CommandError>;

    /// Human-readable listing, e.g. `-o wide` or `-o yaml`
    async fn show(
        &self,
        namespace: &str,
        resource: &str,
        output: &str,
    ) -> Result<String, CommandError>;
}

/// Manifest reconciliation tool
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn apply(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError>;

    async fn delete(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError>;
}

/// Pod discovery and in-pod command execution
#[async_trait]
pub trait PodExecutor: Send + Sync {
    /// Name of the first pod matching `selector`, if any
    async fn find_pod(&self, namespace: &str, selector: &str)
        -> Result<Option<String>, CommandError>;

    /// Block until the pod reports Ready or `timeout` expires
    async fn wait_ready(
        &self,
        namespace: &str,
        pod: &str,
        timeout: Duration,
    ) -> Result<(), CommandError>;

    /// Run `command` inside `container` of `pod`, returning its output
    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &[String],
    ) -> Result<String, CommandError>;
}

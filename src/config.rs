// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime configuration for attach/remove operations
//!
//! Configuration is an explicit value handed to every entry point. Library code
//! never consults the process environment; [`AttachConfig::from_env`] exists for
//! the binary to call once at start-up.

use std::path::PathBuf;
use std::time::Duration;

/// Namespace holding topology and simulation resources when `TOPO_NS` is unset
pub const DEFAULT_TOPOLOGY_NAMESPACE: &str = "eda";

/// Namespace hosting simulation pods when `CORE_NS` is unset
pub const DEFAULT_CORE_NAMESPACE: &str = "eda-system";

/// Polling bounds for pod readiness and in-pod configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Wall-clock deadline for discovering a ready pod and for device retries
    pub pod_deadline: Duration,
    /// Timeout passed to each readiness wait
    pub pod_ready: Duration,
    /// Sleep between attempts
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            pod_deadline: Duration::from_secs(180),
            pod_ready: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Configuration for a single apply, remove or plan invocation
#[derive(Debug, Clone)]
pub struct AttachConfig {
    /// Namespace containing TopoNode, Interface, VirtualNetwork and Sim* resources
    pub topology_namespace: String,
    /// Namespace the simulation pods run in
    pub core_namespace: String,
    /// Keep the rendered manifest at this path instead of a scratch file
    pub emit_crds: Option<PathBuf>,
    /// Echo command output, manifests and interface state
    pub debug: bool,
    /// Reject attachments that reference fabric nodes missing from the cluster
    pub check_fabric: bool,
    pub timeouts: Timeouts,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            topology_namespace: DEFAULT_TOPOLOGY_NAMESPACE.to_string(),
            core_namespace: DEFAULT_CORE_NAMESPACE.to_string(),
            emit_crds: None,
            debug: false,
            check_fabric: false,
            timeouts: Timeouts::default(),
        }
    }
}

impl AttachConfig {
    /// Load namespace defaults from `TOPO_NS` and `CORE_NS`
    pub fn from_env() -> Self {
        let topology_namespace = std::env::var("TOPO_NS")
            .unwrap_or_else(|_| DEFAULT_TOPOLOGY_NAMESPACE.to_string());
        let core_namespace =
            std::env::var("CORE_NS").unwrap_or_else(|_| DEFAULT_CORE_NAMESPACE.to_string());

        Self {
            topology_namespace,
            core_namespace,
            ..Self::default()
        }
    }

    pub fn with_topology_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.topology_namespace = namespace.into();
        self
    }

    pub fn with_core_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.core_namespace = namespace.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_emit_crds(mut self, path: Option<PathBuf>) -> Self {
        self.emit_crds = path;
        self
    }

    pub fn with_check_fabric(mut self, check: bool) -> Self {
        self.check_fabric = check;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

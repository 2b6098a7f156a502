// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cx-attach
//!
//! Deterministic cluster documents and in-memory stand-ins for the external
//! collaborators (resource store, orchestration tool, pod execution).
//!
//! # Design Principles
//! - Cluster documents are fixed constants; no randomness
//! - Fakes record every call so tests assert on what was asked of the cluster
//! - Fakes never touch a real cluster or spawn processes

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use cx_attach::cluster::{Orchestrator, PodExecutor, ResourceStore};
use cx_attach::config::{AttachConfig, Timeouts};
use cx_attach::errors::{AttachError, AttachResult, CommandError};

pub const TOPO_NS: &str = "eda";
pub const CORE_NS: &str = "eda-system";

/// Short timeouts so deadline paths finish quickly
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        pod_deadline: Duration::from_millis(200),
        pod_ready: Duration::from_secs(1),
        poll_interval: Duration::from_millis(1),
    }
}

pub fn test_config(debug: bool) -> AttachConfig {
    AttachConfig::default()
        .with_debug(debug)
        .with_timeouts(fast_timeouts())
}

/// Message carried by a spec error; panics on any other variant
pub fn spec_message(err: AttachError) -> String {
    match err {
        AttachError::Spec(message) => message,
        other => panic!("expected a spec error, got {other:?}"),
    }
}

// ============================================================================
// Cluster documents
// ============================================================================

/// VirtualNetwork with a routed VLAN 1001 (IRB gateway 10.10.1.254/24)
pub fn routed_virtual_network() -> Value {
    json!({
        "apiVersion": "services.eda.nokia.com/v1alpha1",
        "kind": "VirtualNetwork",
        "metadata": {"name": "ipvrf1001", "namespace": TOPO_NS},
        "spec": {
            "irbInterfaces": [{
                "name": "irb1001",
                "spec": {
                    "bridgeDomain": "macvrf1001",
                    "ipAddresses": [
                        {"ipv4Address": {"ipPrefix": "10.10.1.254/24", "primary": true}}
                    ]
                }
            }],
            "vlans": [{
                "name": "v1001",
                "spec": {
                    "bridgeDomain": "macvrf1001",
                    "interfaceSelector": ["eda.nokia.com/macvrf1001"],
                    "vlanID": 1001
                }
            }]
        }
    })
}

/// VirtualNetwork with a bridged-only VLAN 201 (no IRB, no addresses)
pub fn bridged_virtual_network() -> Value {
    json!({
        "kind": "VirtualNetwork",
        "metadata": {"name": "bridge201", "namespace": TOPO_NS},
        "spec": {
            "vlans": [{
                "name": "v201",
                "spec": {
                    "bridgeDomain": "macvrf201",
                    "interfaceSelector": "eda.nokia.com/macvrf201",
                    "vlanID": "201"
                }
            }]
        }
    })
}

pub fn interface(name: &str, labels: Value, node: &str, port: &str) -> Value {
    json!({
        "kind": "Interface",
        "metadata": {"name": name, "namespace": TOPO_NS, "labels": labels},
        "spec": {"members": [{"node": node, "interface": port}]}
    })
}

/// Three edge interfaces; `leaf1-ethernet-1-1` is selected by both VLANs
pub fn edge_interfaces() -> Vec<Value> {
    vec![
        interface(
            "leaf1-ethernet-1-1",
            json!({"eda.nokia.com/macvrf1001": "true", "eda.nokia.com/macvrf201": "true"}),
            "leaf1",
            "ethernet-1-1",
        ),
        interface(
            "leaf1-ethernet-1-2",
            json!({"eda.nokia.com/macvrf1001": "true"}),
            "leaf1",
            "ethernet-1-2",
        ),
        interface(
            "leaf2-ethernet-1-1",
            json!({"eda.nokia.com/macvrf201": "true"}),
            "leaf2",
            "ethernet-1-1",
        ),
        json!({
            "kind": "Interface",
            "metadata": {"name": "leaf3-lag", "labels": {"eda.nokia.com/macvrf201": "true"}},
            "spec": {"members": []}
        }),
    ]
}

pub fn topo_node(name: &str) -> Value {
    json!({"kind": "TopoNode", "metadata": {"name": name}, "spec": {"operatingSystem": "srl"}})
}

/// Hand-written simplified spec with one routed and one unaddressed device
pub fn simple_spec() -> Value {
    json!({
        "simNodes": [
            {"name": "server1", "image": "ghcr.io/srl-labs/network-multitool:v0.4.1",
             "type": "Linux", "interface": "eth1", "vlan": 1001,
             "ipAddress": "10.10.1.1/24", "gateway": "10.10.1.254"},
            {"name": "server2", "image": "ghcr.io/srl-labs/network-multitool:v0.4.1"}
        ],
        "topology": [
            {"node": "leaf1", "interface": "ethernet-1-1", "simNode": "server1", "simNodeInterface": "eth1"},
            {"node": "leaf2", "interface": "ethernet-1-1", "simNode": "server2", "simNodeInterface": "eth1"}
        ]
    })
}

// ============================================================================
// Fake resource store
// ============================================================================

/// In-memory resource store keyed by resource name
#[derive(Default)]
pub struct FakeStore {
    documents: Mutex<HashMap<String, Vec<Value>>>,
    present: Mutex<HashSet<(String, String)>>,
    failing: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the two-VirtualNetwork scenario
    pub fn with_scenario() -> Self {
        let store = Self::new();
        store.insert("virtualnetwork", vec![routed_virtual_network(), bridged_virtual_network()]);
        store.insert("interface", edge_interfaces());
        store
    }

    pub fn insert(&self, resource: &str, documents: Vec<Value>) {
        self.documents
            .lock()
            .unwrap()
            .insert(resource.to_string(), documents);
    }

    /// Mark an object as still existing for cleanup checks
    pub fn keep(&self, resource: &str, name: &str) {
        self.present
            .lock()
            .unwrap()
            .insert((resource.to_string(), name.to_string()));
    }

    /// Make every command touching `resource` fail
    pub fn fail(&self, resource: &str) {
        self.failing.lock().unwrap().insert(resource.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, resource: &str, command: &str) -> Result<(), CommandError> {
        if self.failing.lock().unwrap().contains(resource) {
            return Err(CommandError::failed(command, "", "the server could not find the requested resource"));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for FakeStore {
    async fn list(&self, namespace: &str, resource: &str) -> AttachResult<Vec<Value>> {
        let command = format!("list {namespace} {resource}");
        self.record(command.clone());
        self.check(resource, &command)?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default())
    }

    async fn exists(
        &self,
        namespace: &str,
        resource: &str,
        name: &str,
    ) -> Result<bool, CommandError> {
        self.record(format!("exists {namespace} {resource} {name}"));
        Ok(self
            .present
            .lock()
            .unwrap()
            .contains(&(resource.to_string(), name.to_string())))
    }

    async fn show(
        &self,
        namespace: &str,
        resource: &str,
        output: &str,
    ) -> Result<String, CommandError> {
        let command = format!("show {namespace} {resource} {output}");
        self.record(command.clone());
        self.check(resource, &command)?;
        Ok(format!("NAME\n{resource}-listing"))
    }
}

// ============================================================================
// Fake orchestration tool
// ============================================================================

/// One recorded `etc` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtcCall {
    pub verb: &'static str,
    pub path: PathBuf,
    pub dry_run: bool,
    /// Manifest contents at the time of the call
    pub manifest: String,
}

#[derive(Default)]
pub struct FakeOrchestrator {
    pub calls: Mutex<Vec<EtcCall>>,
    /// Fail the call with this index (0-based)
    pub fail_at: Option<usize>,
    pub output: String,
}

impl FakeOrchestrator {
    pub fn new() -> Self {
        Self {
            output: "Transaction 42 committed".to_string(),
            ..Self::default()
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<EtcCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, verb: &'static str, path: &Path, dry_run: bool) -> Result<String, CommandError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(EtcCall {
            verb,
            path: path.to_path_buf(),
            dry_run,
            manifest: std::fs::read_to_string(path).unwrap_or_default(),
        });

        if self.fail_at == Some(index) {
            return Err(CommandError::failed(
                format!("etc {verb} -f {}", path.display()),
                "",
                "admission webhook denied the request",
            ));
        }
        Ok(self.output.clone())
    }
}

#[async_trait]
impl Orchestrator for FakeOrchestrator {
    async fn apply(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError> {
        self.record("apply", manifest, dry_run)
    }

    async fn delete(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError> {
        self.record("delete", manifest, dry_run)
    }
}

// ============================================================================
// Fake pod execution
// ============================================================================

/// One recorded in-pod command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub pod: String,
    pub container: String,
    pub command: Vec<String>,
}

#[derive(Default)]
pub struct FakePods {
    /// Devices that never get a pod
    missing: Mutex<HashSet<String>>,
    /// `find_pod` calls answered with "no pod" before the pod appears
    pending_lookups: Mutex<usize>,
    /// Errors returned by the next configuration scripts, in order
    exec_failures: Mutex<VecDeque<CommandError>>,
    pub execs: Mutex<Vec<ExecCall>>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakePods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pod_name(device: &str) -> String {
        format!("cx-eda--{device}-sim-7d9f")
    }

    pub fn never_schedule(&self, device: &str) {
        self.missing.lock().unwrap().insert(device.to_string());
    }

    pub fn delay_lookups(&self, count: usize) {
        *self.pending_lookups.lock().unwrap() = count;
    }

    pub fn fail_next_exec(&self, err: CommandError) {
        self.exec_failures.lock().unwrap().push_back(err);
    }

    pub fn execs(&self) -> Vec<ExecCall> {
        self.execs.lock().unwrap().clone()
    }

    /// Configuration scripts pushed so far (`sh -c <script>`)
    pub fn scripts(&self) -> Vec<String> {
        self.execs()
            .into_iter()
            .filter(|call| call.command.first().map(String::as_str) == Some("sh"))
            .filter_map(|call| call.command.last().cloned())
            .collect()
    }
}

#[async_trait]
impl PodExecutor for FakePods {
    async fn find_pod(
        &self,
        _namespace: &str,
        selector: &str,
    ) -> Result<Option<String>, CommandError> {
        self.lookups.lock().unwrap().push(selector.to_string());

        let device = selector.trim_start_matches("cx-pod-name=");
        if self.missing.lock().unwrap().contains(device) {
            return Ok(None);
        }

        let mut pending = self.pending_lookups.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Err(CommandError::failed(
                "kubectl get pod",
                "",
                "error: error executing jsonpath: array index out of bounds",
            ));
        }
        Ok(Some(Self::pod_name(device)))
    }

    async fn wait_ready(
        &self,
        _namespace: &str,
        _pod: &str,
        _timeout: Duration,
    ) -> Result<(), CommandError> {
        Ok(())
    }

    async fn exec(
        &self,
        _namespace: &str,
        pod: &str,
        container: &str,
        command: &[String],
    ) -> Result<String, CommandError> {
        self.execs.lock().unwrap().push(ExecCall {
            pod: pod.to_string(),
            container: container.to_string(),
            command: command.to_vec(),
        });

        if command.first().map(String::as_str) == Some("sh") {
            if let Some(err) = self.exec_failures.lock().unwrap().pop_front() {
                return Err(err);
            }
            return Ok(String::new());
        }
        Ok(format!(
            "3: {}@if12: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 9500\n    inet 10.10.1.1/24",
            command.last().cloned().unwrap_or_default()
        ))
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! `kubectl` adapter for resource lookups and pod operations

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::process::{CommandRunner, ProcessRunner};
use super::{PodExecutor, ResourceStore};
use crate::errors::{AttachResult, CommandError};

/// Label selecting the pod that backs a simulated device
pub fn pod_selector(device: &str) -> String {
    format!("cx-pod-name={device}")
}

/// Cluster access through the `kubectl` CLI
#[derive(Debug, Clone)]
pub struct Kubectl<R = ProcessRunner> {
    runner: R,
    program: String,
}

impl Default for Kubectl<ProcessRunner> {
    fn default() -> Self {
        Self::new(ProcessRunner)
    }
}

impl<R: CommandRunner> Kubectl<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "kubectl".to_string(),
        }
    }

    async fn kubectl(&self, namespace: &str, args: &[&str]) -> Result<String, CommandError> {
        let mut full = vec!["-n".to_string(), namespace.to_string()];
        full.extend(args.iter().map(|arg| arg.to_string()));
        self.runner.run(&self.program, &full).await
    }
}

#[async_trait]
impl<R: CommandRunner> ResourceStore for Kubectl<R> {
    async fn list(&self, namespace: &str, resource: &str) -> AttachResult<Vec<Value>> {
        let payload = self
            .kubectl(namespace, &["get", resource, "-o", "json"])
            .await?;
        let payload = if payload.trim().is_empty() { "{}" } else { payload.as_str() };

        let document: Value = serde_json::from_str(payload)?;
        let items = document
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter(|item| item.is_object()).cloned().collect())
            .unwrap_or_default();
        Ok(items)
    }

    async fn exists(
        &self,
        namespace: &str,
        resource: &str,
        name: &str,
    ) -> Result<bool, CommandError> {
        match self.kubectl(namespace, &["get", resource, name]).await {
            Ok(_) => Ok(true),
            Err(CommandError::Failed(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn show(
        &self,
        namespace: &str,
        resource: &str,
        output: &str,
    ) -> Result<String, CommandError> {
        let mut args = vec!["get", resource];
        args.extend(output.split_whitespace());
        self.kubectl(namespace, &args).await
    }
}

#[async_trait]
impl<R: CommandRunner> PodExecutor for Kubectl<R> {
    async fn find_pod(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Option<String>, CommandError> {
        let name = self
            .kubectl(
                namespace,
                &[
                    "get",
                    "pod",
                    "-l",
                    selector,
                    "-o",
                    "jsonpath={.items[0].metadata.name}",
                ],
            )
            .await?;
        let name = name.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    async fn wait_ready(
        &self,
        namespace: &str,
        pod: &str,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        let timeout = format!("--timeout={}s", timeout.as_secs());
        self.kubectl(
            namespace,
            &["wait", "pod", pod, "--for=condition=Ready", timeout.as_str()],
        )
        .await
        .map(|_| ())
    }

    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &[String],
    ) -> Result<String, CommandError> {
        let mut args = vec!["exec", pod, "-c", container, "--"];
        args.extend(command.iter().map(String::as_str));
        self.kubectl(namespace, &args).await
    }
}

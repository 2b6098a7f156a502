// Copyright (c) 2025 - Cowboy AI, Inc.
//! Waiting for simulation pods

use std::collections::BTreeMap;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::Workflow;
use crate::cluster::kubectl::pod_selector;
use crate::errors::{AttachError, AttachResult};

impl Workflow<'_> {
    /// Poll until a Ready pod backs `device`, or fail once the deadline passes
    ///
    /// Lookup and readiness errors are expected while the pod is being
    /// scheduled and only end the current attempt.
    pub(super) async fn wait_for_pod(&self, device: &str) -> AttachResult<String> {
        let timeouts = self.config.timeouts;
        let namespace = &self.config.core_namespace;
        let selector = pod_selector(device);
        let deadline = Instant::now() + timeouts.pod_deadline;

        while Instant::now() < deadline {
            match self.pods.find_pod(namespace, &selector).await {
                Ok(Some(pod)) => match self.pods.wait_ready(namespace, &pod, timeouts.pod_ready).await {
                    Ok(()) => {
                        info!(device, pod = %pod, "simulation pod ready");
                        self.debug_echo(format!("Debug: pod ready for {device}: {pod}"));
                        return Ok(pod);
                    }
                    Err(err) => debug!(device, pod = %pod, error = %err, "pod not ready yet"),
                },
                Ok(None) => debug!(device, %selector, "no pod yet"),
                Err(err) => debug!(device, error = %err, "pod lookup failed"),
            }
            sleep(timeouts.poll_interval).await;
        }

        Err(AttachError::Timeout {
            device: device.to_string(),
        })
    }

    /// Wait for every device in order, returning device → pod
    pub(super) async fn collect_pods(&self, devices: &[String]) -> AttachResult<BTreeMap<String, String>> {
        let mut pods = BTreeMap::new();
        for device in devices {
            self.echo(format!("Waiting for simulation pod {device}"));
            let pod = self.wait_for_pod(device).await?;
            pods.insert(device.clone(), pod);
        }
        Ok(pods)
    }
}

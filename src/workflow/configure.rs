// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-pod interface configuration
//!
//! Each [`NodeInterfaceConfig`] becomes one idempotent shell script run inside
//! the device's container. Scripts that fail because the interface has not
//! appeared in the pod yet are retried until the pod deadline.

use std::collections::BTreeMap;

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use super::Workflow;
use crate::errors::{AttachResult, CommandError};
use crate::render::NodeInterfaceConfig;

/// Error fragments meaning the target device is not visible in the pod yet
pub const DEVICE_PENDING_PHRASES: [&str; 3] = ["Device \"", "Cannot find device", "does not exist"];

/// Whether a failed command only saw a not-yet-created device
pub fn is_device_pending(err: &CommandError) -> bool {
    DEVICE_PENDING_PHRASES
        .iter()
        .any(|phrase| err.mentions(phrase))
}

/// Shell script assigning the address, creating the VLAN sub-interface if needed
pub fn configure_script(config: &NodeInterfaceConfig) -> String {
    let base = &config.interface;
    let ip = &config.ip_address;
    let target = config.target_interface();

    let mut script = match &config.vlan {
        Some(vlan) => format!(
            "ip link set {base} up \
             && (ip link show {target} >/dev/null 2>&1 || ip link add link {base} name {target} type vlan id {vlan}) \
             && ip link set {target} up \
             && ip addr flush dev {target} \
             && ip addr add {ip} dev {target}"
        ),
        None => format!(
            "ip addr flush dev {base} \
             && ip addr add {ip} dev {base} \
             && ip link set {base} up"
        ),
    };

    if let Some(gateway) = &config.gateway {
        let gateway = gateway.split('/').next().unwrap_or(gateway);
        script.push_str(&format!(" && ip route replace default via {gateway} dev {target}"));
    }
    script
}

impl Workflow<'_> {
    /// Push every interface config, resolving pods not awaited earlier
    pub(super) async fn configure_interfaces(
        &self,
        configs: &[NodeInterfaceConfig],
        pods: &mut BTreeMap<String, String>,
    ) -> AttachResult<Vec<String>> {
        let mut configured = Vec::with_capacity(configs.len());

        for config in configs {
            let vlan_suffix = config
                .vlan
                .as_ref()
                .map(|vlan| format!(".{vlan}"))
                .unwrap_or_default();
            self.echo(format!(
                "Configuring {}: {}{vlan_suffix} -> {}",
                config.name, config.interface, config.ip_address
            ));

            let pod = match pods.get(&config.name) {
                Some(pod) => pod.clone(),
                None => {
                    let pod = self.wait_for_pod(&config.name).await?;
                    pods.insert(config.name.clone(), pod.clone());
                    pod
                }
            };

            self.push_config(config, &pod).await?;
            info!(device = %config.name, pod = %pod, interface = %config.target_interface(), "interface configured");

            if self.config.debug {
                let state = self
                    .pods
                    .exec(
                        &self.config.core_namespace,
                        &pod,
                        &config.name,
                        &["ip", "addr", "show", config.interface.as_str()].map(str::to_string),
                    )
                    .await?;
                self.echo(format!("Debug: interface state for {}\n{state}", config.name));
            }
            configured.push(config.name.clone());
        }

        Ok(configured)
    }

    async fn push_config(&self, config: &NodeInterfaceConfig, pod: &str) -> AttachResult<()> {
        let command = ["sh".to_string(), "-c".to_string(), configure_script(config)];
        let deadline = Instant::now() + self.config.timeouts.pod_deadline;

        loop {
            match self
                .pods
                .exec(&self.config.core_namespace, pod, &config.name, &command)
                .await
            {
                Ok(_) => return Ok(()),
                Err(err) if is_device_pending(&err) && Instant::now() < deadline => {
                    warn!(device = %config.name, error = %err, "interface not visible yet, retrying");
                    sleep(self.config.timeouts.poll_interval).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

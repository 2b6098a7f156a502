// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subprocess execution

use std::io::ErrorKind;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::CommandError;

/// Runs an external program and returns its trimmed stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

/// Command line as shown in errors and debug output
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
        let rendered = command_line(program, args);
        debug!(command = %rendered, "running command");

        let output = match Command::new(program).args(args).output().await {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(CommandError::NotFound { command: rendered });
            }
            Err(err) => return Err(CommandError::failed(rendered, "", err.to_string())),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(command = %rendered, status = ?output.status.code(), "command failed");
            return Err(CommandError::failed(rendered, stdout, stderr));
        }

        Ok(stdout.trim_end().to_string())
    }
}

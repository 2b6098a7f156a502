// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for simulation attachment operations

use std::fmt;

use thiserror::Error;

/// Errors that can occur while planning, rendering or applying a simulation
#[derive(Debug, Error)]
pub enum AttachError {
    /// Malformed, missing or inconsistent simulation input
    #[error("Invalid simulation spec: {0}")]
    Spec(String),

    /// External command exited non-zero or could not be started
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Deadline exceeded waiting for a simulation pod or device
    #[error("Timed out waiting for pod backing sim node {device}")]
    Timeout { device: String },

    /// Manifest file could not be written or removed
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for attachment operations
pub type AttachResult<T> = Result<T, AttachError>;

impl AttachError {
    /// Shorthand for a [`AttachError::Spec`] error
    pub fn spec(message: impl Into<String>) -> Self {
        AttachError::Spec(message.into())
    }
}

impl From<std::io::Error> for AttachError {
    fn from(err: std::io::Error) -> Self {
        AttachError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AttachError {
    fn from(err: serde_json::Error) -> Self {
        AttachError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AttachError {
    fn from(err: serde_yaml::Error) -> Self {
        AttachError::Serialization(err.to_string())
    }
}

/// Failure of an external command invocation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Process ran and exited non-zero
    #[error("{0}")]
    Failed(CommandFailure),

    /// Executable could not be spawned
    #[error("Executable not found for command: {command}")]
    NotFound { command: String },
}

impl CommandError {
    /// Build a failure from captured process output
    pub fn failed(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        CommandError::Failed(CommandFailure {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
        })
    }

    /// Whether any captured text contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }
}

/// Captured output of a failed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn captured(text: &str) -> &str {
            let text = text.trim_end();
            if text.is_empty() {
                "<empty>"
            } else {
                text
            }
        }

        write!(
            f,
            "Command failed: {}\nstdout: {}\nstderr: {}",
            self.command,
            captured(&self.stdout),
            captured(&self.stderr)
        )
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operator-facing output
//!
//! Progress lines an operator reads are kept apart from `tracing` diagnostics so
//! they can be captured and asserted on.

use std::sync::Mutex;

/// Sink for operator-facing progress lines
pub trait Console: Send + Sync {
    /// Emit one (possibly multi-line) message
    fn echo(&self, message: &str);
}

/// Writes to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn echo(&self, message: &str) {
        println!("{message}");
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// All messages joined by newlines
    pub fn transcript(&self) -> String {
        self.lines().join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Console for RecordingConsole {
    fn echo(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

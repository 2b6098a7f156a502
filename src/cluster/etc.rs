// Copyright (c) 2025 - Cowboy AI, Inc.
//! `etc` adapter: reconciles manifest bundles against the platform

use std::path::Path;

use async_trait::async_trait;

use super::process::{CommandRunner, ProcessRunner};
use super::Orchestrator;
use crate::errors::CommandError;

/// Manifest apply/delete through the `etc` CLI
#[derive(Debug, Clone)]
pub struct Etc<R = ProcessRunner> {
    runner: R,
    program: String,
}

impl Default for Etc<ProcessRunner> {
    fn default() -> Self {
        Self::new(ProcessRunner)
    }
}

impl<R: CommandRunner> Etc<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "etc".to_string(),
        }
    }

    async fn run(&self, verb: &str, manifest: &Path, dry_run: bool) -> Result<String, CommandError> {
        let mut args = vec![
            verb.to_string(),
            "-f".to_string(),
            manifest.display().to_string(),
        ];
        if dry_run {
            args.push("--dry-run".to_string());
        }
        self.runner.run(&self.program, &args).await
    }
}

#[async_trait]
impl<R: CommandRunner> Orchestrator for Etc<R> {
    async fn apply(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError> {
        self.run("apply", manifest, dry_run).await
    }

    async fn delete(&self, manifest: &Path, dry_run: bool) -> Result<String, CommandError> {
        self.run("delete", manifest, dry_run).await
    }
}

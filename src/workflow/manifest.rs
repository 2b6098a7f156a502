// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manifest files handed to the orchestration tool

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AttachResult;

/// A written manifest; scratch files are removed on drop
#[derive(Debug)]
pub struct ManifestFile {
    path: PathBuf,
    keep: bool,
}

impl ManifestFile {
    /// Write `text` to `target`, or to a fresh scratch file when `target` is `None`
    ///
    /// A caller-chosen target is kept on disk for inspection; its parent
    /// directories are created as needed.
    pub fn write(text: &str, target: Option<&Path>) -> AttachResult<Self> {
        let (path, keep) = match target {
            Some(target) => {
                if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                (target.to_path_buf(), true)
            }
            None => (
                std::env::temp_dir().join(format!("cx-attach-{}.yaml", Uuid::now_v7())),
                false,
            ),
        };

        std::fs::write(&path, text)?;
        debug!(path = %path.display(), keep, "manifest written");
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_kept(&self) -> bool {
        self.keep
    }
}

impl Drop for ManifestFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "scratch manifest removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), error = %err, "failed to remove scratch manifest"),
        }
    }
}

//! Completion marker: written into the environment after a fully successful run.
//!
//! A marker whose manifest digest matches the current manifest means the
//! environment is already in its final state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::BootstrapError;

/// Marker file name inside the environment directory.
pub const MARKER_FILE: &str = ".vmd_bootstrap_complete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMarker {
    pub manifest_sha256: String,
    pub python_version: String,
    pub completed_at: DateTime<Utc>,
}

impl CompletionMarker {
    pub fn new(manifest_content: &str, python_version: &str) -> Self {
        Self {
            manifest_sha256: manifest_digest(manifest_content),
            python_version: python_version.to_string(),
            completed_at: Utc::now(),
        }
    }

    pub fn matches(&self, manifest_content: &str, python_version: &str) -> bool {
        self.manifest_sha256 == manifest_digest(manifest_content)
            && self.python_version == python_version
    }
}

pub fn manifest_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn marker_path(env_root: &Path) -> PathBuf {
    env_root.join(MARKER_FILE)
}

/// Read the marker; a missing or unreadable marker is treated as absent.
pub fn read(env_root: &Path) -> Option<CompletionMarker> {
    let content = std::fs::read_to_string(marker_path(env_root)).ok()?;
    match serde_json::from_str(&content) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring corrupt completion marker");
            None
        }
    }
}

pub fn write(env_root: &Path, marker: &CompletionMarker) -> Result<(), BootstrapError> {
    let path = marker_path(env_root);
    let json = serde_json::to_string_pretty(marker).map_err(|e| {
        BootstrapError::io(
            "Serialize completion marker",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })?;
    std::fs::write(&path, json)
        .map_err(|e| BootstrapError::io(format!("Write {}", path.display()), e))
}

/// Remove the marker before mutating the environment.
pub fn clear(env_root: &Path) -> Result<(), BootstrapError> {
    let path = marker_path(env_root);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BootstrapError::io(format!("Remove {}", path.display()), e)),
    }
}

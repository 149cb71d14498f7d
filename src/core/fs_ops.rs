// src/core/fs_ops.rs
//! Profile file loading

use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{ActionError, Result};

/// A profile file as read from disk: the exact bytes plus the parsed document
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub raw: Vec<u8>,
    pub document: Value,
}

pub struct FsOps;

impl FsOps {
    /// Read and parse a YAML profile. `display_path` is what error messages show.
    pub async fn read_profile(path: &Path, display_path: &Path) -> Result<LoadedProfile> {
        debug!("Reading profile from: {}", path.display());

        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(ActionError::ProfileNotFound {
                path: display_path.to_path_buf(),
            });
        }

        let raw = fs::read(path)
            .await
            .map_err(|e| ActionError::profile_read(format!("{}: {}", path.display(), e)))?;

        let document = Self::parse_yaml(&raw)?;

        Ok(LoadedProfile {
            raw,
            document,
        })
    }

    /// Parse YAML into an untyped document. An empty file is a null document.
    pub fn parse_yaml(raw: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| ActionError::profile_read(format!("file is not valid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_yaml::from_str(text).map_err(|e| ActionError::profile_read(e.to_string()))
    }
}

// src/context.rs
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{ActionError, Result};

const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_COMMIT_MESSAGE: &str = "Update profile";

/// What the workflow run is acting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub owner: String,
    pub repo: String,
    pub actor: String,
    pub event_name: String,
    pub git_ref: String,
    pub sha: String,
    pub server_url: String,
    pub commit_message: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    head_commit: Option<HeadCommit>,
}

#[derive(Debug, Deserialize)]
struct HeadCommit {
    message: Option<String>,
}

impl RunContext {
    /// Load the context from the variables the runner exports
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ActionError::context(format!("{} is not set", key)))
        };

        let repository = required("GITHUB_REPOSITORY")?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| {
                ActionError::context(format!(
                    "GITHUB_REPOSITORY must look like owner/repo, got '{}'",
                    repository
                ))
            })?;

        let commit_message = lookup("GITHUB_EVENT_PATH")
            .filter(|p| !p.is_empty())
            .and_then(|p| Self::read_head_commit_message(&PathBuf::from(p)))
            .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string());

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            actor: required("GITHUB_ACTOR")?,
            event_name: required("GITHUB_EVENT_NAME")?,
            git_ref: lookup("GITHUB_REF").unwrap_or_default(),
            sha: required("GITHUB_SHA")?,
            server_url: lookup("GITHUB_SERVER_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            commit_message,
        })
    }

    fn read_head_commit_message(path: &PathBuf) -> Option<String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read event payload {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<EventPayload>(&content) {
            Ok(event) => event
                .head_commit
                .and_then(|c| c.message)
                .filter(|m| !m.is_empty()),
            Err(e) => {
                debug!("Event payload has no usable head_commit: {}", e);
                None
            }
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn repository_url(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), self.full_name())
    }
}

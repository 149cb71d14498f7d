// src/types/payload.rs
//! Request bodies sent to the profile webhook

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RunContext;
use crate::types::profile::ProfileDocument;

/// Which request body shape to send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PayloadFormat {
    /// Raw profile file, base64 encoded
    #[default]
    Encoded,
    /// Parsed profile with repository and commit metadata
    Structured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedPayload {
    pub profile_content: String,
    pub repository: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub commit_sha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPayload {
    pub profile: ProfileDocument,
    pub repository: RepositoryInfo,
    pub commit: CommitInfo,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub owner: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Encoded(EncodedPayload),
    Structured(StructuredPayload),
}

impl EncodedPayload {
    pub fn new(raw_profile: &[u8], ctx: &RunContext) -> Self {
        Self {
            profile_content: STANDARD.encode(raw_profile),
            repository: ctx.full_name(),
            git_ref: ctx.git_ref.clone(),
            commit_sha: ctx.sha.clone(),
        }
    }

    /// Recover the raw profile bytes, as the receiving service does
    pub fn decode_profile(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.profile_content)
    }
}

impl StructuredPayload {
    pub fn new(profile: ProfileDocument, ctx: &RunContext, now: DateTime<Utc>) -> Self {
        Self {
            profile,
            repository: RepositoryInfo {
                owner: ctx.owner.clone(),
                name: ctx.repo.clone(),
                url: ctx.repository_url(),
            },
            commit: CommitInfo {
                sha: ctx.sha.clone(),
                message: ctx.commit_message.clone(),
                author: ctx.actor.clone(),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl WebhookPayload {
    /// The encoded form never looks at the parsed document; only the
    /// structured form converts it to `ProfileDocument`.
    pub fn build(
        format: PayloadFormat,
        raw_profile: &[u8],
        document: &Value,
        ctx: &RunContext,
    ) -> Result<Self, serde_json::Error> {
        Ok(match format {
            PayloadFormat::Encoded => Self::Encoded(EncodedPayload::new(raw_profile, ctx)),
            PayloadFormat::Structured => {
                let profile = ProfileDocument::from_value(document.clone())?;
                Self::Structured(StructuredPayload::new(profile, ctx, Utc::now()))
            }
        })
    }
}

// src/cli.rs
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{ActionConfig, DEFAULT_AUDIENCE, DEFAULT_PROFILE_URL, DEFAULT_REPOSITORY_NAME};
use crate::error::Result;
use crate::types::payload::PayloadFormat;

/// Every flag falls back to the `INPUT_*` variable the Actions runner sets
/// for the matching `with:` key.
#[derive(Debug, Parser)]
#[command(name = "profile-action")]
#[command(about = "Validate profile.yaml and publish it to profiles.dev")]
pub struct ActionCli {
    /// Webhook endpoint that receives the profile
    #[arg(long, env = "INPUT_API-ENDPOINT")]
    pub api_endpoint: String,

    /// Profile file, relative to the workspace
    #[arg(long, env = "INPUT_PROFILE-PATH", default_value = "profile.yaml")]
    pub profile_path: PathBuf,

    /// Verbose logging
    #[arg(long, env = "INPUT_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Audience requested for the OIDC token
    #[arg(long, env = "INPUT_AUDIENCE", default_value = DEFAULT_AUDIENCE)]
    pub audience: String,

    /// Request body shape
    #[arg(long, env = "INPUT_PAYLOAD-FORMAT", value_enum, default_value_t = PayloadFormat::Encoded)]
    pub payload_format: PayloadFormat,

    /// Repository name the service accepts profiles from
    #[arg(long, env = "INPUT_REPOSITORY-NAME", default_value = DEFAULT_REPOSITORY_NAME)]
    pub repository_name: String,

    /// Skip the repository, event and actor checks
    #[arg(long, env = "INPUT_SKIP-PREFLIGHT", value_parser = FalseyValueParser::new())]
    pub skip_preflight: bool,

    /// Public profile base URL, used in the run summary
    #[arg(long, env = "INPUT_PROFILE-URL", default_value = DEFAULT_PROFILE_URL)]
    pub profile_url: String,

    /// Use this token instead of requesting one from the runner
    #[arg(long, env = "PROFILE_ID_TOKEN", hide_env_values = true)]
    pub id_token: Option<String>,
}

impl ActionCli {
    pub fn into_config(self) -> Result<ActionConfig> {
        ActionConfig::new(&self.api_endpoint)?
            .with_profile_path(self.profile_path)
            .with_debug(self.debug)
            .with_audience(self.audience)
            .with_payload_format(self.payload_format)
            .with_repository_name(self.repository_name)
            .with_preflight(!self.skip_preflight)
            .with_profile_url(self.profile_url)
            .with_static_token(self.id_token)
            .validated()
    }
}

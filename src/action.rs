// src/action.rs
//! One pass: preflight, load, validate, token, send, classify, report

use tracing::{debug, info};

use crate::config::ActionConfig;
use crate::context::RunContext;
use crate::core::oidc::{inspect_token, RunnerOidcProvider};
use crate::core::{FsOps, IdentityTokenProvider, LoadedProfile, StaticTokenProvider, WebhookClient};
use crate::error::{ActionError, Result};
use crate::outcome::{Outcome, OutcomeClassifier};
use crate::report::StepReporter;
use crate::types::payload::WebhookPayload;
use crate::utils::same_login;
use crate::validator::ProfileValidator;

pub struct ProfileAction<'a> {
    config: &'a ActionConfig,
    ctx: &'a RunContext,
    tokens: &'a dyn IdentityTokenProvider,
    client: &'a WebhookClient,
}

impl<'a> ProfileAction<'a> {
    pub fn new(
        config: &'a ActionConfig,
        ctx: &'a RunContext,
        tokens: &'a dyn IdentityTokenProvider,
        client: &'a WebhookClient,
    ) -> Self {
        Self {
            config,
            ctx,
            tokens,
            client,
        }
    }

    /// Requirements the service enforces, checked before any work is done
    pub fn preflight(&self) -> Result<()> {
        let expected = &self.config.repository_name;
        if &self.ctx.repo != expected {
            return Err(ActionError::preflight(format!(
                "Repository name must be \"{}\" but found \"{}\". Please rename your repository to \"{}/{}\".",
                expected, self.ctx.repo, self.ctx.owner, expected
            )));
        }

        if self.ctx.event_name != "push" {
            return Err(ActionError::preflight(format!(
                "Only push events are supported. Found event type: {}",
                self.ctx.event_name
            )));
        }

        if !same_login(&self.ctx.actor, &self.ctx.owner) {
            return Err(ActionError::preflight(format!(
                "Push events must come from the repository owner. Actor: {}, Owner: {}",
                self.ctx.actor, self.ctx.owner
            )));
        }

        Ok(())
    }

    /// Read the profile file and run the validator over it
    pub async fn load_and_validate(&self) -> Result<LoadedProfile> {
        info!("📖 Reading profile from {}", self.config.profile_path.display());
        let loaded = FsOps::read_profile(
            &self.config.profile_path_absolute(),
            &self.config.profile_path,
        )
        .await?;

        if self.config.debug {
            debug!(
                "Profile data: {}",
                serde_json::to_string_pretty(&loaded.document).unwrap_or_default()
            );
        }

        info!("✅ Validating profile data");
        let validation = ProfileValidator::validate(&loaded.document);
        if !validation.valid {
            return Err(ActionError::InvalidProfile {
                errors: validation.errors,
            });
        }
        info!("✨ Profile validation successful");

        Ok(loaded)
    }

    pub async fn run(&self) -> Result<Outcome> {
        info!("🚀 Starting profiles.dev update for {}", self.ctx.full_name());

        if self.config.preflight {
            self.preflight()?;
        } else {
            debug!("Preflight checks skipped");
        }

        let loaded = self.load_and_validate().await?;

        info!("🔐 Obtaining OIDC token");
        let token = self.tokens.id_token(&self.config.audience).await?;
        inspect_token(&token)?;

        let payload = WebhookPayload::build(
            self.config.payload_format,
            &loaded.raw,
            &loaded.document,
            self.ctx,
        )
        .map_err(|e| ActionError::payload(e.to_string()))?;
        if self.config.debug {
            debug!(
                "Webhook payload: {}",
                serde_json::to_string_pretty(&payload).unwrap_or_default()
            );
        }

        info!("📤 Sending profile update to profiles.dev");
        let delivery = self.client.deliver(&payload, &token, self.ctx).await;

        let classifier = OutcomeClassifier::new(self.ctx, &self.config.repository_name);
        Ok(delivery.classify(&classifier))
    }
}

/// Static token when one was supplied, the runner's OIDC endpoint otherwise
pub fn token_provider(config: &ActionConfig) -> Box<dyn IdentityTokenProvider> {
    match &config.static_token {
        Some(token) => Box::new(StaticTokenProvider::new(token.clone())),
        None => Box::new(RunnerOidcProvider),
    }
}

/// Run the whole pass against the given context and report it.
/// Returns whether the run succeeded; `Err` only for reporting failures.
pub async fn execute(
    config: &ActionConfig,
    ctx: &RunContext,
    tokens: &dyn IdentityTokenProvider,
    reporter: &StepReporter,
) -> anyhow::Result<bool> {
    let result = match WebhookClient::new(config.api_endpoint.clone()) {
        Ok(client) => ProfileAction::new(config, ctx, tokens, &client).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            reporter.report_outcome(&outcome, ctx, config)?;
            Ok(outcome.is_success())
        }
        Err(err) => {
            if config.debug {
                debug!("{:?}", err);
            }
            reporter.report_failure(&err)?;
            Ok(false)
        }
    }
}

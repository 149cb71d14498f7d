// src/core/webhook_client.rs
//! Webhook client - one authenticated POST per run, never retried

use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::config::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::context::RunContext;
use crate::error::Result;
use crate::outcome::{Outcome, OutcomeClassifier};
use crate::types::payload::WebhookPayload;
use crate::types::response::WebhookResponse;

/// What came back from the single webhook call
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Responded {
        status: u16,
        body: Option<WebhookResponse>,
        raw_body: String,
    },
    /// No HTTP response: connect error, DNS failure or timeout
    Failed { error: String },
}

impl Delivery {
    pub fn classify(&self, classifier: &OutcomeClassifier<'_>) -> Outcome {
        match self {
            Self::Responded {
                status,
                body,
                raw_body,
            } => {
                if body.is_none() && !raw_body.is_empty() {
                    debug!("Response body is not a JSON object: {}", raw_body);
                }
                classifier.classify(*status, body.as_ref())
            }
            Self::Failed { error } => OutcomeClassifier::transport_failure(error),
        }
    }
}

pub struct WebhookClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new(endpoint: Url) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// POST the payload with the run's identity headers
    pub async fn deliver(
        &self,
        payload: &WebhookPayload,
        token: &str,
        ctx: &RunContext,
    ) -> Delivery {
        info!("Sending profile update to {}", self.endpoint);

        let result = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .bearer_auth(token)
            .header("X-GitHub-Repository", ctx.full_name())
            .header("X-GitHub-Actor", &ctx.actor)
            .header("X-GitHub-SHA", &ctx.sha)
            .json(payload)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    format!("timeout of {}ms exceeded", self.timeout.as_millis())
                } else {
                    e.to_string()
                };
                debug!("Webhook request failed without a response: {:?}", e);
                return Delivery::Failed { error };
            }
        };

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        let raw_body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                debug!("Could not read response body: {}", e);
                String::new()
            }
        };
        debug!("Response data: {}", raw_body);

        Delivery::Responded {
            status,
            body: WebhookResponse::parse(&raw_body),
            raw_body,
        }
    }
}

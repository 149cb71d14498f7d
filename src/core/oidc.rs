// src/core/oidc.rs
//! Identity tokens proving the run's provenance to the profile service

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{ActionError, Result};

const REQUEST_URL_VAR: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";
const REQUEST_TOKEN_VAR: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";
const TOKEN_REQUEST_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait IdentityTokenProvider: Send + Sync {
    /// Bearer token for `audience`
    async fn id_token(&self, audience: &str) -> Result<String>;
}

/// Fetches tokens from the Actions runner's OIDC endpoint
pub struct GitHubOidcProvider {
    client: reqwest::Client,
    request_url: String,
    request_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    value: Option<String>,
}

impl GitHubOidcProvider {
    pub fn new(request_url: String, request_token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TOKEN_REQUEST_TIMEOUT_SECS))
            .user_agent("actions/oidc-client")
            .build()?;

        Ok(Self {
            client,
            request_url,
            request_token,
        })
    }

    pub fn from_env() -> Result<Self> {
        let read = |key: &str| {
            std::env::var(key).ok().filter(|v| !v.is_empty()).ok_or_else(|| {
                ActionError::token(format!(
                    "{} is not set. Make sure the workflow grants `permissions: id-token: write`",
                    key
                ))
            })
        };
        Self::new(read(REQUEST_URL_VAR)?, read(REQUEST_TOKEN_VAR)?)
    }

    fn token_url(&self, audience: &str) -> Result<Url> {
        let mut url = Url::parse(&self.request_url)
            .map_err(|e| ActionError::token(format!("invalid token request URL: {}", e)))?;
        url.query_pairs_mut().append_pair("audience", audience);
        Ok(url)
    }
}

#[async_trait]
impl IdentityTokenProvider for GitHubOidcProvider {
    async fn id_token(&self, audience: &str) -> Result<String> {
        let url = self.token_url(audience)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.request_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ActionError::token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ActionError::token(format!(
                "token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ActionError::token(format!("unreadable token response: {}", e)))?;

        body.value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ActionError::token("response did not contain a token value"))
    }
}

/// Reads the runner's OIDC variables only once a token is actually needed,
/// so a run that fails validation never touches them
pub struct RunnerOidcProvider;

#[async_trait]
impl IdentityTokenProvider for RunnerOidcProvider {
    async fn id_token(&self, audience: &str) -> Result<String> {
        GitHubOidcProvider::from_env()?.id_token(audience).await
    }
}

/// A token supplied up front, for local runs
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl IdentityTokenProvider for StaticTokenProvider {
    async fn id_token(&self, _audience: &str) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub aud: Option<serde_json::Value>,
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Read claims without verifying the signature. The receiving service
    /// verifies; this is for diagnostics only.
    pub fn peek(token: &str) -> Option<Self> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .ok()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

/// Log what the token claims and refuse one that has already expired
pub fn inspect_token(token: &str) -> Result<()> {
    let Some(claims) = TokenClaims::peek(token) else {
        debug!("Identity token is not a readable JWT; sending as is");
        return Ok(());
    };

    debug!(
        "Identity token issuer={} subject={} expires={}",
        claims.iss.as_deref().unwrap_or("-"),
        claims.sub.as_deref().unwrap_or("-"),
        claims
            .exp
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    if claims.is_expired(chrono::Utc::now().timestamp()) {
        return Err(ActionError::token("identity token has already expired"));
    }

    info!("Identity token obtained");
    Ok(())
}

// src/outcome.rs
//! Maps a single webhook response to a reporting decision

use crate::context::RunContext;
use crate::types::response::WebhookResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    ValidationFailed,
    AuthFailed,
    RateLimited,
    ServerError,
    NotFound,
    GenericFailure,
}

/// Classified result of the webhook call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
    pub profile_id: Option<String>,
    pub errors: Vec<String>,
}

impl Outcome {
    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            profile_id: None,
            errors: Vec::new(),
        }
    }

    fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    /// Value of the `status` step output
    pub fn status_label(&self) -> &'static str {
        if self.is_success() {
            "success"
        } else {
            "failed"
        }
    }
}

/// Known reasons the service rejects a request with 400
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionHint {
    RepositoryName,
    ActorMismatch,
    UnsupportedEvent,
    NotDefaultBranch,
}

impl RejectionHint {
    fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "REPOSITORY_VALIDATION_FAILED" | "INVALID_REPOSITORY" => Some(Self::RepositoryName),
            "ACTOR_MISMATCH" => Some(Self::ActorMismatch),
            "UNSUPPORTED_EVENT" | "INVALID_EVENT" => Some(Self::UnsupportedEvent),
            "NOT_DEFAULT_BRANCH" => Some(Self::NotDefaultBranch),
            _ => None,
        }
    }

    // Older deployments only send free text.
    fn from_message(message: &str) -> Option<Self> {
        if message.contains("repository validation failed") {
            Some(Self::RepositoryName)
        } else if message.contains("actor mismatch") {
            Some(Self::ActorMismatch)
        } else if message.contains("only push events") {
            Some(Self::UnsupportedEvent)
        } else if message.contains("default branch") {
            Some(Self::NotDefaultBranch)
        } else {
            None
        }
    }

    pub fn detect(body: Option<&WebhookResponse>, message: &str) -> Option<Self> {
        body.and_then(|b| b.code.as_deref())
            .and_then(Self::from_code)
            .or_else(|| Self::from_message(message))
    }

    fn instruction(&self, ctx: &RunContext, expected_repo: &str) -> String {
        match self {
            Self::RepositoryName => format!(
                "Repository name must be exactly \"{}/{}\". Please rename your repository.",
                ctx.owner, expected_repo
            ),
            Self::ActorMismatch => format!(
                "Push must come from repository owner. Current actor: {}, Expected: {}",
                ctx.actor, ctx.owner
            ),
            Self::UnsupportedEvent => format!(
                "Only push events to the default branch are supported. Current event: {}",
                ctx.event_name
            ),
            Self::NotDefaultBranch => "Only updates to the default branch are allowed. Please push to your default branch.".to_string(),
        }
    }
}

/// Turns a status code and optional body into an [`Outcome`].
///
/// Holds the run context so rejection hints can name the owner, actor and
/// event involved.
pub struct OutcomeClassifier<'a> {
    ctx: &'a RunContext,
    expected_repo: &'a str,
}

impl<'a> OutcomeClassifier<'a> {
    pub fn new(ctx: &'a RunContext, expected_repo: &'a str) -> Self {
        Self { ctx, expected_repo }
    }

    pub fn classify(&self, status: u16, body: Option<&WebhookResponse>) -> Outcome {
        let server_message = body.and_then(WebhookResponse::server_message);
        let errors = body.map(WebhookResponse::error_list).unwrap_or_default();

        match status {
            200..=299 => match body {
                Some(b) if b.indicates_success() => Outcome {
                    kind: OutcomeKind::Success,
                    message: server_message
                        .unwrap_or("Profile update accepted")
                        .to_string(),
                    profile_id: b.profile_id.clone().filter(|id| !id.is_empty()),
                    errors: Vec::new(),
                },
                _ => Outcome::new(
                    OutcomeKind::GenericFailure,
                    format!(
                        "Profile update failed: {}",
                        server_message.unwrap_or("the service did not confirm the update")
                    ),
                )
                .with_errors(errors),
            },
            401 => Outcome::new(
                OutcomeKind::AuthFailed,
                "Authentication failed. Please ensure the repository has proper permissions.",
            ),
            400 => {
                let transport = status_error_text(status);
                let message = server_message.unwrap_or(&transport);
                let display = match RejectionHint::detect(body, message) {
                    Some(hint) => hint.instruction(self.ctx, self.expected_repo),
                    None => format!("Invalid request: {}", message),
                };
                Outcome::new(OutcomeKind::ValidationFailed, display).with_errors(errors)
            }
            404 => Outcome::new(
                OutcomeKind::NotFound,
                "API endpoint not found. Please check the api-endpoint input.",
            ),
            429 => Outcome::new(
                OutcomeKind::RateLimited,
                "Rate limit exceeded. Please try again later.",
            ),
            500.. => Outcome::new(
                OutcomeKind::ServerError,
                format!(
                    "Server error ({}): {}",
                    status,
                    server_message.unwrap_or("Please try again later.")
                ),
            ),
            _ => Self::transport_failure(&status_error_text(status)),
        }
    }

    /// No response at all: connection refused, DNS failure, timeout
    pub fn transport_failure(error: &str) -> Outcome {
        Outcome::new(OutcomeKind::GenericFailure, format!("Request failed: {}", error))
    }
}

fn status_error_text(status: u16) -> String {
    format!("Request failed with status code {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RunContext {
        RunContext {
            owner: "octocat".to_string(),
            repo: "profiles.dev".to_string(),
            actor: "hubot".to_string(),
            event_name: "push".to_string(),
            git_ref: "refs/heads/main".to_string(),
            sha: "abc123".to_string(),
            server_url: "https://github.com".to_string(),
            commit_message: "Update profile".to_string(),
        }
    }

    fn body(json: &str) -> WebhookResponse {
        WebhookResponse::parse(json).unwrap()
    }

    #[test]
    fn test_success_with_profile_id() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(
            200,
            Some(&body(r#"{"success":true,"profileId":"p1","message":"ok"}"#)),
        );
        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert_eq!(outcome.profile_id.as_deref(), Some("p1"));
        assert_eq!(outcome.message, "ok");
        assert_eq!(outcome.status_label(), "success");
    }

    #[test]
    fn test_accepted_status_is_success() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev")
            .classify(202, Some(&body(r#"{"status":"accepted","message":"queued"}"#)));
        assert!(outcome.is_success());
        assert_eq!(outcome.profile_id, None);
    }

    #[test]
    fn test_unauthorized_ignores_body() {
        let ctx = ctx();
        let classifier = OutcomeClassifier::new(&ctx, "profiles.dev");
        for b in [
            None,
            Some(body(r#"{"success":true,"profileId":"p1"}"#)),
            Some(body(r#"{"message":"actor mismatch"}"#)),
        ] {
            let outcome = classifier.classify(401, b.as_ref());
            assert_eq!(outcome.kind, OutcomeKind::AuthFailed);
            assert_eq!(
                outcome.message,
                "Authentication failed. Please ensure the repository has proper permissions."
            );
        }
    }

    #[test]
    fn test_actor_mismatch_hint() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev")
            .classify(400, Some(&body(r#"{"message":"actor mismatch"}"#)));
        assert_eq!(outcome.kind, OutcomeKind::ValidationFailed);
        assert_eq!(
            outcome.message,
            "Push must come from repository owner. Current actor: hubot, Expected: octocat"
        );
    }

    #[test]
    fn test_actor_mismatch_hint_with_object_errors() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(
            400,
            Some(&body(r#"{"message":"actor mismatch","errors":[{"field":"actor"}]}"#)),
        );
        assert_eq!(outcome.kind, OutcomeKind::ValidationFailed);
        assert_eq!(
            outcome.message,
            "Push must come from repository owner. Current actor: hubot, Expected: octocat"
        );
    }

    #[test]
    fn test_numeric_profile_id_is_success() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(
            200,
            Some(&body(r#"{"success":true,"profileId":42,"message":"ok"}"#)),
        );
        assert!(outcome.is_success());
        assert_eq!(outcome.profile_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_structured_code_wins_over_message() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(
            400,
            Some(&body(
                r#"{"code":"NOT_DEFAULT_BRANCH","message":"actor mismatch somewhere"}"#,
            )),
        );
        assert_eq!(
            outcome.message,
            "Only updates to the default branch are allowed. Please push to your default branch."
        );
    }

    #[test]
    fn test_other_message_hints() {
        let ctx = ctx();
        let classifier = OutcomeClassifier::new(&ctx, "profiles.dev");
        let repo = classifier.classify(
            400,
            Some(&body(r#"{"message":"repository validation failed: name"}"#)),
        );
        assert_eq!(
            repo.message,
            "Repository name must be exactly \"octocat/profiles.dev\". Please rename your repository."
        );
        let event = classifier.classify(400, Some(&body(r#"{"message":"only push events"}"#)));
        assert_eq!(
            event.message,
            "Only push events to the default branch are supported. Current event: push"
        );
    }

    #[test]
    fn test_bad_request_without_hint_keeps_errors() {
        let ctx = ctx();
        let classifier = OutcomeClassifier::new(&ctx, "profiles.dev");
        let outcome = classifier.classify(
            400,
            Some(&body(r#"{"message":"bad yaml","errors":["line 3","line 9"]}"#)),
        );
        assert_eq!(outcome.message, "Invalid request: bad yaml");
        assert_eq!(outcome.errors, vec!["line 3", "line 9"]);

        let bare = classifier.classify(400, None);
        assert_eq!(
            bare.message,
            "Invalid request: Request failed with status code 400"
        );
    }

    #[test]
    fn test_not_found_and_rate_limited() {
        let ctx = ctx();
        let classifier = OutcomeClassifier::new(&ctx, "profiles.dev");
        assert_eq!(classifier.classify(404, None).kind, OutcomeKind::NotFound);
        assert_eq!(classifier.classify(429, None).kind, OutcomeKind::RateLimited);
    }

    #[test]
    fn test_server_error_message() {
        let ctx = ctx();
        let classifier = OutcomeClassifier::new(&ctx, "profiles.dev");
        let outcome = classifier.classify(503, Some(&body(r#"{"message":"db down"}"#)));
        assert_eq!(outcome.kind, OutcomeKind::ServerError);
        assert_eq!(outcome.message, "Server error (503): db down");

        let generic = classifier.classify(500, None);
        assert_eq!(generic.message, "Server error (500): Please try again later.");
    }

    #[test]
    fn test_application_failure_on_2xx() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(
            200,
            Some(&body(r#"{"success":false,"message":"duplicate","errors":["already queued"]}"#)),
        );
        assert_eq!(outcome.kind, OutcomeKind::GenericFailure);
        assert_eq!(outcome.message, "Profile update failed: duplicate");
        assert_eq!(outcome.errors, vec!["already queued"]);
        assert_eq!(outcome.status_label(), "failed");
    }

    #[test]
    fn test_unmapped_status_and_transport_failure() {
        let ctx = ctx();
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(403, None);
        assert_eq!(outcome.kind, OutcomeKind::GenericFailure);
        assert_eq!(outcome.message, "Request failed: Request failed with status code 403");

        let timeout = OutcomeClassifier::transport_failure("operation timed out");
        assert_eq!(timeout.message, "Request failed: operation timed out");
    }
}

// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for profile action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Local failures of a run. Webhook responses are not errors: they are
/// classified into an [`crate::outcome::Outcome`] instead.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Missing workflow context: {message}")]
    Context { message: String },

    #[error("{message}")]
    Preflight { message: String },

    #[error("Failed to read profile file: Profile file not found at: {}", path.display())]
    ProfileNotFound { path: PathBuf },

    #[error("Failed to read profile file: {message}")]
    ProfileRead { message: String },

    #[error("Profile validation failed with {} error(s)", errors.len())]
    InvalidProfile { errors: Vec<String> },

    #[error("Failed to get OIDC token: {message}")]
    Token { message: String },

    #[error("Failed to build webhook payload: {message}")]
    Payload { message: String },

    #[error("Failed to write step report: {0}")]
    Report(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ActionError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn context<S: Into<String>>(message: S) -> Self {
        Self::Context {
            message: message.into(),
        }
    }

    pub fn preflight<S: Into<String>>(message: S) -> Self {
        Self::Preflight {
            message: message.into(),
        }
    }

    pub fn profile_read<S: Into<String>>(message: S) -> Self {
        Self::ProfileRead {
            message: message.into(),
        }
    }

    pub fn token<S: Into<String>>(message: S) -> Self {
        Self::Token {
            message: message.into(),
        }
    }

    pub fn payload<S: Into<String>>(message: S) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Individual lines to emit after the headline, if any
    pub fn details(&self) -> &[String] {
        match self {
            Self::InvalidProfile { errors } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_profile_headline_counts_errors() {
        let err = ActionError::InvalidProfile {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Profile validation failed with 2 error(s)");
        assert_eq!(err.details().len(), 2);
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = ActionError::ProfileNotFound {
            path: PathBuf::from("profile.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read profile file: Profile file not found at: profile.yaml"
        );
        assert!(err.details().is_empty());
    }
}

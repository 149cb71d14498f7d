//! Validate a `profile.yaml` in a repository checkout and publish it to the
//! profiles.dev webhook from a GitHub Actions run.
//!
//! The two pieces with real decisions in them are [`validator`], which checks
//! the shape of the untyped document, and [`outcome`], which maps the single
//! webhook response to what the run reports.

pub mod action;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod report;
pub mod types;
pub mod utils;
pub mod validator;

pub use action::{execute, token_provider, ProfileAction};
pub use config::ActionConfig;
pub use context::RunContext;
pub use error::{ActionError, Result};
pub use outcome::{Outcome, OutcomeClassifier, OutcomeKind};
pub use validator::{ProfileValidator, ValidationResult};

// src/report.rs
//! Step outputs and the run summary

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::ActionConfig;
use crate::context::RunContext;
use crate::error::{ActionError, Result};
use crate::outcome::Outcome;

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";
const SUMMARY_FILE_VAR: &str = "GITHUB_STEP_SUMMARY";

/// Writes to the files the runner collects outputs and summaries from.
/// Without those files (local runs) everything is logged instead.
#[derive(Debug, Clone, Default)]
pub struct StepReporter {
    output_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl StepReporter {
    pub fn new(output_file: Option<PathBuf>, summary_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            summary_file,
        }
    }

    pub fn from_env() -> Self {
        let path = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self::new(path(OUTPUT_FILE_VAR), path(SUMMARY_FILE_VAR))
    }

    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            info!("output {}={}", name, value);
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(ActionError::config(format!(
                "output '{}' collides with the heredoc delimiter",
                name
            )));
        }

        append(path, &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
    }

    pub fn write_summary(&self, summary: &Summary) -> Result<()> {
        match &self.summary_file {
            Some(path) => append(path, summary.as_str()),
            None => {
                info!("Run summary:\n{}", summary.as_str());
                Ok(())
            }
        }
    }

    pub fn report_outcome(
        &self,
        outcome: &Outcome,
        ctx: &RunContext,
        config: &ActionConfig,
    ) -> Result<()> {
        if outcome.is_success() {
            info!("✅ Profile updated successfully!");
            if let Some(id) = &outcome.profile_id {
                info!("📋 Profile ID: {}", id);
                self.set_output("profile-id", id)?;
            }
            self.set_output("status", outcome.status_label())?;
            self.set_output("message", &outcome.message)?;

            let summary = Summary::new()
                .add_heading("profiles.dev Update Successful! 🎉")
                .add_raw(&format!("Profile for **{}** has been updated.", ctx.owner))
                .add_break()
                .add_raw(&format!(
                    "**Profile ID:** {}",
                    outcome.profile_id.as_deref().unwrap_or("N/A")
                ))
                .add_break()
                .add_raw(&format!("**Message:** {}", outcome.message))
                .add_break()
                .add_link("View your profile", &config.profile_page(&ctx.owner));
            self.write_summary(&summary)
        } else {
            error!("{}", outcome.message);
            for detail in &outcome.errors {
                error!("{}", detail);
            }
            self.set_output("status", outcome.status_label())?;
            self.set_output("message", &outcome.message)
        }
    }

    /// Report a failure that happened before any response was classified
    pub fn report_failure(&self, err: &ActionError) -> Result<()> {
        error!("{}", err);
        for detail in err.details() {
            error!("{}", detail);
        }
        self.set_output("status", "failed")?;
        self.set_output("message", &err.to_string())
    }
}

fn append(path: &PathBuf, content: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Run summary, rendered the way the Actions toolkit renders it
#[derive(Debug, Clone, Default)]
pub struct Summary {
    buffer: String,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_heading(mut self, text: &str) -> Self {
        self.buffer.push_str(&format!("<h1>{}</h1>\n", text));
        self
    }

    pub fn add_raw(mut self, text: &str) -> Self {
        self.buffer.push_str(text);
        self
    }

    pub fn add_break(mut self) -> Self {
        self.buffer.push_str("<br>\n");
        self
    }

    pub fn add_link(mut self, text: &str, href: &str) -> Self {
        self.buffer
            .push_str(&format!("<a href=\"{}\">{}</a>\n", href, text));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeClassifier;
    use crate::types::response::WebhookResponse;

    fn ctx() -> RunContext {
        RunContext {
            owner: "octocat".to_string(),
            repo: "profiles.dev".to_string(),
            actor: "octocat".to_string(),
            event_name: "push".to_string(),
            git_ref: "refs/heads/main".to_string(),
            sha: "abc123".to_string(),
            server_url: "https://github.com".to_string(),
            commit_message: "Update profile".to_string(),
        }
    }

    /// Parse `name<<delim\nvalue\ndelim` records back into pairs
    fn read_outputs(path: &PathBuf) -> Vec<(String, String)> {
        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        let mut outputs = Vec::new();
        while let Some(header) = lines.next() {
            let (name, delimiter) = header.split_once("<<").unwrap();
            let mut value = Vec::new();
            for line in lines.by_ref() {
                if line == delimiter {
                    break;
                }
                value.push(line);
            }
            outputs.push((name.to_string(), value.join("\n")));
        }
        outputs
    }

    #[test]
    fn test_success_writes_outputs_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let summary = dir.path().join("summary.md");
        let reporter = StepReporter::new(Some(output.clone()), Some(summary.clone()));

        let ctx = ctx();
        let config = ActionConfig::new("https://api.profiles.dev/webhook").unwrap();
        let body = WebhookResponse::parse(r#"{"success":true,"profileId":"p1","message":"ok"}"#);
        let outcome = OutcomeClassifier::new(&ctx, "profiles.dev").classify(200, body.as_ref());

        reporter.report_outcome(&outcome, &ctx, &config).unwrap();

        assert_eq!(
            read_outputs(&output),
            vec![
                ("profile-id".to_string(), "p1".to_string()),
                ("status".to_string(), "success".to_string()),
                ("message".to_string(), "ok".to_string()),
            ]
        );

        let summary = std::fs::read_to_string(summary).unwrap();
        assert!(summary.contains("Profile for **octocat** has been updated."));
        assert!(summary.contains("**Profile ID:** p1"));
        assert!(summary.contains("<a href=\"https://profiles.dev/octocat\">View your profile</a>"));
    }

    #[test]
    fn test_failure_writes_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let reporter = StepReporter::new(Some(output.clone()), None);

        let err = ActionError::InvalidProfile {
            errors: vec!["Invalid email format".to_string()],
        };
        reporter.report_failure(&err).unwrap();

        assert_eq!(
            read_outputs(&output),
            vec![
                ("status".to_string(), "failed".to_string()),
                (
                    "message".to_string(),
                    "Profile validation failed with 1 error(s)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_multiline_output_values_survive() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let reporter = StepReporter::new(Some(output.clone()), None);

        reporter.set_output("message", "line one\nline two").unwrap();
        assert_eq!(
            read_outputs(&output),
            vec![("message".to_string(), "line one\nline two".to_string())]
        );
    }

    #[test]
    fn test_without_files_nothing_is_written() {
        let reporter = StepReporter::default();
        assert!(reporter.set_output("status", "success").is_ok());
        assert!(reporter.write_summary(&Summary::new().add_raw("x")).is_ok());
    }
}

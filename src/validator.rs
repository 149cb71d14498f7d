// src/validator.rs
//! Shape checks for an untyped profile document

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static TWITTER_HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?[a-zA-Z0-9_]+$").expect("valid handle regex"));
static GITHUB_USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+(?:-[a-zA-Z0-9]+)*$").expect("valid username regex")
});

const GITHUB_USERNAME_MAX_LEN: usize = 39;

const STRING_FIELDS: &[&str] = &[
    "name", "bio", "company", "location", "email", "website", "twitter", "github", "linkedin",
];
const LINK_FIELDS: &[&str] = &["website", "twitter", "github", "linkedin"];
const STRING_ARRAY_FIELDS: &[&str] = &["skills", "languages"];

/// Outcome of a validation pass. `valid` always equals `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub struct ProfileValidator;

impl ProfileValidator {
    /// Run every check and collect all violations in check order
    pub fn validate(document: &Value) -> ValidationResult {
        let Some(profile) = document.as_object() else {
            return ValidationResult::from_errors(vec![
                "Profile data must be an object".to_string()
            ]);
        };

        let mut errors = Vec::new();
        Self::check_string_fields(profile, &mut errors);
        Self::check_email(profile, &mut errors);
        Self::check_links(profile, &mut errors);
        Self::check_string_arrays(profile, &mut errors);
        Self::check_projects(profile, &mut errors);
        Self::check_experience(profile, &mut errors);

        debug!("Profile validation completed with {} errors", errors.len());
        if !errors.is_empty() {
            debug!("Validation errors: {:?}", errors);
        }

        ValidationResult::from_errors(errors)
    }

    fn check_string_fields(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        for field in STRING_FIELDS {
            if let Some(value) = profile.get(*field) {
                if !value.is_string() {
                    errors.push(format!("Field '{}' must be a string", field));
                }
            }
        }
    }

    /// Any set value is checked; a non-string never matches
    fn check_email(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        let Some(email) = profile.get("email").filter(|v| is_set(v)) else {
            return;
        };
        if !email.as_str().is_some_and(|e| EMAIL_RE.is_match(e)) {
            errors.push("Invalid email format".to_string());
        }
    }

    fn check_links(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        for field in LINK_FIELDS {
            let Some(value) = non_empty_str(profile, field) else {
                continue;
            };
            if url::Url::parse(value).is_ok() {
                continue;
            }

            let bare = !value.starts_with("http");
            match *field {
                "twitter" if bare => {
                    if !TWITTER_HANDLE_RE.is_match(value) {
                        errors.push("Invalid Twitter handle format".to_string());
                    }
                }
                "github" if bare => {
                    if !is_github_username(value) {
                        errors.push("Invalid GitHub username format".to_string());
                    }
                }
                _ => errors.push(format!("Field '{}' must be a valid URL", field)),
            }
        }
    }

    fn check_string_arrays(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        for field in STRING_ARRAY_FIELDS {
            match profile.get(*field) {
                None => {}
                Some(Value::Array(items)) => {
                    if !items.iter().all(Value::is_string) {
                        errors.push(format!("All items in '{}' must be strings", field));
                    }
                }
                Some(_) => errors.push(format!("Field '{}' must be an array", field)),
            }
        }
    }

    fn check_projects(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        match profile.get("projects") {
            None => {}
            Some(Value::Array(projects)) => {
                for (index, project) in projects.iter().enumerate() {
                    if !has_non_empty_str(project, "name") {
                        errors.push(format!("Project at index {} must have a 'name' field", index));
                    }
                }
            }
            Some(_) => errors.push("Field 'projects' must be an array".to_string()),
        }
    }

    fn check_experience(profile: &Map<String, Value>, errors: &mut Vec<String>) {
        match profile.get("experience") {
            None => {}
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    for field in ["company", "position"] {
                        if !has_non_empty_str(entry, field) {
                            errors.push(format!(
                                "Experience at index {} must have a '{}' field",
                                index, field
                            ));
                        }
                    }
                }
            }
            Some(_) => errors.push("Field 'experience' must be an array".to_string()),
        }
    }
}

/// Alphanumeric runs joined by single hyphens, at most 39 characters
pub fn is_github_username(value: &str) -> bool {
    value.len() <= GITHUB_USERNAME_MAX_LEN && GITHUB_USERNAME_RE.is_match(value)
}

fn non_empty_str<'a>(profile: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    profile
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Null, false, zero and "" count as not set
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn has_non_empty_str(entry: &Value, field: &str) -> bool {
    entry
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

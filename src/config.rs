// src/config.rs
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{ActionError, Result};
use crate::types::payload::PayloadFormat;

pub const DEFAULT_AUDIENCE: &str = "api.profiles.dev";
pub const DEFAULT_REPOSITORY_NAME: &str = "profiles.dev";
pub const DEFAULT_PROFILE_URL: &str = "https://profiles.dev";
pub const USER_AGENT: &str = "profiles.dev-action/1.0";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub api_endpoint: Url,
    pub profile_path: PathBuf,
    pub debug: bool,
    pub audience: String,
    pub payload_format: PayloadFormat,
    pub repository_name: String,
    pub preflight: bool,
    pub profile_url: String,
    pub static_token: Option<String>,
    pub root_dir: PathBuf,
}

impl ActionConfig {
    pub fn new(api_endpoint: &str) -> Result<Self> {
        let api_endpoint = Url::parse(api_endpoint.trim()).map_err(|e| {
            ActionError::config(format!(
                "api-endpoint '{}' is not an absolute URL: {}",
                api_endpoint, e
            ))
        })?;

        // Capture the workspace at creation time
        let root_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            api_endpoint,
            profile_path: PathBuf::from("profile.yaml"),
            debug: false,
            audience: DEFAULT_AUDIENCE.to_string(),
            payload_format: PayloadFormat::default(),
            repository_name: DEFAULT_REPOSITORY_NAME.to_string(),
            preflight: true,
            profile_url: DEFAULT_PROFILE_URL.to_string(),
            static_token: None,
            root_dir,
        })
    }

    pub fn with_profile_path(mut self, path: PathBuf) -> Self {
        self.profile_path = path;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_audience(mut self, audience: String) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_payload_format(mut self, format: PayloadFormat) -> Self {
        self.payload_format = format;
        self
    }

    pub fn with_repository_name(mut self, name: String) -> Self {
        self.repository_name = name;
        self
    }

    pub fn with_preflight(mut self, enabled: bool) -> Self {
        self.preflight = enabled;
        self
    }

    pub fn with_profile_url(mut self, url: String) -> Self {
        self.profile_url = url;
        self
    }

    pub fn with_static_token(mut self, token: Option<String>) -> Self {
        self.static_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_root_dir(mut self, dir: PathBuf) -> Self {
        self.root_dir = dir;
        self
    }

    /// Reject values the run cannot proceed with
    pub fn validated(self) -> Result<Self> {
        if !matches!(self.api_endpoint.scheme(), "http" | "https") {
            return Err(ActionError::config(format!(
                "api-endpoint must use http or https, got '{}'",
                self.api_endpoint.scheme()
            )));
        }
        if self.profile_path.as_os_str().is_empty() {
            return Err(ActionError::config("profile-path must not be empty"));
        }
        if self.audience.trim().is_empty() {
            return Err(ActionError::config("audience must not be empty"));
        }
        Ok(self)
    }

    /// Profile path resolved against the workspace
    pub fn profile_path_absolute(&self) -> PathBuf {
        absolute_path(&self.root_dir, &self.profile_path)
    }

    /// Link to the public profile page for `owner`
    pub fn profile_page(&self, owner: &str) -> String {
        format!("{}/{}", self.profile_url.trim_end_matches('/'), owner)
    }
}

fn absolute_path(root: &Path, relative_path: &Path) -> PathBuf {
    if relative_path.is_absolute() {
        relative_path.to_path_buf()
    } else {
        root.join(relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_path_resolution() {
        let config = ActionConfig::new("https://api.profiles.dev/webhook")
            .unwrap()
            .with_root_dir(PathBuf::from("/work"))
            .with_profile_path(PathBuf::from("config/profile.yaml"));
        assert_eq!(
            config.profile_path_absolute(),
            PathBuf::from("/work/config/profile.yaml")
        );

        let absolute = config.with_profile_path(PathBuf::from("/tmp/p.yaml"));
        assert_eq!(absolute.profile_path_absolute(), PathBuf::from("/tmp/p.yaml"));
    }

    #[test]
    fn test_rejects_non_http_endpoints() {
        assert!(ActionConfig::new("not a url").is_err());
        let ftp = ActionConfig::new("ftp://example.com/hook").unwrap();
        assert!(ftp.validated().is_err());
    }

    #[test]
    fn test_blank_static_token_is_ignored() {
        let config = ActionConfig::new("https://example.com")
            .unwrap()
            .with_static_token(Some("  ".to_string()));
        assert!(config.static_token.is_none());
    }

    #[test]
    fn test_profile_page_link() {
        let config = ActionConfig::new("https://example.com")
            .unwrap()
            .with_profile_url("https://profiles.dev/".to_string());
        assert_eq!(config.profile_page("octocat"), "https://profiles.dev/octocat");
    }
}

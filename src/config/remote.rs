//! Remote history service configuration
//!
//! Tokens are normally supplied through the environment
//! (`KOGUI_ACCESS_TOKEN`, `KOGUI_REFRESH_TOKEN`) and are never written back
//! to the config file.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Send history to the remote service
    pub enabled: bool,
    /// Base API URL, e.g. "http://localhost:8000/api"
    pub api_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Bearer access token
    pub access_token: Option<String>,
    /// Refresh token, exchanged for a new access token on 401
    pub refresh_token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 10,
            access_token: None,
            refresh_token: None,
        }
    }
}

/// Remote settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileRemote {
    pub enabled: Option<bool>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl RemoteConfig {
    /// Create from file config; env values take precedence
    ///
    /// Remote sync turns on by itself when an access token is present and
    /// the file does not say otherwise.
    pub fn from_file(
        file: Option<FileRemote>,
        env_api_url: Option<String>,
        env_access_token: Option<String>,
        env_refresh_token: Option<String>,
    ) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let access_token = env_access_token
            .or(file.access_token)
            .filter(|t| !t.trim().is_empty());
        let refresh_token = env_refresh_token
            .or(file.refresh_token)
            .filter(|t| !t.trim().is_empty());

        Self {
            enabled: file.enabled.unwrap_or(access_token.is_some()),
            api_url: env_api_url.or(file.api_url).unwrap_or(defaults.api_url),
            timeout_secs: file
                .timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(defaults.timeout_secs),
            access_token,
            refresh_token,
        }
    }
}

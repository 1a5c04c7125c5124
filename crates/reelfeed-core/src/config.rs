//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend URL, feed page size, request timeout, where the
//! session token is persisted, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/reelfeed/config.json`. The backend
//! URL can be overridden with `REELFEED_API_URL`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};
use crate::routes::DEFAULT_LIMIT;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "reelfeed";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_url`
pub const API_URL_VAR: &str = "REELFEED_API_URL";

/// Environment variable pre-filling the login email
pub const EMAIL_VAR: &str = "REELFEED_EMAIL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub token_backend: TokenBackend,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: DEFAULT_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_backend: TokenBackend::default(),
            last_email: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Backend base URL, with `REELFEED_API_URL` taking precedence
    pub fn api_url(&self) -> Result<String> {
        self.api_url_with(std::env::var(API_URL_VAR).ok())
    }

    fn api_url_with(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone().filter(|url| !url.trim().is_empty()))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No backend URL configured. Set {} or api_url in {}",
                    API_URL_VAR,
                    CONFIG_FILE
                )
            })
    }

    /// Email to pre-fill on the login form
    pub fn default_email(&self) -> Option<String> {
        std::env::var(EMAIL_VAR)
            .ok()
            .filter(|email| !email.is_empty())
            .or_else(|| self.last_email.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Feed page size; zero falls back to the default
    pub fn page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_LIMIT
        } else {
            self.page_size
        }
    }

    /// The token store selected by `token_backend`
    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        Ok(match self.token_backend {
            TokenBackend::File => Box::new(FileTokenStore::new(self.cache_dir()?)),
            TokenBackend::Keyring => Box::new(KeyringTokenStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"api_url": "http://localhost:5000"}"#)
            .expect("parse failed");
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.last_email, None);
    }

    #[test]
    fn test_token_backend_names() {
        let config: Config =
            serde_json::from_str(r#"{"token_backend": "keyring"}"#).expect("parse failed");
        assert_eq!(config.token_backend, TokenBackend::Keyring);
        assert!(serde_json::from_str::<Config>(r#"{"token_backend": "vault"}"#).is_err());
    }

    #[test]
    fn test_env_url_wins_and_is_normalized() {
        let config = Config {
            api_url: Some("http://from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config
                .api_url_with(Some(" http://from-env:5000/ ".to_string()))
                .expect("url"),
            "http://from-env:5000"
        );
        assert_eq!(config.api_url_with(None).expect("url"), "http://from-config");
        assert_eq!(
            config.api_url_with(Some(String::new())).expect("url"),
            "http://from-config"
        );
    }

    #[test]
    fn test_missing_url_names_the_variable() {
        let err = Config::default().api_url_with(None).unwrap_err();
        assert!(err.to_string().contains(API_URL_VAR));
    }

    #[test]
    fn test_zero_values_fall_back() {
        let config = Config {
            page_size: 0,
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.page_size(), DEFAULT_LIMIT);
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}

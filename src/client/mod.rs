//! Feishu open platform client.
//!
//! One [`FeishuClient`] owns the credentials, an HTTP client and the two
//! access-token slots. It is `Send + Sync`; wrap it in an `Arc` to share.

pub mod auth;
pub mod bitable;
pub mod contact;
pub mod http;

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::{ApiConfig, CredentialsConfig};
use crate::error::{ApiError, ApiResult};

pub const APP_ID_ENV: &str = "FEISHU_APP_ID";
pub const APP_SECRET_ENV: &str = "FEISHU_APP_SECRET";

/// Application id and secret from the developer console.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> ApiResult<Self> {
        let app_id = app_id.into();
        let app_secret = app_secret.into();
        if app_id.is_empty() || app_secret.is_empty() {
            return Err(ApiError::validation("app_id and app_secret must be provided"));
        }
        Ok(Self { app_id, app_secret })
    }

    /// Read `FEISHU_APP_ID` / `FEISHU_APP_SECRET`.
    pub fn from_env() -> ApiResult<Self> {
        let app_id = std::env::var(APP_ID_ENV).unwrap_or_default();
        let app_secret = std::env::var(APP_SECRET_ENV).unwrap_or_default();
        Self::new(app_id, app_secret)
    }

    pub fn from_config(config: &CredentialsConfig) -> ApiResult<Self> {
        Self::new(
            config.app_id.clone().unwrap_or_default(),
            config.app_secret.clone().unwrap_or_default(),
        )
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub(crate) fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"***")
            .finish()
    }
}

#[derive(Debug)]
pub struct FeishuClient {
    credentials: Credentials,
    config: ApiConfig,
    http: Client,
    tokens: TokenCache,
}

impl FeishuClient {
    /// Client against the public endpoint with default timeout.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> ApiResult<Self> {
        Self::with_config(Credentials::new(app_id, app_secret)?, ApiConfig::default())
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::with_config(Credentials::from_env()?, ApiConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ApiConfig) -> ApiResult<Self> {
        if config.timeout_secs == 0 {
            return Err(ApiError::validation("timeout must be greater than zero"));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::request(format!("Failed to build HTTP client: {}", e)))?;

        debug!(app_id = credentials.app_id(), base_url = %config.base_url, "feishu client created");
        Ok(Self {
            credentials,
            config,
            http,
            tokens: TokenCache::new(),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(FeishuClient::new("", "secret").unwrap_err().is_validation());
        assert!(FeishuClient::new("cli_a", "").unwrap_err().is_validation());
    }

    #[test]
    fn secret_is_not_printed() {
        let credentials = Credentials::new("cli_a", "very-secret").unwrap();
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("cli_a"));
        assert!(!printed.contains("very-secret"));
    }

    #[test]
    fn config_credentials_must_be_complete() {
        let config = CredentialsConfig { app_id: Some("cli_a".to_owned()), app_secret: None };
        assert!(Credentials::from_config(&config).unwrap_err().is_validation());
    }
}

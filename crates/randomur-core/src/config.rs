//! Centralized configuration for the Randomur feed.
//!
//! Fixed values live in constant-holding structs; the gallery credential and
//! endpoint are supplied at runtime through [`GalleryConfig`].

use crate::{RandomurError, Result};
use std::time::Duration;

/// Gallery API constants.
pub struct GalleryDefaults;

impl GalleryDefaults {
    pub const API_BASE: &'static str = "https://api.imgur.com";
    pub const RANDOM_PATH: &'static str = "3/gallery/random/random";
    pub const IMAGE_HOST: &'static str = "https://i.imgur.com";
    /// Highest page the random gallery serves.
    pub const MAX_RANDOM_PAGES: u32 = 50;
    pub const CLIENT_ID_ENV: &'static str = "RANDOMUR_CLIENT_ID";
    pub const API_BASE_ENV: &'static str = "RANDOMUR_API_BASE";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = "Randomur/0.1";
    pub const PROBE_URL: &'static str = "https://api.imgur.com";
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const PROBE_INTERVAL: Duration = Duration::from_secs(30);
}

/// Runtime configuration for the gallery client.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Scheme and host of the gallery API, without a trailing slash.
    pub api_base: String,
    /// Application credential sent as `Authorization: Client-ID <id>`.
    pub client_id: String,
    /// Total timeout for one gallery request.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base: GalleryDefaults::API_BASE.to_string(),
            client_id: String::new(),
            timeout: NetworkConfig::REQUEST_TIMEOUT,
            user_agent: NetworkConfig::USER_AGENT.to_string(),
        }
    }
}

impl GalleryConfig {
    /// Create a config for the public gallery host with the given credential.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self::default().with_client_id(client_id)
    }

    /// Build a config from `RANDOMUR_CLIENT_ID` and `RANDOMUR_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let client_id =
            std::env::var(GalleryDefaults::CLIENT_ID_ENV).map_err(|_| RandomurError::Config {
                message: format!("{} is not set", GalleryDefaults::CLIENT_ID_ENV),
            })?;

        let mut config = Self::new(client_id);
        if let Ok(base) = std::env::var(GalleryDefaults::API_BASE_ENV) {
            config = config.with_api_base(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the application credential.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the credential is present and the base is an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(RandomurError::Config {
                message: "gallery client id must not be empty".to_string(),
            });
        }

        let parsed = url::Url::parse(&self.api_base).map_err(|e| RandomurError::Config {
            message: format!("invalid api base {:?}: {}", self.api_base, e),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RandomurError::Config {
                message: format!("api base must be http or https, got {}", parsed.scheme()),
            });
        }

        if self.timeout.is_zero() {
            return Err(RandomurError::Config {
                message: "request timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// The `Authorization` header value for this credential.
    pub fn authorization(&self) -> String {
        format!("Client-ID {}", self.client_id)
    }
}

//! Client configuration.
//!
//! Every field has a serde default, so a partial TOML or JSON document is a
//! valid configuration.

use crate::error::{Result, TrafficError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default GeoServer endpoint of the JARTIC open traffic service.
pub const DEFAULT_BASE_URL: &str = "https://api.jartic-open-traffic.org/geoserver";

/// Feature type holding 5-minute traffic counts at permanent observation points.
pub const DEFAULT_TYPE_NAME: &str = "t_travospublic_measure_5m";

/// Settings for the remote feature service client.
///
/// # Example
///
/// ```rust
/// use jartic::Config;
///
/// let json = r#"{
///     "request_timeout_secs": 10,
///     "max_concurrent_requests": 4
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.max_concurrent_requests, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// WFS endpoint queried once per time quantum
    #[serde(default = "Config::default_base_url")]
    pub base_url: String,

    /// Value of the `typeNames` query parameter
    #[serde(default = "Config::default_type_name")]
    pub type_name: String,

    /// Total timeout for a single quantum's request
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on in-flight quantum requests. 1 fetches strictly in sequence.
    #[serde(default = "Config::default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    #[serde(default = "Config::default_user_agent")]
    pub user_agent: String,
}

impl Config {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_type_name() -> String {
        DEFAULT_TYPE_NAME.to_string()
    }

    const fn default_request_timeout_secs() -> u64 {
        30
    }

    const fn default_max_concurrent_requests() -> usize {
        1
    }

    fn default_user_agent() -> String {
        format!("jartic/{}", crate::VERSION)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Allow up to `limit` quantum requests in flight at once.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(TrafficError::Config("base_url must not be empty".to_string()));
        }
        if reqwest::Url::parse(base_url).is_err() {
            return Err(TrafficError::Config(format!(
                "base_url is not a valid URL: {}",
                base_url
            )));
        }
        if self.type_name.trim().is_empty() {
            return Err(TrafficError::Config("type_name must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(TrafficError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(TrafficError::Config(
                "max_concurrent_requests must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(s).map_err(|e| TrafficError::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            type_name: Self::default_type_name(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            max_concurrent_requests: Self::default_max_concurrent_requests(),
            user_agent: Self::default_user_agent(),
        }
    }
}

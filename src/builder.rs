//! Client builder.
//!
//! The HTTP client and its configuration are constructed here once and then
//! passed around explicitly; nothing in the crate keeps a global session.

use crate::client::TrafficClient;
use crate::config::Config;
use crate::error::Result;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

/// Builder for a [`TrafficClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: Config,
}

impl ClientBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.config = self.config.with_type_name(type_name);
        self
    }

    /// Total timeout applied to each quantum's request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_request_timeout(timeout);
        self
    }

    /// Number of quantum requests allowed in flight. Results keep quantum order.
    pub fn max_concurrent_requests(mut self, limit: usize) -> Self {
        self.config = self.config.with_max_concurrent_requests(limit);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Validate the configuration and construct the HTTP client.
    pub fn build(self) -> Result<TrafficClient> {
        self.config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(TrafficClient::from_parts(http, self.config))
    }
}

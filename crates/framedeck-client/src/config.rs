//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how the client reaches the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create configuration for an API root
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Absolute URL for an API path such as `/demos`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_ms: 10_000,
        }
    }
}

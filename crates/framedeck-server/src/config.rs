//! Server configuration
//!
//! Layered lowest to highest: built-in defaults, optional TOML file,
//! `FRAMEDECK_*` environment variables, command-line flags.

use framedeck_store::PoolConfig;
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An override could not be parsed
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable or flag name
        key: String,
        /// Raw value as given
        value: String,
    },

    /// Host/port do not resolve to an address
    #[error("cannot resolve bind address {0}")]
    Address(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// SQLite database file
    pub database: PathBuf,
    /// Connection pool settings
    pub pool: PoolConfig,
}

impl ServerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; missing keys keep their defaults
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if it is not valid TOML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply `FRAMEDECK_*` overrides from the process environment
    ///
    /// # Errors
    /// - `ConfigError::InvalidValue` if a numeric variable does not parse
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `FRAMEDECK_*` overrides from an arbitrary lookup
    ///
    /// # Errors
    /// - `ConfigError::InvalidValue` if a numeric variable does not parse
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("FRAMEDECK_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("FRAMEDECK_PORT") {
            self.port = parse_value("FRAMEDECK_PORT", &port)?;
        }
        if let Some(database) = lookup("FRAMEDECK_DATABASE") {
            self.database = PathBuf::from(database);
        }
        if let Some(max) = lookup("FRAMEDECK_POOL_MAX") {
            self.pool.max_size = parse_value("FRAMEDECK_POOL_MAX", &max)?;
        }
        Ok(self)
    }

    /// With bind host
    #[inline]
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// With bind port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// With database file
    #[inline]
    #[must_use]
    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = database.into();
        self
    }

    /// Resolve host and port into a socket address
    ///
    /// # Errors
    /// - `ConfigError::Address` if the host does not resolve
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let target = format!("{}:{}", self.host, self.port);
        target
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ConfigError::Address(target))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database: PathBuf::from("framedeck.db"),
            pool: PoolConfig::default(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

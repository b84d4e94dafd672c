//! Gateway hosting configuration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ccip_read_router::gateway::GatewayConfig;
//!
//! let config = GatewayConfig::default()
//!     .port(3001)
//!     .base_path("/lookup")
//!     .request_timeout(Duration::from_secs(10));
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.socket_addr().port(), 3001);
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default suffix stripped from GET call data.
pub const DEFAULT_PATH_SUFFIX: &str = ".json";

/// Default maximum POST body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Invalid gateway configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },

    /// The base path is not empty and not of the form `/segment[/...]`.
    #[error("base path must be empty or start with `/` and not end with `/`: `{0}`")]
    InvalidBasePath(String),

    /// A limit was set to zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Hosting options for the HTTP gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Address to bind.
    pub bind_addr: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Prefix under which both routes are mounted (empty = root).
    pub base_path: String,
    /// Literal suffix stripped from GET call data, e.g. `.json`.
    pub path_suffix: String,
    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
    /// Per-request timeout enforced by the hosting layer.
    pub request_timeout: Duration,
    /// Whether to answer cross-origin requests.
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            base_path: String::new(),
            path_suffix: DEFAULT_PATH_SUFFIX.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cors: true,
        }
    }
}

impl GatewayConfig {
    /// Load from `CCIP_*` environment variables, falling back to defaults.
    ///
    /// | variable              | field             |
    /// |-----------------------|-------------------|
    /// | `CCIP_BIND_ADDR`      | `bind_addr`       |
    /// | `CCIP_PORT`           | `port`            |
    /// | `CCIP_BASE_PATH`      | `base_path`       |
    /// | `CCIP_PATH_SUFFIX`    | `path_suffix`     |
    /// | `CCIP_MAX_BODY_BYTES` | `max_body_size`   |
    /// | `CCIP_TIMEOUT_SECS`   | `request_timeout` |
    /// | `CCIP_CORS`           | `cors`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "CCIP_BIND_ADDR")? {
            config.bind_addr = v;
        }
        if let Some(v) = parse_var(&lookup, "CCIP_PORT")? {
            config.port = v;
        }
        if let Some(v) = lookup("CCIP_BASE_PATH") {
            config.base_path = v;
        }
        if let Some(v) = lookup("CCIP_PATH_SUFFIX") {
            config.path_suffix = v;
        }
        if let Some(v) = parse_var(&lookup, "CCIP_MAX_BODY_BYTES")? {
            config.max_body_size = v;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "CCIP_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("CCIP_CORS") {
            config.cors = parse_flag(&v).ok_or(ConfigError::InvalidValue {
                key: "CCIP_CORS",
                value: v,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants not expressed by the field types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.base_path;
        if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
            return Err(ConfigError::InvalidBasePath(base.clone()));
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::Zero("max_body_size"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Zero("request_timeout"));
        }
        Ok(())
    }

    /// Address and port to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Set the bind address.
    pub fn bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the prefix both routes are mounted under.
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Set the suffix stripped from GET call data.
    pub fn path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = suffix.into();
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Set the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable CORS.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

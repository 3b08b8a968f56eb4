//! Client configuration.
//!
//! Layers, lowest to highest precedence: defaults, an optional JSON file,
//! `RIDE_*` environment variables. The application applies CLI flags last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::gate::TransportFailurePolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "RIDE_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RIDE_REQUEST_TIMEOUT_SECS";
pub const ENV_GATE_RIDING_SCREENS: &str = "RIDE_GATE_RIDING_SCREENS";
pub const ENV_CLEAR_TOKEN_ON_TRANSPORT_FAILURE: &str = "RIDE_CLEAR_TOKEN_ON_TRANSPORT_FAILURE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid backend base URL `{value}`: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Backend origin the profile and logout endpoints are resolved against.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Put `/riding` and `/captain-riding` behind their role's gate.
    pub gate_riding_screens: bool,
    pub transport_failure_policy: TransportFailurePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            gate_riding_screens: false,
            transport_failure_policy: TransportFailurePolicy::KeepCredential,
        }
    }
}

impl ClientConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `RIDE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment, in production).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_BASE_URL) {
            self.base_url = value;
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs =
                value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT_SECS,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_GATE_RIDING_SCREENS) {
            self.gate_riding_screens = parse_flag(ENV_GATE_RIDING_SCREENS, &value)?;
        }
        if let Some(value) = lookup(ENV_CLEAR_TOKEN_ON_TRANSPORT_FAILURE) {
            self.transport_failure_policy =
                if parse_flag(ENV_CLEAR_TOKEN_ON_TRANSPORT_FAILURE, &value)? {
                    TransportFailurePolicy::ClearCredential
                } else {
                    TransportFailurePolicy::KeepCredential
                };
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_gate_riding_screens(mut self, enabled: bool) -> Self {
        self.gate_riding_screens = enabled;
        self
    }

    pub fn with_transport_failure_policy(mut self, policy: TransportFailurePolicy) -> Self {
        self.transport_failure_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend_url()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Parsed base URL: `http` or `https`, without query or fragment.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(self.base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme `{other}`"))),
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

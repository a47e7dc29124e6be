use crate::error::{Result, YamahaError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the device host
pub const HOST_ENV: &str = "YAMAHA_HOST";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "YAMAHA_TIMEOUT_SECS";

/// Settings needed to reach a device
///
/// The host is either `ip[:port]` or a full `http://` base. Without a
/// timeout, requests use the transport defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,

    /// Per-request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout_ms: None,
        }
    }

    /// Set a per-request timeout, kept to millisecond precision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Read the configuration from `YAMAHA_HOST` and `YAMAHA_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup(HOST_ENV)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| YamahaError::Config(format!("{} is not set", HOST_ENV)))?;

        let timeout_ms = match lookup(TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    YamahaError::Config(format!(
                        "{} is not a number of seconds: {}",
                        TIMEOUT_ENV, e
                    ))
                })?;
                Some(secs.saturating_mul(1000))
            }
            None => None,
        };

        Ok(Self { host, timeout_ms })
    }
}

use crate::error::{Result, YamahaError};
use serde::Deserialize;
use std::fmt;
use url::Url;
use uuid::Uuid;

/// Path of the main zone below the device host
pub const API_PATH: &str = "YamahaExtendedControl/v1/main/";

/// Fixed endpoints of the main zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetStatus,
    SetVolume,
    SetSubwooferVolume,
    SetToneControl,
    SetDialogueLevel,
    SetPureDirect,
    SetEnhancer,
    SetExtraBass,
    SetAdaptiveDrc,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::GetStatus => "getStatus",
            Endpoint::SetVolume => "setVolume",
            Endpoint::SetSubwooferVolume => "setSubwooferVolume",
            Endpoint::SetToneControl => "setToneControl",
            Endpoint::SetDialogueLevel => "setDialogueLevel",
            Endpoint::SetPureDirect => "setPureDirect",
            Endpoint::SetEnhancer => "setEnhancer",
            Endpoint::SetExtraBass => "setExtraBass",
            Endpoint::SetAdaptiveDrc => "setAdaptiveDrc",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean device settings switched with `enable=true|false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    PureDirect,
    Enhancer,
    ExtraBass,
    AdaptiveDrc,
}

impl Toggle {
    /// All toggles in display order
    pub const ALL: [Toggle; 4] = [
        Toggle::PureDirect,
        Toggle::Enhancer,
        Toggle::ExtraBass,
        Toggle::AdaptiveDrc,
    ];

    /// Endpoint that switches this setting
    pub fn endpoint(self) -> Endpoint {
        match self {
            Toggle::PureDirect => Endpoint::SetPureDirect,
            Toggle::Enhancer => Endpoint::SetEnhancer,
            Toggle::ExtraBass => Endpoint::SetExtraBass,
            Toggle::AdaptiveDrc => Endpoint::SetAdaptiveDrc,
        }
    }

    /// Human readable name
    pub fn label(self) -> &'static str {
        match self {
            Toggle::PureDirect => "Pure Direct",
            Toggle::Enhancer => "Enhancer",
            Toggle::ExtraBass => "Extra Bass",
            Toggle::AdaptiveDrc => "Adaptive DRC",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Toggle::PureDirect => 0,
            Toggle::Enhancer => 1,
            Toggle::ExtraBass => 2,
            Toggle::AdaptiveDrc => 3,
        }
    }
}

/// A single GET request against the control API
#[derive(Debug, Clone)]
pub struct Request {
    id: Uuid,
    endpoint: String,
    params: Vec<(String, String)>,
}

impl Request {
    /// Create a new request for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint: endpoint.into(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Append query parameters in iteration order
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.params.extend(
            params
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Get the request ID used to correlate log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Resolve the full request URL against the zone base URL
    ///
    /// The endpoint must be a plain ASCII alphanumeric name; anything else
    /// would alter the path or the query.
    pub fn url(&self, base: &Url) -> Result<Url> {
        if self.endpoint.is_empty() || !self.endpoint.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(YamahaError::InvalidUrl(format!(
                "invalid endpoint name: {:?}",
                self.endpoint
            )));
        }

        let mut url = base
            .join(&self.endpoint)
            .map_err(|e| YamahaError::InvalidUrl(e.to_string()))?;

        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.params);
        }

        Ok(url)
    }
}

/// Build the zone base URL from a host (`ip[:port]`) or an `http://` base
pub fn base_url(host: &str) -> Result<Url> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(YamahaError::InvalidUrl("empty host".to_string()));
    }

    let root = if host.contains("://") {
        format!("{}/", host)
    } else {
        format!("http://{}/", host)
    };

    let url = Url::parse(&root)
        .and_then(|root| root.join(API_PATH))
        .map_err(|e| YamahaError::InvalidUrl(e.to_string()))?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(YamahaError::InvalidUrl(format!("not a device address: {}", host)));
    }

    Ok(url)
}

/// Envelope the device wraps around command responses
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    pub response_code: i64,
}

use crate::config::ClientConfig;
use crate::error::{Result, YamahaError};
use crate::protocol::{base_url, Request};
use bytes::Bytes;
use url::Url;

const USER_AGENT: &str = concat!("yamaha-ctrl/", env!("CARGO_PKG_VERSION"));

/// Low-level HTTP transport to one device
pub struct Connection {
    http: reqwest::Client,
    base_url: Url,
}

impl Connection {
    /// Build a connection from a client configuration
    ///
    /// No request is made; the device is first contacted by `send_request`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = base_url(&config.host)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Create a connection with a pre-built `reqwest::Client`
    pub fn with_client(http: reqwest::Client, host: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: base_url(host)?,
        })
    }

    /// Base URL of the main zone
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a GET request and return the raw body
    ///
    /// HTTP status codes are not inspected; only transport failures are errors.
    pub async fn send_request(&self, request: &Request) -> Result<Bytes> {
        let url = request.url(&self.base_url)?;
        tracing::debug!(request_id = %request.id(), "GET {}", url);

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::debug!(request_id = %request.id(), "Transport error: {}", e);
            YamahaError::Network(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            request_id = %request.id(),
            "Received HTTP {} with {} byte(s)",
            status,
            body.len()
        );

        Ok(body)
    }
}

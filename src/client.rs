use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{Result, YamahaError};
use crate::protocol::{CommandResponse, Endpoint, Request, Toggle};
use crate::types::{DeviceStatus, LevelOffset, VolumeStep};
use std::sync::Arc;

/// Client for a Yamaha receiver's Extended Control API
///
/// `YamahaClient` fetches the main zone status and sends control commands.
/// Each call is one independent GET request; nothing is retried and the
/// client keeps no device state between calls. Cloning is cheap and clones
/// share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct YamahaClient {
    connection: Arc<Connection>,
}

impl YamahaClient {
    /// Create a client for the device at `host` (`ip[:port]` or `http://...`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use yamaha_ctrl::YamahaClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = YamahaClient::new("192.168.1.86")?;
    ///     let status = client.fetch_status().await?;
    ///     println!("Volume {} of {}", status.volume, status.max_volume);
    ///     Ok(())
    /// }
    /// ```
    pub fn new(host: impl Into<String>) -> Result<Self> {
        Self::with_config(&ClientConfig::new(host))
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            connection: Arc::new(Connection::new(config)?),
        })
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, host: &str) -> Result<Self> {
        Ok(Self {
            connection: Arc::new(Connection::with_client(http, host)?),
        })
    }

    /// Base URL of the main zone, e.g. `http://192.168.1.86/YamahaExtendedControl/v1/main/`
    pub fn base_url(&self) -> &url::Url {
        self.connection.base_url()
    }

    /// Fetch and decode the current device status
    ///
    /// Fails with `Network` when the device cannot be reached,
    /// `EmptyResponse` when it answers with no body and `Decode` when the body
    /// does not match [`DeviceStatus`].
    pub async fn fetch_status(&self) -> Result<DeviceStatus> {
        let request = Request::new(Endpoint::GetStatus.as_str());
        let body = self.connection.send_request(&request).await?;

        if body.is_empty() {
            return Err(YamahaError::EmptyResponse);
        }

        let status: DeviceStatus = serde_json::from_slice(&body)?;
        Ok(status)
    }

    /// Send a command to `endpoint` with `params` as query items
    ///
    /// Parameters are sent in iteration order. Any response that arrives
    /// without a transport error counts as success.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use yamaha_ctrl::YamahaClient;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = YamahaClient::new("192.168.1.86")?;
    /// client.send_command("setVolume", [("volume", "25")]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_command<I, K, V>(&self, endpoint: &str, params: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.send(Request::new(endpoint).with_params(params)).await
    }

    async fn send(&self, request: Request) -> Result<()> {
        let body = self.connection.send_request(&request).await?;

        // Informational only, the device's answer never fails a command
        if let Ok(response) = serde_json::from_slice::<CommandResponse>(&body) {
            if response.response_code != 0 {
                tracing::warn!(
                    request_id = %request.id(),
                    "{} answered with response code {}",
                    request.endpoint(),
                    response.response_code
                );
            }
        }

        Ok(())
    }

    // ========== Volume Control ==========

    /// Set the master volume step
    pub async fn set_volume(&self, volume: VolumeStep) -> Result<()> {
        let request = Request::new(Endpoint::SetVolume.as_str()).with_param("volume", volume);
        self.send(request).await
    }

    /// Set the subwoofer volume offset
    pub async fn set_bass(&self, volume: LevelOffset) -> Result<()> {
        let request =
            Request::new(Endpoint::SetSubwooferVolume.as_str()).with_param("volume", volume);
        self.send(request).await
    }

    // ========== Tone ==========

    /// Switch tone control to manual and set bass and treble
    pub async fn set_tone_control(&self, bass: LevelOffset, treble: LevelOffset) -> Result<()> {
        let request = Request::new(Endpoint::SetToneControl.as_str())
            .with_param("mode", "manual")
            .with_param("bass", bass)
            .with_param("treble", treble);
        self.send(request).await
    }

    /// Set the dialogue lift level
    pub async fn set_dialogue_level(&self, level: u32) -> Result<()> {
        let request = Request::new(Endpoint::SetDialogueLevel.as_str()).with_param("value", level);
        self.send(request).await
    }

    // ========== Toggles ==========

    /// Enable or disable one of the boolean settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use yamaha_ctrl::{Toggle, YamahaClient};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = YamahaClient::new("192.168.1.86")?;
    /// client.set_toggle(Toggle::Enhancer, true).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_toggle(&self, toggle: Toggle, enabled: bool) -> Result<()> {
        let request = Request::new(toggle.endpoint().as_str()).with_param("enable", enabled);
        self.send(request).await
    }
}

use thiserror::Error;

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, YamahaError>;

/// Errors that can occur when talking to a receiver
#[derive(Error, Debug)]
pub enum YamahaError {
    /// The host, endpoint or parameters do not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The device answered with an empty body
    #[error("Empty response from device")]
    EmptyResponse,

    /// The body did not match the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client configuration could not be built
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event channel was closed
    #[error("Channel closed")]
    ChannelClosed,

    /// Channel receive error
    #[error("Channel error: {0}")]
    ChannelError(String),
}

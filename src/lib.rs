//! Rust library for controlling Yamaha networked receivers
//!
//! This library talks to a receiver's "Extended Control" HTTP API over plain
//! HTTP. It supports:
//!
//! - Fetching the main zone status as a typed [`DeviceStatus`]
//! - Master volume, subwoofer volume, tone control and dialogue level
//! - Pure Direct, Enhancer, Extra Bass and Adaptive DRC toggles
//! - A toolkit-independent control [`Panel`] for menu or terminal front-ends
//!
//! # Quick Start
//!
//! ```no_run
//! use yamaha_ctrl::{Toggle, YamahaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YamahaClient::new("192.168.1.86")?;
//!
//!     let status = client.fetch_status().await?;
//!     println!("Volume {} of {}", status.volume, status.max_volume);
//!
//!     client.set_volume(status.volume + 1).await?;
//!     client.set_tone_control(-3, 5).await?;
//!     client.set_toggle(Toggle::Enhancer, true).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Control Panel
//!
//! A [`Panel`] keeps the last fetched status, derives slider and toggle
//! views from it and reports failures to an injected [`ErrorSink`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use yamaha_ctrl::{ErrorLog, Panel, YamahaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let log = Arc::new(ErrorLog::new());
//!     let panel = Panel::new(YamahaClient::new("192.168.1.86")?, log.clone());
//!
//!     let view = panel.refresh().await?;
//!     println!("{} [{}..={}]", view.volume_label, view.volume.min, view.volume.max);
//!
//!     if panel.set_volume(view.volume.stepped(1) as u32).await.is_err() {
//!         for entry in log.entries() {
//!             eprintln!("{}", entry);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Client**: status fetching and command sending
//! - **Panel**: control state, optimistic toggles and error reporting
//! - **Connection**: HTTP transport
//! - **Protocol**: endpoints, toggles and request URLs
//! - **Types**: the status schema

mod client;
mod config;
mod connection;
mod error;
mod panel;
mod protocol;
mod reporter;
mod subscription;
mod types;

// Public exports
pub use client::YamahaClient;
pub use config::{ClientConfig, HOST_ENV, TIMEOUT_ENV};
pub use error::{Result, YamahaError};
pub use panel::{Panel, PanelView, Slider, ToggleItem};
pub use protocol::{Endpoint, Request, Toggle, API_PATH};
pub use reporter::{ErrorLog, ErrorReport, ErrorSink, TracingSink};
pub use subscription::{PanelEvent, PanelReceiver};
pub use types::{
    ActualVolume, DeviceStatus, LevelOffset, ToneControl, VolumeStep, DIALOGUE_RANGE,
    SUBWOOFER_RANGE, TONE_RANGE,
};

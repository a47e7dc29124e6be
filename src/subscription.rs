use crate::error::{Result, YamahaError};
use crate::protocol::Toggle;
use crate::types::DeviceStatus;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Change published by a [`Panel`](crate::Panel)
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// A fetch succeeded; the panel now renders this status
    StatusUpdated(Box<DeviceStatus>),

    /// A toggle changed locally, either optimistically or by a revert
    ToggleChanged { toggle: Toggle, enabled: bool },

    /// An operation failed and was reported to the error sink
    Error { message: String, context: String },
}

/// Panel events as seen by one front-end
///
/// Read it from the task that owns the UI so command completions never
/// touch widgets from a worker. Events are a change feed, not the state:
/// a reader that falls behind gets a `ChannelError` once and should then
/// redraw from [`Panel::view`](crate::Panel::view) instead of replaying.
pub struct PanelReceiver {
    rx: broadcast::Receiver<PanelEvent>,
}

impl PanelReceiver {
    pub(crate) fn new(rx: broadcast::Receiver<PanelEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next panel change
    ///
    /// `ChannelClosed` means every clone of the panel is gone and the
    /// front-end can shut down.
    pub async fn recv(&mut self) -> Result<PanelEvent> {
        self.rx.recv().await.map_err(|e| match e {
            RecvError::Closed => YamahaError::ChannelClosed,
            RecvError::Lagged(missed) => missed_events(missed),
        })
    }

    /// Next pending change, for front-ends that poll between frames
    pub fn try_recv(&mut self) -> Result<Option<PanelEvent>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(YamahaError::ChannelClosed),
            Err(TryRecvError::Lagged(missed)) => Err(missed_events(missed)),
        }
    }
}

fn missed_events(missed: u64) -> YamahaError {
    tracing::debug!("Panel receiver skipped {} events", missed);
    YamahaError::ChannelError(format!("Missed {} panel events, redraw from the view", missed))
}

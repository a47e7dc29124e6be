use crate::client::YamahaClient;
use crate::error::{Result, YamahaError};
use crate::protocol::Toggle;
use crate::reporter::ErrorSink;
use crate::subscription::{PanelEvent, PanelReceiver};
use crate::types::{
    DeviceStatus, LevelOffset, VolumeStep, DIALOGUE_RANGE, SUBWOOFER_RANGE, TONE_RANGE,
};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// Control panel for one receiver
///
/// A `Panel` is what a menu or window binds to. It keeps the last fetched
/// status and the local toggle states, turns user actions into commands and
/// reports failures to the injected [`ErrorSink`]. Every change is also
/// published as a [`PanelEvent`].
///
/// Toggle states are derived from the last successful fetch. A toggle is
/// flipped locally before its command is sent and flipped back if the
/// command fails, unless a newer toggle or refresh has superseded it.
#[derive(Clone)]
pub struct Panel {
    client: YamahaClient,
    sink: Arc<dyn ErrorSink>,
    state: Arc<Mutex<PanelState>>,
    events: broadcast::Sender<PanelEvent>,
}

#[derive(Debug, Default)]
struct PanelState {
    status: Option<DeviceStatus>,
    toggles: [bool; 4],
    // Bumped on every local change so late failures don't clobber newer state
    generations: [u64; 4],
}

impl Panel {
    pub fn new(client: YamahaClient, sink: Arc<dyn ErrorSink>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            client,
            sink,
            state: Arc::new(Mutex::new(PanelState::default())),
            events,
        }
    }

    /// Subscribe to panel events
    pub fn subscribe(&self) -> PanelReceiver {
        PanelReceiver::new(self.events.subscribe())
    }

    pub fn client(&self) -> &YamahaClient {
        &self.client
    }

    /// Last successfully fetched status
    pub fn status(&self) -> Option<DeviceStatus> {
        self.lock().status.clone()
    }

    /// Local state of a toggle, including optimistic changes
    pub fn toggle_state(&self, toggle: Toggle) -> bool {
        self.lock().toggles[toggle.index()]
    }

    /// View of the last successful fetch, `None` before the first one
    pub fn view(&self) -> Option<PanelView> {
        let state = self.lock();
        state
            .status
            .as_ref()
            .map(|status| PanelView::build(status, &state.toggles))
    }

    /// Fetch the device status and rebuild the view
    ///
    /// On failure the previous status and toggles are kept. Failures before
    /// the first successful fetch are reported as the initial fetch.
    pub async fn refresh(&self) -> Result<PanelView> {
        let status = match self.client.fetch_status().await {
            Ok(status) => status,
            Err(e) => {
                let context = if self.lock().status.is_none() {
                    "Initial Yamaha status fetch"
                } else {
                    "Menu refresh"
                };
                return Err(self.fail(e, context));
            }
        };

        let view = {
            let mut state = self.lock();
            for toggle in Toggle::ALL {
                let i = toggle.index();
                state.toggles[i] = status.toggle(toggle);
                state.generations[i] += 1;
            }
            let view = PanelView::build(&status, &state.toggles);
            state.status = Some(status.clone());
            view
        };

        let _ = self.events.send(PanelEvent::StatusUpdated(Box::new(status)));
        Ok(view)
    }

    pub async fn set_volume(&self, volume: VolumeStep) -> Result<()> {
        self.client
            .set_volume(volume)
            .await
            .map_err(|e| self.fail(e, "Failed to set volume"))
    }

    pub async fn set_bass(&self, volume: LevelOffset) -> Result<()> {
        self.client
            .set_bass(volume)
            .await
            .map_err(|e| self.fail(e, "Failed to set bass"))
    }

    pub async fn set_tone_control(&self, bass: LevelOffset, treble: LevelOffset) -> Result<()> {
        self.client
            .set_tone_control(bass, treble)
            .await
            .map_err(|e| self.fail(e, "Failed to update tone control"))
    }

    pub async fn set_dialogue_level(&self, level: u32) -> Result<()> {
        self.client
            .set_dialogue_level(level)
            .await
            .map_err(|e| self.fail(e, "Failed to set dialogue level"))
    }

    /// Flip a toggle and send the new state to the device
    ///
    /// Returns the state that was sent.
    pub async fn toggle(&self, toggle: Toggle) -> Result<bool> {
        let i = toggle.index();
        let (enabled, generation) = {
            let mut state = self.lock();
            state.toggles[i] = !state.toggles[i];
            state.generations[i] += 1;
            (state.toggles[i], state.generations[i])
        };
        let _ = self.events.send(PanelEvent::ToggleChanged { toggle, enabled });

        match self.client.set_toggle(toggle, enabled).await {
            Ok(()) => {
                let state = if enabled { "on" } else { "off" };
                tracing::debug!("Toggled {} to {}", toggle.label(), state);
                Ok(enabled)
            }
            Err(e) => {
                let reverted = {
                    let mut state = self.lock();
                    if state.generations[i] == generation {
                        state.toggles[i] = !enabled;
                        true
                    } else {
                        false
                    }
                };
                if reverted {
                    let _ = self.events.send(PanelEvent::ToggleChanged {
                        toggle,
                        enabled: !enabled,
                    });
                }
                Err(self.fail(e, &format!("Failed to toggle {}", toggle.label())))
            }
        }
    }

    fn fail(&self, error: YamahaError, context: &str) -> YamahaError {
        let message = format!("An error occurred: {}", error);
        self.sink.report(&message, context);
        let _ = self.events.send(PanelEvent::Error {
            message,
            context: context.to_string(),
        });
        error
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Toolkit-independent description of the panel controls
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    /// Front panel volume without its unit, e.g. "Volume: -42.5"
    pub volume_label: String,
    pub volume: Slider,
    /// Subwoofer volume
    pub bass: Slider,
    pub tone_bass: Slider,
    pub tone_treble: Slider,
    pub dialogue: Slider,
    pub toggles: Vec<ToggleItem>,
}

impl PanelView {
    fn build(status: &DeviceStatus, toggles: &[bool; 4]) -> Self {
        let volume_label = format!("Volume: {}", status.actual_volume.value);

        let tone = &status.tone_control;
        Self {
            volume_label,
            volume: Slider::new("Volume", widen(status.volume_range()), status.volume.into()),
            bass: Slider::new("Bass Vol", widen(SUBWOOFER_RANGE), status.subwoofer_volume.into()),
            tone_bass: Slider::new("Bass", widen(TONE_RANGE), tone.bass.into()),
            tone_treble: Slider::new("Treble", widen(TONE_RANGE), tone.treble.into()),
            dialogue: Slider::new("Dial", widen(DIALOGUE_RANGE), status.dialogue_level.into()),
            toggles: Toggle::ALL
                .iter()
                .map(|&toggle| ToggleItem {
                    toggle,
                    label: toggle.label(),
                    enabled: toggles[toggle.index()],
                })
                .collect(),
        }
    }
}

fn widen<T: Into<i64> + Copy>(range: RangeInclusive<T>) -> RangeInclusive<i64> {
    (*range.start()).into()..=(*range.end()).into()
}

/// Bounded integer control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    /// Always within `min..=max`
    pub value: i64,
}

impl Slider {
    fn new(label: &'static str, range: RangeInclusive<i64>, value: i64) -> Self {
        let (min, max) = range.into_inner();
        Self {
            label,
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    /// Value shifted by `delta`, kept within bounds
    pub fn stepped(&self, delta: i64) -> i64 {
        self.value.saturating_add(delta).clamp(self.min, self.max)
    }
}

/// On/off menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleItem {
    pub toggle: Toggle,
    pub label: &'static str,
    pub enabled: bool,
}

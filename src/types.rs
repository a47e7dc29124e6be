use crate::protocol::Toggle;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Master volume step as reported by the device
pub type VolumeStep = u32;

/// Signed level offset (subwoofer, bass, treble)
pub type LevelOffset = i32;

/// Allowed subwoofer volume offsets
pub const SUBWOOFER_RANGE: RangeInclusive<LevelOffset> = -12..=12;

/// Allowed bass and treble offsets
pub const TONE_RANGE: RangeInclusive<LevelOffset> = -12..=12;

/// Allowed dialogue levels
pub const DIALOGUE_RANGE: RangeInclusive<u32> = 0..=3;

/// Snapshot of the receiver state returned by `getStatus`
///
/// The record is read-only. Commands change the device, not this value;
/// fetch again to observe their effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Current master volume step
    pub volume: VolumeStep,

    /// Highest master volume step the device accepts
    pub max_volume: VolumeStep,

    /// Subwoofer offset, see [`SUBWOOFER_RANGE`]
    pub subwoofer_volume: LevelOffset,

    pub pure_direct: bool,
    pub enhancer: bool,
    pub adaptive_drc: bool,
    pub extra_bass: bool,

    /// Volume as shown on the front panel
    pub actual_volume: ActualVolume,

    /// Dialogue lift, see [`DIALOGUE_RANGE`]
    pub dialogue_level: u32,

    pub tone_control: ToneControl,
}

impl DeviceStatus {
    /// Bounds for the master volume slider
    pub fn volume_range(&self) -> RangeInclusive<VolumeStep> {
        0..=self.max_volume
    }

    /// Get the state of a toggle
    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::PureDirect => self.pure_direct,
            Toggle::Enhancer => self.enhancer,
            Toggle::ExtraBass => self.extra_bass,
            Toggle::AdaptiveDrc => self.adaptive_drc,
        }
    }
}

/// Front panel volume display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualVolume {
    pub value: f64,

    /// Display unit (e.g. "dB"), absent on some firmware
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Tone control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneControl {
    /// Tone mode ("manual", "auto", ...)
    pub mode: String,
    pub bass: LevelOffset,
    pub treble: LevelOffset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "volume": 20,
            "max_volume": 60,
            "subwoofer_volume": -4,
            "pure_direct": false,
            "enhancer": true,
            "adaptive_drc": false,
            "extra_bass": true,
            "actual_volume": { "value": -42.5, "unit": "dB" },
            "dialogue_level": 2,
            "tone_control": { "mode": "manual", "bass": -3, "treble": 5 }
        })
    }

    #[test]
    fn decode_then_encode_keeps_every_field() {
        let status: DeviceStatus = serde_json::from_value(sample()).unwrap();
        assert_eq!(serde_json::to_value(&status).unwrap(), sample());
    }

    #[test]
    fn ignores_fields_outside_the_schema() {
        let mut raw = sample();
        raw["power"] = json!("on");
        raw["response_code"] = json!(0);
        let status: DeviceStatus = serde_json::from_value(raw).unwrap();
        assert_eq!(status.volume, 20);
        assert_eq!(status.tone_control.treble, 5);
    }

    #[test]
    fn missing_field_is_an_error() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("max_volume");
        assert!(serde_json::from_value::<DeviceStatus>(raw).is_err());
    }

    #[test]
    fn float_volume_is_rejected_for_integer_fields() {
        let mut raw = sample();
        raw["volume"] = json!(20.5);
        assert!(serde_json::from_value::<DeviceStatus>(raw).is_err());
    }

    #[test]
    fn unit_is_optional() {
        let mut raw = sample();
        raw["actual_volume"] = json!({ "value": -30.0 });
        let status: DeviceStatus = serde_json::from_value(raw).unwrap();
        assert_eq!(status.actual_volume.unit, None);
    }

    #[test]
    fn toggle_lookup() {
        let status: DeviceStatus = serde_json::from_value(sample()).unwrap();
        assert!(!status.toggle(Toggle::PureDirect));
        assert!(status.toggle(Toggle::Enhancer));
        assert!(status.toggle(Toggle::ExtraBass));
        assert!(!status.toggle(Toggle::AdaptiveDrc));
        assert_eq!(status.volume_range(), 0..=60);
    }
}

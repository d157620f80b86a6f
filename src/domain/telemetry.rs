// Telemetry snapshot domain models
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder shown wherever a reading has not been reported yet.
pub const PLACEHOLDER: &str = "--";

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A numeric reading that may still be a placeholder (`"--"` on the wire, or absent).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Reading {
    Value(f64),
    #[default]
    Pending,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::Pending => f.write_str(PLACEHOLDER),
        }
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Numbers are readings; null, strings ("--") and anything else are placeholders
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_f64().map(Reading::Value).unwrap_or(Reading::Pending))
    }
}

impl Serialize for Reading {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => serializer.serialize_f64(*v),
            Reading::Pending => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// Motor / cooler relay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchState {
    On,
    #[default]
    Off,
}

impl SwitchState {
    pub fn is_on(self) -> bool {
        self == SwitchState::On
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSample {
    pub ts: i64,
    pub bg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasalSample {
    pub ts: i64,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, rename = "eventualBG", skip_serializing_if = "Option::is_none")]
    pub eventual_bg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn waiting_reason() -> String {
    "Waiting...".to_string()
}

/// Latest decision of the dosing algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, rename = "eventualBG")]
    pub eventual_bg: Reading,
    #[serde(default = "waiting_reason", deserialize_with = "reason_or_waiting")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate: f64,
}

fn reason_or_waiting<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let reason = Option::<String>::deserialize(deserializer)?;
    Ok(reason.filter(|r| !r.is_empty()).unwrap_or_else(waiting_reason))
}

impl Default for Recommendation {
    fn default() -> Self {
        Self {
            eventual_bg: Reading::Pending,
            reason: waiting_reason(),
            rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpStats {
    #[serde(deserialize_with = "null_as_default")]
    pub plunger_mm: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub rotations: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pulses: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_dose: f64,
}

/// Patient profile the simulator runs with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub base_basal: f64,
    pub min_bg: f64,
    pub max_bg: f64,
    pub isf: f64,
}

/// The single live telemetry state, replaced wholesale on every valid message.
///
/// Every field falls back to its own default when absent or `null`; nothing
/// is carried over from an earlier snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetrySnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub glucose_history: Vec<GlucoseSample>,
    #[serde(deserialize_with = "null_as_default")]
    pub basal_history: Vec<BasalSample>,
    #[serde(rename = "currentBG", deserialize_with = "null_as_default")]
    pub current_bg: f64,
    #[serde(rename = "currentIOB", deserialize_with = "null_as_default")]
    pub current_iob: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub current_trend: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub latest_recommendation: Recommendation,
    #[serde(deserialize_with = "null_as_default")]
    pub motor_state: SwitchState,
    #[serde(deserialize_with = "null_as_default")]
    pub cooler_state: SwitchState,
    #[serde(deserialize_with = "null_as_default")]
    pub pump_stats: PumpStats,
    #[serde(deserialize_with = "null_as_default")]
    pub is_running: bool,
    pub insulin_temp: Reading,
    #[serde(deserialize_with = "null_as_default")]
    pub profile: Option<Profile>,
}

/// A streamed payload that could not be read as a snapshot.
#[derive(Debug, thiserror::Error)]
#[error("malformed telemetry payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

impl TelemetrySnapshot {
    pub fn from_json(payload: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let snapshot = TelemetrySnapshot::from_json(r#"{"currentBG": 142}"#).unwrap();

        assert_eq!(snapshot.current_bg, 142.0);
        assert_eq!(snapshot.current_iob, 0.0);
        assert_eq!(snapshot.latest_recommendation.reason, "Waiting...");
        assert_eq!(snapshot.latest_recommendation.rate, 0.0);
        assert_eq!(snapshot.latest_recommendation.eventual_bg, Reading::Pending);
        assert_eq!(snapshot.motor_state, SwitchState::Off);
        assert_eq!(snapshot.cooler_state, SwitchState::Off);
        assert_eq!(snapshot.pump_stats, PumpStats::default());
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.insulin_temp.to_string(), "--");
    }

    #[test]
    fn test_nulls_are_treated_as_missing() {
        let payload = r#"{
            "isRunning": true,
            "currentBG": null,
            "currentTrend": null,
            "latestRecommendation": null,
            "glucoseHistory": [],
            "basalHistory": []
        }"#;
        let snapshot = TelemetrySnapshot::from_json(payload).unwrap();

        assert!(snapshot.is_running);
        assert_eq!(snapshot.current_bg, 0.0);
        assert_eq!(snapshot.latest_recommendation, Recommendation::default());
    }

    #[test]
    fn test_full_upstream_payload() {
        let payload = r#"{
            "timestamp": 1700000005000,
            "isRunning": true,
            "currentBG": 231,
            "currentTrend": "Falling",
            "currentIOB": 0.21,
            "motorState": "ON",
            "coolerState": "OFF",
            "insulinTemp": 27.4,
            "glucoseHistory": [
                {"ts": 1700000000000, "bg": 235, "trend": "Flat"},
                {"ts": 1700000005000, "bg": 231, "trend": "Falling"}
            ],
            "basalHistory": [
                {"ts": 1700000000000, "rate": 2.0, "duration": 30, "eventualBG": 190, "reason": "Pred 190 > 120. Need IOB."}
            ],
            "latestRecommendation": {"ts": 1700000000000, "rate": 2.0, "duration": 30, "eventualBG": 190, "reason": "Pred 190 > 120. Need IOB."},
            "pumpStats": {"plunger_mm": 0.1658, "rotations": 0.23689, "pulses": 988, "last_dose": 0.525},
            "profile": {"base_basal": 1.0, "min_bg": 90, "max_bg": 120, "isf": 200.0}
        }"#;
        let snapshot = TelemetrySnapshot::from_json(payload).unwrap();

        assert_eq!(snapshot.glucose_history.len(), 2);
        assert_eq!(snapshot.basal_history[0].eventual_bg, Some(190.0));
        assert_eq!(snapshot.latest_recommendation.eventual_bg, Reading::Value(190.0));
        assert_eq!(snapshot.motor_state, SwitchState::On);
        assert_eq!(snapshot.pump_stats.pulses, 988);
        assert_eq!(snapshot.insulin_temp, Reading::Value(27.4));
        assert_eq!(snapshot.profile.map(|p| p.max_bg), Some(120.0));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(TelemetrySnapshot::from_json("not json").is_err());
        assert!(TelemetrySnapshot::from_json(r#"{"glucoseHistory": "oops"}"#).is_err());
        assert!(TelemetrySnapshot::from_json("42").is_err());
    }

    #[test]
    fn test_basal_sample_keeps_upstream_keys() {
        let payload = r#"{"ts": 1700000000000, "rate": 1.5, "eventualBG": 142, "reason": "ok"}"#;
        let sample: BasalSample = serde_json::from_str(payload).unwrap();
        assert_eq!(sample.eventual_bg, Some(142.0));

        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["eventualBG"], serde_json::json!(142.0));
        assert!(json.get("eventualBg").is_none());
    }
}

//! Typed telemetry readings and the decode step.
//!
//! Each upstream document is decoded exactly once per cycle into a typed
//! reading.  Only a document that is not a JSON object is a decode
//! error; individual fields that are missing or of the wrong type fall
//! back to the reading's default so one bad field never discards the rest.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Detection reading
// ---------------------------------------------------------------------------

/// Person and bird counts reported by the camera detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DetectionReading {
    #[serde(rename = "Persons", default, deserialize_with = "lenient::count")]
    pub persons: i64,
    #[serde(rename = "Birds", default, deserialize_with = "lenient::count")]
    pub birds: i64,
}

impl DetectionReading {
    pub fn decode(doc: Value) -> Result<Self, FetchError> {
        require_object(&doc)?;
        Ok(serde_json::from_value(doc)?)
    }
}

// ---------------------------------------------------------------------------
// Environment reading
// ---------------------------------------------------------------------------

/// Coop door position as reported by the sensor node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl DoorState {
    /// Case-insensitive match against `Open` / `Closed`; anything else is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("open") {
            Self::Open
        } else if raw.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Unknown
        }
    }
}

/// Temperature and door state reported by the sensor node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct EnvironmentReading {
    #[serde(default, deserialize_with = "lenient::float")]
    pub temperature: f64,
    #[serde(rename = "door", default, deserialize_with = "lenient::door")]
    pub door_state: DoorState,
}

impl EnvironmentReading {
    pub fn decode(doc: Value) -> Result<Self, FetchError> {
        require_object(&doc)?;
        Ok(serde_json::from_value(doc)?)
    }
}

fn require_object(doc: &Value) -> Result<(), FetchError> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(FetchError::decode(format_args!(
            "expected a JSON object, found {}",
            kind(doc)
        )))
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-field deserializers that never fail on a well-formed JSON value.
mod lenient {
    use super::{Deserialize, Deserializer, DoorState, Value};

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            other => {
                log::debug!("decode: non-numeric count {:?}, using 0", other);
                0
            }
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(v.as_f64().unwrap_or_else(|| {
            log::debug!("decode: non-numeric temperature {:?}, using 0.0", v);
            0.0
        }))
    }

    pub fn door<'de, D: Deserializer<'de>>(d: D) -> Result<DoorState, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(v.as_str().map_or(DoorState::Unknown, DoorState::parse))
    }
}

//! Module to load and process the `aircraft.json` data coming from a
//! tar1090/readsb-style receiver.
//!
//! The feed is not strongly typed: per-aircraft fields come and go between
//! snapshots and the occasional entry carries the wrong type.  Every
//! optional field therefore degrades on its own (`DefaultOnError`) so that
//! one bad entry never takes down the rest of the snapshot.
//!
//! Schema documentation is taken from the [readsb wiki].
//!
//! [readsb wiki]: https://github.com/wiedehopf/readsb/blob/dev/README-json.md
//!

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};
use tracing::trace;

use crate::squawk::describe;

/// One decoded `aircraft.json` payload.
///
/// Unknown keys are ignored.  `aircraft` stays an `Option` on purpose: its
/// absence is the one input defect the registry treats as a hard error.
///
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Snapshot {
    /// Receiver timestamp, seconds since the epoch
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub now: Option<f64>,
    /// Messages processed by the receiver since it started
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub messages: u64,
    /// Currently visible aircraft
    pub aircraft: Option<Vec<RawAircraft>>,
}

impl Snapshot {
    /// Deserialize from json
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        trace!("snapshot::from_json");

        serde_json::from_str(input)
    }
}

/// One raw aircraft entry, as transmitted.
///
/// Fields with the `Option` type indicate that the data is either optional
/// or may occasionally contain null values.
///
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAircraft {
    /// Callsign / flight number, right-padded with spaces by the feed
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub flight: Option<String>,
    /// 4-digit transponder code
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub squawk: Option<String>,
    /// Geometric altitude in feet
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub alt_geom: Option<f64>,
    /// Speed as a Mach number
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mach: Option<f64>,
    /// Latitude in degrees
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub lon: Option<f64>,
    /// Alert counter
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub alert: u32,
    /// Emergency marker, a string or a bool depending on the receiver version
    #[serde(default)]
    pub emergency: Option<Value>,
}

/// Aircraft position.  Only built when both coordinates are transmitted, a
/// half position is treated as no position at all.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Squawk code with its published meaning, if any.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Squawk {
    /// Code as transmitted
    pub code: String,
    /// Catalog meaning
    pub description: Option<&'static str>,
}

/// The cooked aircraft record.
///
/// Built from a `RawAircraft` in one validating step and immutable
/// afterwards.  A later snapshot replaces the record wholesale, it never
/// patches it in place.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aircraft {
    /// Callsign, trailing whitespace removed; None when absent or blank
    pub callsign: Option<String>,
    /// Transponder code and its meaning
    pub squawk: Option<Squawk>,
    /// Geometric altitude in feet
    pub altitude: Option<f64>,
    /// Speed as a Mach number
    pub mach: Option<f64>,
    /// Position when both coordinates are known
    pub position: Option<Position>,
    /// Alert counter, 0 when absent or unusable
    pub alerts: u32,
    /// Device-reported emergency marker, reduced to a bool
    pub emergency: bool,
}

impl From<&RawAircraft> for Aircraft {
    fn from(raw: &RawAircraft) -> Self {
        let callsign = raw
            .flight
            .as_deref()
            .map(str::trim_end)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let squawk = raw.squawk.as_ref().map(|code| Squawk {
            code: code.to_owned(),
            description: describe(code),
        });

        let position = match (raw.lat, raw.lon) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Aircraft {
            callsign,
            squawk,
            altitude: raw.alt_geom,
            mach: raw.mach,
            position,
            alerts: raw.alert,
            emergency: raw.emergency.as_ref().map(is_truthy).unwrap_or(false),
        }
    }
}

impl Aircraft {
    /// Squawk code as transmitted, if any.
    ///
    #[inline]
    pub fn squawk_code(&self) -> Option<&str> {
        self.squawk.as_ref().map(|s| s.code.as_str())
    }
}

/// The emergency marker predicate, the loose typing of the feed made
/// explicit: bool as-is, string when non-empty, number when non-zero, null
/// and missing never, containers when non-empty.
///
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn parse_one(v: Value) -> Aircraft {
        let raw: RawAircraft = serde_json::from_value(v).unwrap();
        Aircraft::from(&raw)
    }

    #[test]
    fn test_snapshot_from_json() {
        let data = r#"{
            "now": 1700000000.5,
            "messages": 1234,
            "aircraft": [
                { "hex": "39c402", "flight": "AFR564 ", "squawk": "7700",
                  "alt_geom": 38000, "mach": 0.84, "lat": 48.8, "lon": 2.3,
                  "alert": 1, "emergency": "general" }
            ]
        }"#;

        let snap = Snapshot::from_json(data).unwrap();
        assert_eq!(1234, snap.messages);

        let aircraft = snap.aircraft.unwrap();
        assert_eq!(1, aircraft.len());

        let ac = Aircraft::from(&aircraft[0]);
        assert_eq!(Some("AFR564".to_string()), ac.callsign);
        assert_eq!(Some(38000.), ac.altitude);
        assert_eq!(Some(0.84), ac.mach);
        assert_eq!(1, ac.alerts);
        assert!(ac.emergency);
    }

    #[test]
    fn test_snapshot_messages_degrade_to_zero() {
        let snap = Snapshot::from_json(r#"{ "messages": "a lot", "aircraft": [] }"#).unwrap();
        assert_eq!(0, snap.messages);

        let snap = Snapshot::from_json(r#"{ "aircraft": [] }"#).unwrap();
        assert_eq!(0, snap.messages);
    }

    #[test]
    fn test_snapshot_without_aircraft_key() {
        let snap = Snapshot::from_json(r#"{ "messages": 42 }"#).unwrap();
        assert!(snap.aircraft.is_none());
    }

    #[test]
    fn test_bad_field_degrades_alone() {
        // numeric callsign is dropped, the rest of the entry survives
        let ac = parse_one(json!({ "flight": 1234, "lat": 48.8, "lon": 2.3 }));

        assert_eq!(None, ac.callsign);
        assert!(ac.position.is_some());
    }

    #[test]
    fn test_callsign_is_trimmed() {
        let ac = parse_one(json!({ "flight": "AFR564  " }));
        assert_eq!(Some("AFR564".to_string()), ac.callsign);

        let ac = parse_one(json!({ "flight": "   " }));
        assert_eq!(None, ac.callsign);
    }

    #[test]
    fn test_half_position_is_no_position() {
        let ac = parse_one(json!({ "flight": "AFR564", "lat": 48.8 }));
        assert_eq!(None, ac.position);

        let ac = parse_one(json!({ "flight": "AFR564", "lon": 2.3, "lat": null }));
        assert_eq!(None, ac.position);
    }

    #[test]
    fn test_squawk_gets_description() {
        let ac = parse_one(json!({ "squawk": "7600" }));
        let squawk = ac.squawk.unwrap();
        assert_eq!("7600", squawk.code);
        assert_eq!(Some("Radio failure"), squawk.description);

        let ac = parse_one(json!({ "squawk": "4215" }));
        assert_eq!(None, ac.squawk.unwrap().description);

        let ac = parse_one(json!({}));
        assert_eq!(None, ac.squawk);
    }

    #[test]
    fn test_alert_defaults_to_zero() {
        assert_eq!(0, parse_one(json!({})).alerts);
        assert_eq!(0, parse_one(json!({ "alert": "many" })).alerts);
        assert_eq!(3, parse_one(json!({ "alert": 3 })).alerts);
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("emergency"), true)]
    #[case(json!(1), true)]
    #[case(json!(false), false)]
    #[case(json!(""), false)]
    #[case(json!(0), false)]
    #[case(json!(null), false)]
    fn test_emergency_truthiness(#[case] v: Value, #[case] expected: bool) {
        let raw = RawAircraft {
            emergency: Some(v),
            ..RawAircraft::default()
        };
        assert_eq!(expected, Aircraft::from(&raw).emergency);
    }

    #[test]
    fn test_emergency_missing_is_false() {
        assert!(!parse_one(json!({})).emergency);
    }
}

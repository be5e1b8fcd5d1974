/// Core data types for the launch conditions service.
///
/// This module defines the shared domain model imported by all other modules:
/// launch site identifiers, fetch requests and results, the error taxonomy,
/// and typed views over the backend's JSON payloads. It performs no I/O.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Value of the payload `error` field that signals an upstream rate limit.
pub const RATE_LIMIT_MARKER: &str = "RATE_LIMIT_REACHED";

/// Fixed user-visible message shown after the sample-data offer is declined.
pub const LIMIT_REACHED_MESSAGE: &str = "data retrieval limit reached";

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A launch site known to the dashboard backend.
///
/// Names are matched by exact string equality: no trimming, no case folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Kennedy Space Center")]
    KennedySpaceCenter,
    #[serde(rename = "Cape Canaveral")]
    CapeCanaveral,
    #[serde(rename = "Vandenberg SFB")]
    VandenbergSfb,
    #[serde(rename = "Wallops Flight Facility")]
    WallopsFlightFacility,
    #[serde(rename = "Kodiak Launch Complex")]
    KodiakLaunchComplex,
    #[serde(rename = "Spaceport America")]
    SpaceportAmerica,
}

impl Location {
    /// Every location, in registry order.
    pub const ALL: [Location; 6] = [
        Location::KennedySpaceCenter,
        Location::CapeCanaveral,
        Location::VandenbergSfb,
        Location::WallopsFlightFacility,
        Location::KodiakLaunchComplex,
        Location::SpaceportAmerica,
    ];

    /// The backend's name for this site.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::KennedySpaceCenter => "Kennedy Space Center",
            Location::CapeCanaveral => "Cape Canaveral",
            Location::VandenbergSfb => "Vandenberg SFB",
            Location::WallopsFlightFacility => "Wallops Flight Facility",
            Location::KodiakLaunchComplex => "Kodiak Launch Complex",
            Location::SpaceportAmerica => "Spaceport America",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|loc| loc.as_str() == s)
            .ok_or_else(|| ConditionError::UnknownLocation(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Requests and results
// ---------------------------------------------------------------------------

/// Which per-location backend resource a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Weather,
    LaunchScore,
}

impl ResourceKind {
    /// Path segment used by the backend, e.g. `/weather/{location}`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Weather => "weather",
            ResourceKind::LaunchScore => "launch_score",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A single fetch attempt. Built per attempt and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConditionRequest {
    pub location: Location,
    pub use_sample: bool,
}

impl ConditionRequest {
    /// A live-data request.
    pub fn live(location: Location) -> Self {
        Self { location, use_sample: false }
    }

    /// A sample-data request for the same site.
    pub fn sample(location: Location) -> Self {
        Self { location, use_sample: true }
    }
}

/// Outcome of one resource fetch. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionResult {
    /// The raw payload, unmodified.
    Ok(Value),
    /// The backend signalled `RATE_LIMIT_REACHED`.
    RateLimited,
    Failed(ConditionError),
}

impl ConditionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConditionResult::Ok(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ConditionResult::Ok(payload) => Some(payload),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching or decoding backend resources.
///
/// `Display` yields the user-visible message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    /// Network failure, non-JSON body, or similar lower-level problem.
    #[error("{0}")]
    Transport(String),
    /// The body was JSON but not the shape we expected.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The payload carried an `error` field other than the rate-limit marker.
    #[error("{0}")]
    Upstream(String),
    /// No response within the configured bound.
    #[error("timeout after {after:?}")]
    Timeout { after: Duration },
    /// Live data was rate limited and sample data was declined.
    #[error("data retrieval limit reached")]
    LimitReached,
    #[error("Unknown launch site: {0:?}")]
    UnknownLocation(String),
}

// ---------------------------------------------------------------------------
// Typed payload views
// ---------------------------------------------------------------------------

// Field decoders. Backend payloads are loosely typed, so a field with an
// unexpected shape reads as absent instead of failing the whole payload.

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64())
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_section<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(d)?).ok())
}

fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn require_object(payload: &Value) -> Result<(), ConditionError> {
    if payload.is_object() {
        Ok(())
    } else {
        Err(ConditionError::Parse(format!("expected a JSON object, got {}", payload)))
    }
}

/// The headline launch score: `composite_score`, or the legacy `score` field
/// when that is absent. Only JSON numbers count.
pub fn headline_score(payload: &Value) -> Option<f64> {
    payload
        .get("composite_score")
        .and_then(Value::as_f64)
        .or_else(|| payload.get("score").and_then(Value::as_f64))
}

/// One forecast step in the richer weather payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
}

/// Weather conditions decoded from a `/weather/{location}` payload.
///
/// Accepts both the flat shape and the `{current, forecast}` shape; for the
/// latter, current readings are lifted to the top level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub visibility: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub clouds: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub forecast: Vec<ForecastEntry>,
}

impl WeatherReport {
    pub fn from_payload(payload: &Value) -> Result<Self, ConditionError> {
        require_object(payload)?;
        let current = match payload.get("current") {
            Some(current) if current.is_object() => current,
            _ => payload,
        };
        let mut report: WeatherReport =
            serde_json::from_value(current.clone()).map_err(|e| ConditionError::Parse(e.to_string()))?;

        if report.location.is_none() {
            report.location = payload
                .get("location")
                .and_then(Value::as_str)
                .map(String::from);
        }
        if let Some(Value::Array(items)) = payload.get("forecast") {
            report.forecast = items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect();
        }
        Ok(report)
    }
}

/// Sub-scores that make up the composite launch score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreComponents {
    #[serde(deserialize_with = "lenient_number")]
    pub weather_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub visibility_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub wind_score: Option<f64>,
}

/// Raw readings reported alongside a launch score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConditions {
    #[serde(deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub wind: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub visibility: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub clouds: Option<f64>,
}

/// Launch readiness decoded from a `/launch_score/{location}` payload.
///
/// `composite_score` is taken by `headline_score`, so the legacy `score`
/// field is honoured and the two may appear together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchScoreReport {
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(skip_deserializing)]
    pub composite_score: Option<f64>,
    #[serde(deserialize_with = "lenient_section")]
    pub components: Option<ScoreComponents>,
    #[serde(deserialize_with = "lenient_section")]
    pub conditions: Option<LaunchConditions>,
}

impl LaunchScoreReport {
    pub fn from_payload(payload: &Value) -> Result<Self, ConditionError> {
        require_object(payload)?;
        let mut report: LaunchScoreReport =
            serde_json::from_value(payload.clone()).map_err(|e| ConditionError::Parse(e.to_string()))?;
        report.composite_score = headline_score(payload);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_names_round_trip_through_from_str() {
        for loc in Location::ALL {
            assert_eq!(loc.as_str().parse::<Location>(), Ok(loc));
        }
    }

    #[test]
    fn test_location_lookup_is_exact() {
        assert!("kennedy space center".parse::<Location>().is_err());
        assert!(" Cape Canaveral".parse::<Location>().is_err());
        assert!("Cape Canaveral Space Force Station".parse::<Location>().is_err());
    }

    #[test]
    fn test_location_serde_uses_backend_names() {
        let v = serde_json::to_value(Location::VandenbergSfb).unwrap();
        assert_eq!(v, json!("Vandenberg SFB"));
        let loc: Location = serde_json::from_value(json!("Spaceport America")).unwrap();
        assert_eq!(loc, Location::SpaceportAmerica);
    }

    #[test]
    fn test_weather_report_flat_shape() {
        let payload = json!({
            "location": "Kennedy Space Center",
            "temperature": 22.5,
            "description": "clear sky",
            "wind_speed": 4.1,
            "humidity": 70
        });
        let report = WeatherReport::from_payload(&payload).unwrap();
        assert_eq!(report.temperature, Some(22.5));
        assert_eq!(report.humidity, Some(70.0));
        assert!(report.forecast.is_empty());
    }

    #[test]
    fn test_weather_report_current_and_forecast_shape() {
        let payload = json!({
            "location": "Cape Canaveral",
            "current": { "temperature": 18.0, "wind_speed": 12.0, "humidity": 85 },
            "forecast": [
                { "time": "2024-12-15T15:00:00Z", "temperature": 19.0 },
                { "time": "2024-12-15T18:00:00Z", "temperature": 17.5 }
            ]
        });
        let report = WeatherReport::from_payload(&payload).unwrap();
        assert_eq!(report.location.as_deref(), Some("Cape Canaveral"));
        assert_eq!(report.wind_speed, Some(12.0));
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[1].temperature, Some(17.5));
    }

    #[test]
    fn test_launch_score_report_accepts_legacy_score_field() {
        let report = LaunchScoreReport::from_payload(&json!({ "location": "x", "score": 74.0 })).unwrap();
        assert_eq!(report.composite_score, Some(74.0));
    }

    #[test]
    fn test_launch_score_report_full_shape() {
        let payload = json!({
            "composite_score": 0,
            "components": { "weather_score": 10, "visibility_score": 0, "wind_score": 5 },
            "conditions": { "temperature": 31.0, "wind": 14.2, "visibility": 2.0, "clouds": 90 }
        });
        let report = LaunchScoreReport::from_payload(&payload).unwrap();
        assert_eq!(report.composite_score, Some(0.0));
        assert_eq!(report.components.unwrap().wind_score, Some(5.0));
        assert_eq!(report.conditions.unwrap().clouds, Some(90.0));
    }

    #[test]
    fn test_null_components_keep_the_score() {
        let report = LaunchScoreReport::from_payload(&json!({ "composite_score": 72, "components": null })).unwrap();
        assert_eq!(report.composite_score, Some(72.0));
        assert!(report.components.is_none());
    }

    #[test]
    fn test_textual_reading_reads_as_absent() {
        let payload = json!({
            "composite_score": 72,
            "conditions": { "visibility": "10 km", "wind": 6.5 }
        });
        let report = LaunchScoreReport::from_payload(&payload).unwrap();
        assert_eq!(report.composite_score, Some(72.0));
        let conditions = report.conditions.unwrap();
        assert_eq!(conditions.visibility, None);
        assert_eq!(conditions.wind, Some(6.5));
    }

    #[test]
    fn test_composite_and_legacy_score_together() {
        let payload = json!({ "composite_score": 72, "score": 40 });
        assert_eq!(headline_score(&payload), Some(72.0));
        let report = LaunchScoreReport::from_payload(&payload).unwrap();
        assert_eq!(report.composite_score, Some(72.0));
    }

    #[test]
    fn test_headline_score_falls_back_to_legacy_field() {
        assert_eq!(headline_score(&json!({ "composite_score": null, "score": 33 })), Some(33.0));
        assert_eq!(headline_score(&json!({ "composite_score": "high" })), None);
        assert_eq!(headline_score(&json!({ "location": "x" })), None);
    }

    #[test]
    fn test_weather_report_tolerates_odd_fields() {
        let payload = json!({
            "location": "Wallops Flight Facility",
            "current": { "temperature": 11.0, "humidity": "n/a" },
            "forecast": [ { "time": "+3h", "temperature": 12.0 }, "garbage" ]
        });
        let report = WeatherReport::from_payload(&payload).unwrap();
        assert_eq!(report.temperature, Some(11.0));
        assert_eq!(report.humidity, None);
        assert_eq!(report.forecast.len(), 1);
    }

    #[test]
    fn test_non_object_payload_is_parse_error() {
        assert!(matches!(
            LaunchScoreReport::from_payload(&json!("oops")),
            Err(ConditionError::Parse(_))
        ));
        assert!(matches!(
            WeatherReport::from_payload(&json!([1, 2])),
            Err(ConditionError::Parse(_))
        ));
    }

    #[test]
    fn test_error_messages_are_user_readable() {
        assert_eq!(ConditionError::LimitReached.to_string(), LIMIT_REACHED_MESSAGE);
        assert_eq!(
            ConditionError::Timeout { after: Duration::from_secs(10) }.to_string(),
            "timeout after 10s"
        );
        assert_eq!(
            ConditionError::Timeout { after: Duration::from_millis(250) }.to_string(),
            "timeout after 250ms"
        );
        assert_eq!(
            ConditionError::Upstream("Invalid location provided.".into()).to_string(),
            "Invalid location provided."
        );
    }
}

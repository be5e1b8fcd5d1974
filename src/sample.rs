/// Offline sample data for development
///
/// When the dashboard backend is unavailable, use `SampleSource` in place of
/// the HTTP backend. It serves fixed per-site payloads in the same shapes as
/// the live API and can pretend live data is rate limited, so the sample
/// fallback prompt can be exercised without a server.

use crate::client::ConditionSource;
use crate::model::{ConditionError, ConditionRequest, Location, RATE_LIMIT_MARKER, ResourceKind};
use crate::schedule::LaunchEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

/// Canned readings for one site.
struct SampleSite {
    location: Location,
    temperature: f64,
    description: &'static str,
    wind_speed: f64,
    humidity: f64,
    visibility: f64,
    clouds: f64,
    weather_score: f64,
    visibility_score: f64,
    wind_score: f64,
}

static SAMPLE_SITES: &[SampleSite] = &[
    SampleSite {
        location: Location::KennedySpaceCenter,
        temperature: 23.4,
        description: "few clouds",
        wind_speed: 4.6,
        humidity: 68.0,
        visibility: 16.0,
        clouds: 20.0,
        weather_score: 88.0,
        visibility_score: 95.0,
        wind_score: 84.0,
    },
    SampleSite {
        location: Location::CapeCanaveral,
        temperature: 24.1,
        description: "scattered clouds",
        wind_speed: 7.9,
        humidity: 74.0,
        visibility: 12.0,
        clouds: 45.0,
        weather_score: 72.0,
        visibility_score: 80.0,
        wind_score: 61.0,
    },
    SampleSite {
        location: Location::VandenbergSfb,
        temperature: 14.2,
        description: "mist",
        wind_speed: 6.1,
        humidity: 91.0,
        visibility: 3.5,
        clouds: 90.0,
        weather_score: 48.0,
        visibility_score: 30.0,
        wind_score: 70.0,
    },
    SampleSite {
        location: Location::WallopsFlightFacility,
        temperature: 9.8,
        description: "light rain",
        wind_speed: 11.4,
        humidity: 86.0,
        visibility: 8.0,
        clouds: 100.0,
        weather_score: 30.0,
        visibility_score: 55.0,
        wind_score: 35.0,
    },
    SampleSite {
        location: Location::KodiakLaunchComplex,
        temperature: 2.3,
        description: "overcast clouds",
        wind_speed: 14.8,
        humidity: 83.0,
        visibility: 10.0,
        clouds: 100.0,
        weather_score: 22.0,
        visibility_score: 60.0,
        wind_score: 12.0,
    },
    SampleSite {
        location: Location::SpaceportAmerica,
        temperature: 19.5,
        description: "clear sky",
        wind_speed: 3.2,
        humidity: 18.0,
        visibility: 40.0,
        clouds: 0.0,
        weather_score: 97.0,
        visibility_score: 100.0,
        wind_score: 92.0,
    },
];

impl SampleSite {
    fn find(location: Location) -> Option<&'static SampleSite> {
        SAMPLE_SITES.iter().find(|s| s.location == location)
    }

    /// Mean of the three sub-scores, rounded to one decimal.
    fn composite_score(&self) -> f64 {
        let mean = (self.weather_score + self.visibility_score + self.wind_score) / 3.0;
        (mean * 10.0).round() / 10.0
    }

    fn weather_payload(&self) -> Value {
        json!({
            "location": self.location.as_str(),
            "current": {
                "temperature": self.temperature,
                "description": self.description,
                "wind_speed": self.wind_speed,
                "humidity": self.humidity,
                "visibility": self.visibility,
                "clouds": self.clouds,
            },
            "forecast": [
                { "time": "+3h", "temperature": self.temperature + 0.8, "wind_speed": self.wind_speed + 1.0 },
                { "time": "+6h", "temperature": self.temperature - 1.1, "wind_speed": self.wind_speed + 0.4 },
            ],
        })
    }

    fn launch_score_payload(&self) -> Value {
        json!({
            "location": self.location.as_str(),
            "composite_score": self.composite_score(),
            "components": {
                "weather_score": self.weather_score,
                "visibility_score": self.visibility_score,
                "wind_score": self.wind_score,
            },
            "conditions": {
                "temperature": self.temperature,
                "wind": self.wind_speed,
                "visibility": self.visibility,
                "clouds": self.clouds,
            },
        })
    }
}

/// Configuration for offline sample serving
#[derive(Debug, Clone, Default)]
pub struct SampleSource {
    /// Answer live (non-sample) requests with the rate-limit marker
    pub rate_limit_live: bool,
}

impl SampleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose live data is always rate limited.
    pub fn rate_limited() -> Self {
        Self { rate_limit_live: true }
    }

    /// The payload this source serves for a request.
    pub fn payload_for(&self, kind: ResourceKind, request: ConditionRequest) -> Value {
        if self.rate_limit_live && !request.use_sample {
            return json!({ "error": RATE_LIMIT_MARKER });
        }
        match SampleSite::find(request.location) {
            Some(site) => match kind {
                ResourceKind::Weather => site.weather_payload(),
                ResourceKind::LaunchScore => site.launch_score_payload(),
            },
            None => json!({ "error": "Invalid location provided." }),
        }
    }
}

/// A small fixed launch schedule for offline runs.
pub fn sample_schedule() -> Vec<LaunchEntry> {
    let entry = |id: u64, site: Location, (y, m, d): (i32, u32, u32), time: &str, status: &str, rocket: &str| LaunchEntry {
        id,
        site: site.as_str().to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        time: time.to_string(),
        status: status.to_string(),
        mission: None,
        rocket: Some(rocket.to_string()),
        customer: None,
    };
    vec![
        entry(1, Location::KennedySpaceCenter, (2024, 12, 15), "14:30", "Scheduled", "Falcon 9"),
        entry(2, Location::CapeCanaveral, (2024, 12, 18), "10:00", "Scheduled", "Atlas V"),
        entry(3, Location::VandenbergSfb, (2024, 12, 20), "06:45", "Tentative", "Falcon 9"),
        entry(4, Location::WallopsFlightFacility, (2025, 1, 8), "17:10", "Scheduled", "Electron"),
        entry(5, Location::SpaceportAmerica, (2025, 1, 21), "09:00", "Tentative", "SpaceShipTwo"),
    ]
}

#[async_trait]
impl ConditionSource for SampleSource {
    async fn fetch_resource(
        &self,
        kind: ResourceKind,
        request: ConditionRequest,
    ) -> Result<Value, ConditionError> {
        Ok(self.payload_for(kind, request))
    }
}

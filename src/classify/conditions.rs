//! Per-condition optimal range checks.
//!
//! Individual readings (temperature, wind, humidity, ...) are judged against
//! a fixed optimal range and come out either optimal or suboptimal. This is
//! deliberately separate from the four-band score classifier.

use crate::model::{LaunchConditions, WeatherReport};
use serde::Serialize;
use std::fmt;

/// A reading that can be judged against an optimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Degrees Celsius.
    Temperature,
    /// Metres per second.
    WindSpeed,
    /// Percent relative humidity.
    Humidity,
    /// Kilometres.
    Visibility,
    /// Percent sky cover.
    CloudCover,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Temperature => write!(f, "Temperature"),
            ConditionKind::WindSpeed => write!(f, "Wind Speed"),
            ConditionKind::Humidity => write!(f, "Humidity"),
            ConditionKind::Visibility => write!(f, "Visibility"),
            ConditionKind::CloudCover => write!(f, "Cloud Cover"),
        }
    }
}

/// Inclusive optimal range. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl OptimalRange {
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl ConditionKind {
    pub fn optimal_range(&self) -> OptimalRange {
        match self {
            ConditionKind::Temperature => OptimalRange { min: Some(15.0), max: Some(25.0) },
            ConditionKind::WindSpeed => OptimalRange { min: None, max: Some(10.0) },
            ConditionKind::Humidity => OptimalRange { min: None, max: Some(80.0) },
            ConditionKind::Visibility => OptimalRange { min: Some(5.0), max: None },
            ConditionKind::CloudCover => OptimalRange { min: None, max: Some(50.0) },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionStatus {
    Optimal,
    Suboptimal,
}

/// One reading and its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionReading {
    pub kind: ConditionKind,
    pub value: f64,
    pub status: ConditionStatus,
}

pub fn classify_condition(kind: ConditionKind, value: f64) -> ConditionStatus {
    if kind.optimal_range().contains(value) {
        ConditionStatus::Optimal
    } else {
        ConditionStatus::Suboptimal
    }
}

fn readings(pairs: &[(ConditionKind, Option<f64>)]) -> Vec<ConditionReading> {
    pairs
        .iter()
        .filter_map(|&(kind, value)| {
            value.map(|value| ConditionReading {
                kind,
                value,
                status: classify_condition(kind, value),
            })
        })
        .collect()
}

/// Classifies every reading present in a weather report. Absent readings
/// are skipped rather than judged.
pub fn weather_readings(report: &WeatherReport) -> Vec<ConditionReading> {
    readings(&[
        (ConditionKind::Temperature, report.temperature),
        (ConditionKind::WindSpeed, report.wind_speed),
        (ConditionKind::Humidity, report.humidity),
        (ConditionKind::Visibility, report.visibility),
        (ConditionKind::CloudCover, report.clouds),
    ])
}

/// Classifies the readings attached to a launch score.
pub fn launch_readings(conditions: &LaunchConditions) -> Vec<ConditionReading> {
    readings(&[
        (ConditionKind::Temperature, conditions.temperature),
        (ConditionKind::WindSpeed, conditions.wind),
        (ConditionKind::Visibility, conditions.visibility),
        (ConditionKind::CloudCover, conditions.clouds),
    ])
}

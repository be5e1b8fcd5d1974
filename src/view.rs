//! Classified panel output handed to the presentation layer.
//!
//! Takes the raw `Ok` payload of a resource fetch and runs its score and
//! reading fields through the classifiers. The result is plain data; how it
//! is rendered is up to the view layer.

use crate::classify::conditions::{launch_readings, weather_readings};
use crate::classify::{ConditionReading, ScoreClassification, classify};
use crate::fallback::SampleFallbackController;
use crate::model::{ConditionError, LaunchScoreReport, Location, ResourceKind, WeatherReport};
use serde::Serialize;
use serde_json::Value;

/// A sub-score with its band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    pub name: &'static str,
    pub score: Option<f64>,
    pub classification: ScoreClassification,
}

/// Everything a panel needs to render one successful payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPayload {
    pub kind: &'static str,
    /// Headline score, if the resource has one.
    pub score: Option<f64>,
    pub classification: ScoreClassification,
    pub components: Vec<ComponentScore>,
    pub readings: Vec<ConditionReading>,
    pub description: Option<String>,
}

pub fn classify_payload(kind: ResourceKind, payload: &Value) -> Result<ClassifiedPayload, ConditionError> {
    match kind {
        ResourceKind::LaunchScore => {
            let report = LaunchScoreReport::from_payload(payload)?;
            let sub = report.components.unwrap_or_default();
            let components = [
                ("weather", sub.weather_score),
                ("visibility", sub.visibility_score),
                ("wind", sub.wind_score),
            ]
            .into_iter()
            .filter(|(_, score)| score.is_some())
            .map(|(name, score)| ComponentScore {
                name,
                score,
                classification: classify(score),
            })
            .collect();

            Ok(ClassifiedPayload {
                kind: kind.path_segment(),
                score: report.composite_score,
                classification: classify(report.composite_score),
                components,
                readings: report.conditions.as_ref().map(launch_readings).unwrap_or_default(),
                description: None,
            })
        }
        ResourceKind::Weather => {
            let report = WeatherReport::from_payload(payload)?;
            Ok(ClassifiedPayload {
                kind: kind.path_segment(),
                score: None,
                classification: classify(None),
                components: Vec::new(),
                readings: weather_readings(&report),
                description: report.description,
            })
        }
    }
}

/// Snapshot of one detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub location: Location,
    pub loading: bool,
    pub prompt_visible: bool,
    pub error: Option<String>,
    pub content: Option<ClassifiedPayload>,
}

impl PanelView {
    pub fn from_controller(controller: &SampleFallbackController) -> Self {
        let kind = controller.client().kind();
        let decoded = controller.payload().map(|payload| classify_payload(kind, payload));

        let (content, decode_error) = match decoded {
            Some(Ok(content)) => (Some(content), None),
            Some(Err(err)) => (None, Some(err.to_string())),
            None => (None, None),
        };

        PanelView {
            location: controller.location(),
            loading: controller.is_loading(),
            prompt_visible: controller.prompt_visible(),
            error: controller.error().map(ToString::to_string).or(decode_error),
            content,
        }
    }
}

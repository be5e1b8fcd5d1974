/// Score and condition classification.
///
/// Submodules:
/// - `bands`: four-band severity classification of 0–100 scores.
/// - `conditions`: optimal/suboptimal checks for individual readings.

pub mod bands;
pub mod conditions;

pub use bands::{BandColor, ScoreBand, ScoreClassification, classify};
pub use conditions::{ConditionKind, ConditionReading, ConditionStatus, classify_condition};

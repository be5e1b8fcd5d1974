//! Four-band score classification.
//!
//! Maps a 0–100 score (composite launch score or any sub-score) to a severity
//! band, a display color, and a fixed message. The classifier does not know
//! which resource produced the number.

use serde::Serialize;
use std::fmt;

/// Lower bound (inclusive) of the marginal band.
pub const MARGINAL_FLOOR: f64 = 40.0;
/// Lower bound (inclusive) of the good band.
pub const GOOD_FLOOR: f64 = 60.0;
/// Lower bound (inclusive) of the excellent band.
pub const EXCELLENT_FLOOR: f64 = 80.0;

/// Score severity bands, in ascending order of readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// No score was available.
    Unknown,
    Critical,
    Marginal,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn color(&self) -> BandColor {
        match self {
            ScoreBand::Unknown => BandColor::Gray,
            ScoreBand::Critical => BandColor::Red,
            ScoreBand::Marginal => BandColor::Orange,
            ScoreBand::Good => BandColor::Yellow,
            ScoreBand::Excellent => BandColor::Green,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Unknown => "No data available",
            ScoreBand::Critical => "Launch conditions are unfavorable",
            ScoreBand::Marginal => "Launch conditions are marginal",
            ScoreBand::Good => "Launch conditions are good",
            ScoreBand::Excellent => "Launch conditions are excellent",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Unknown => write!(f, "unknown"),
            ScoreBand::Critical => write!(f, "critical"),
            ScoreBand::Marginal => write!(f, "marginal"),
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::Excellent => write!(f, "excellent"),
        }
    }
}

/// Display color for a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
    Red,
    Orange,
    Yellow,
    Green,
    Gray,
}

impl fmt::Display for BandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandColor::Red => write!(f, "red"),
            BandColor::Orange => write!(f, "orange"),
            BandColor::Yellow => write!(f, "yellow"),
            BandColor::Green => write!(f, "green"),
            BandColor::Gray => write!(f, "gray"),
        }
    }
}

/// Result of classifying one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreClassification {
    pub band: ScoreBand,
    pub color: BandColor,
    pub message: &'static str,
}

/// Picks the band for a score. Bands are closed below and open above;
/// anything under 40 (negatives included) is critical and anything from
/// 80 up is excellent. `0` is a real score. NaN has no band.
pub fn band_for(score: Option<f64>) -> ScoreBand {
    match score {
        None => ScoreBand::Unknown,
        Some(s) if s.is_nan() => ScoreBand::Unknown,
        Some(s) if s >= EXCELLENT_FLOOR => ScoreBand::Excellent,
        Some(s) if s >= GOOD_FLOOR => ScoreBand::Good,
        Some(s) if s >= MARGINAL_FLOOR => ScoreBand::Marginal,
        Some(_) => ScoreBand::Critical,
    }
}

/// Classifies a score into band, color and message. Never fails.
pub fn classify(score: Option<f64>) -> ScoreClassification {
    let band = band_for(score);
    ScoreClassification {
        band,
        color: band.color(),
        message: band.message(),
    }
}

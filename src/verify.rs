//! Site Availability Verification
//!
//! Fetches both per-site resources for every configured launch site and
//! reports which sites are currently answering with live data.
//!
//! Run this before a launch window to see which panels will need the
//! sample-data fallback.

use crate::aggregate::score_from_payload;
use crate::client::ConditionClient;
use crate::model::{ConditionRequest, ConditionResult, Location, WeatherReport};
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<SiteVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub rate_limited: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceCheck {
    pub responsive: bool,
    pub rate_limited: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteVerification {
    pub location: Location,
    pub status: VerificationStatus,
    pub weather: ResourceCheck,
    pub launch_score: ResourceCheck,
    pub temperature: Option<f64>,
    pub composite_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Both resources returned live data
    Success,
    /// Exactly one resource returned live data
    PartialSuccess,
    /// Neither returned data and at least one was rate limited
    RateLimited,
    Failed,
}

impl ResourceCheck {
    fn from_result(result: &ConditionResult) -> Self {
        match result {
            ConditionResult::Ok(_) => ResourceCheck {
                responsive: true,
                rate_limited: false,
                error_message: None,
            },
            ConditionResult::RateLimited => ResourceCheck {
                responsive: true,
                rate_limited: true,
                error_message: None,
            },
            ConditionResult::Failed(err) => ResourceCheck {
                responsive: false,
                rate_limited: false,
                error_message: Some(err.to_string()),
            },
        }
    }
}

// ============================================================================
// Per-site verification
// ============================================================================

fn site_status(weather: &ConditionResult, score: &ConditionResult) -> VerificationStatus {
    match (weather.is_ok(), score.is_ok()) {
        (true, true) => VerificationStatus::Success,
        (true, false) | (false, true) => VerificationStatus::PartialSuccess,
        (false, false) => {
            let limited = matches!(weather, ConditionResult::RateLimited)
                || matches!(score, ConditionResult::RateLimited);
            if limited {
                VerificationStatus::RateLimited
            } else {
                VerificationStatus::Failed
            }
        }
    }
}

pub async fn verify_site(
    weather_client: &ConditionClient,
    score_client: &ConditionClient,
    location: Location,
) -> SiteVerification {
    let request = ConditionRequest::live(location);
    let (weather, score) = futures::join!(weather_client.fetch(request), score_client.fetch(request));

    let temperature = weather
        .payload()
        .and_then(|p| WeatherReport::from_payload(p).ok())
        .and_then(|report| report.temperature);
    let composite_score = score.payload().and_then(score_from_payload);

    SiteVerification {
        location,
        status: site_status(&weather, &score),
        weather: ResourceCheck::from_result(&weather),
        launch_score: ResourceCheck::from_result(&score),
        temperature,
        composite_score,
    }
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub async fn verify_sites(
    weather_client: &ConditionClient,
    score_client: &ConditionClient,
    sites: &[Location],
) -> VerificationReport {
    let results = join_all(
        sites
            .iter()
            .map(|&location| verify_site(weather_client, score_client, location)),
    )
    .await;

    let mut summary = VerificationSummary {
        total: results.len(),
        ..Default::default()
    };
    for result in &results {
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => summary.working += 1,
            VerificationStatus::RateLimited => summary.rate_limited += 1,
            VerificationStatus::Failed => summary.failed += 1,
        }
    }

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results,
        summary,
    }
}

fn describe(check: &ResourceCheck) -> String {
    if check.rate_limited {
        "rate limited".to_string()
    } else if check.responsive {
        "ok".to_string()
    } else {
        check.error_message.clone().unwrap_or_else(|| "Unknown".to_string())
    }
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("🚀 SITE AVAILABILITY  ({})", report.timestamp);
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for result in &report.results {
        let marker = match result.status {
            VerificationStatus::Success => "✓",
            VerificationStatus::PartialSuccess => "⚠",
            VerificationStatus::RateLimited => "⏳",
            VerificationStatus::Failed => "✗",
        };
        println!(
            "  {} {:<26} weather: {:<14} score: {}",
            marker,
            result.location.as_str(),
            describe(&result.weather),
            describe(&result.launch_score)
        );
    }
    println!();

    let s = &report.summary;
    println!(
        "Sites: {}/{} working  ({} rate limited, {} failed)",
        s.working, s.total, s.rate_limited, s.failed
    );
    let success_rate = if s.total > 0 {
        (s.working as f64 / s.total as f64) * 100.0
    } else {
        0.0
    };
    println!("Overall Success Rate: {:.1}%", success_rate);
    println!("═══════════════════════════════════════════════════════════");
}

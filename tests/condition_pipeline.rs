//! End-to-end tests for the fetch / fallback / classify / aggregate pipeline
//!
//! Every test runs against an in-memory `ConditionSource`, so no backend is
//! needed. Per-site delays let tests control the order in which concurrent
//! fetches complete.
//!
//! Run with: cargo test --test condition_pipeline

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use launchmon_service::aggregate::SiteScoreAggregator;
use launchmon_service::classify::{BandColor, ScoreBand, classify};
use launchmon_service::client::{ConditionClient, ConditionSource};
use launchmon_service::fallback::{ApplyOutcome, FallbackState, SampleFallbackController};
use launchmon_service::model::{ConditionError, ConditionRequest, ConditionResult, Location, ResourceKind};
use launchmon_service::view::PanelView;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Script {
    Score(f64),
    RateLimited,
    Down,
}

/// Scripted backend: one behaviour and one delay per site. Sample requests
/// always succeed with a fixed score.
struct ScriptedBackend {
    sites: HashMap<Location, (u64, Script)>,
    calls: Mutex<Vec<(ResourceKind, ConditionRequest)>>,
}

const SAMPLE_SCORE: f64 = 50.0;

impl ScriptedBackend {
    fn new(sites: &[(Location, u64, Script)]) -> Arc<Self> {
        Arc::new(Self {
            sites: sites.iter().map(|(l, d, s)| (*l, (*d, s.clone()))).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(ResourceKind, ConditionRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConditionSource for ScriptedBackend {
    async fn fetch_resource(
        &self,
        kind: ResourceKind,
        request: ConditionRequest,
    ) -> Result<Value, ConditionError> {
        self.calls.lock().unwrap().push((kind, request));
        let (delay_ms, script) = self
            .sites
            .get(&request.location)
            .cloned()
            .unwrap_or((0, Script::Down));
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        let location = request.location.as_str();
        if request.use_sample {
            return Ok(json!({ "location": location, "composite_score": SAMPLE_SCORE, "sample": true }));
        }
        match script {
            Script::Score(score) => Ok(json!({ "location": location, "composite_score": score })),
            Script::RateLimited => Ok(json!({ "error": "RATE_LIMIT_REACHED" })),
            Script::Down => Err(ConditionError::Transport("connection refused".into())),
        }
    }
}

fn score_client(backend: &Arc<ScriptedBackend>) -> ConditionClient {
    ConditionClient::new(backend.clone(), ResourceKind::LaunchScore)
}

// ---------------------------------------------------------------------------
// Site score aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_six_sites_two_failing_yields_four_entries() {
    let backend = ScriptedBackend::new(&[
        (Location::KennedySpaceCenter, 10, Script::Score(85.0)),
        (Location::CapeCanaveral, 20, Script::RateLimited),
        (Location::VandenbergSfb, 5, Script::Score(62.5)),
        (Location::WallopsFlightFacility, 15, Script::Down),
        (Location::KodiakLaunchComplex, 30, Script::Score(0.0)),
        (Location::SpaceportAmerica, 0, Script::Score(41.0)),
    ]);
    let aggregator = SiteScoreAggregator::new(score_client(&backend));

    let map = aggregator.aggregate_scores(&Location::ALL).await;

    assert_eq!(map.len(), 4);
    assert_eq!(map.get(Location::KennedySpaceCenter), Some(85.0));
    assert_eq!(map.get(Location::KodiakLaunchComplex), Some(0.0));
    assert!(!map.contains(Location::CapeCanaveral));
    assert!(!map.contains(Location::WallopsFlightFacility));

    // The map never retries and never asks for sample data.
    let calls = backend.calls();
    assert_eq!(calls.len(), 6);
    assert!(calls.iter().all(|(_, req)| !req.use_sample));
}

#[tokio::test]
async fn test_completion_order_does_not_change_the_map() {
    let scripts = [
        (Location::KennedySpaceCenter, Script::Score(91.0)),
        (Location::CapeCanaveral, Script::Score(72.0)),
        (Location::VandenbergSfb, Script::RateLimited),
        (Location::WallopsFlightFacility, Script::Score(38.5)),
        (Location::KodiakLaunchComplex, Script::Down),
        (Location::SpaceportAmerica, Script::Score(60.0)),
    ];

    let ascending: Vec<_> = scripts
        .iter()
        .enumerate()
        .map(|(i, (l, s))| (*l, i as u64 * 15, s.clone()))
        .collect();
    let descending: Vec<_> = scripts
        .iter()
        .enumerate()
        .map(|(i, (l, s))| (*l, (5 - i as u64) * 15, s.clone()))
        .collect();

    let first = SiteScoreAggregator::new(score_client(&ScriptedBackend::new(&ascending)))
        .aggregate_scores(&Location::ALL)
        .await;
    let second = SiteScoreAggregator::new(score_client(&ScriptedBackend::new(&descending)))
        .aggregate_scores(&Location::ALL)
        .await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[tokio::test]
async fn test_incremental_map_matches_joined_map() {
    let backend = ScriptedBackend::new(&[
        (Location::KennedySpaceCenter, 40, Script::Score(88.0)),
        (Location::CapeCanaveral, 10, Script::Score(45.0)),
        (Location::SpaceportAmerica, 25, Script::RateLimited),
    ]);
    let aggregator = SiteScoreAggregator::new(score_client(&backend));
    let sites = [Location::KennedySpaceCenter, Location::CapeCanaveral, Location::SpaceportAmerica];

    let mut updates = 0;
    let incremental = aggregator
        .aggregate_scores_incremental(&sites, |_, _| updates += 1)
        .await;
    let joined = aggregator.aggregate_scores(&sites).await;

    assert_eq!(updates, 2);
    assert_eq!(incremental, joined);
}

// ---------------------------------------------------------------------------
// Sample-data fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_accept_issues_exactly_one_sample_retry() {
    let backend = ScriptedBackend::new(&[(Location::VandenbergSfb, 0, Script::RateLimited)]);
    let mut panel = SampleFallbackController::new(score_client(&backend), Location::KennedySpaceCenter);

    assert_eq!(panel.load(Location::VandenbergSfb).await, ApplyOutcome::PromptShown);
    let view = PanelView::from_controller(&panel);
    assert!(view.prompt_visible);
    assert!(view.content.is_none());
    assert!(view.error.is_none());

    assert_eq!(panel.accept_sample().await.unwrap(), ApplyOutcome::Loaded);
    assert_eq!(panel.state(), FallbackState::Idle);
    assert_eq!(panel.payload().unwrap()["sample"], true);

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, ConditionRequest::sample(Location::VandenbergSfb));

    let view = PanelView::from_controller(&panel);
    let content = view.content.unwrap();
    assert_eq!(content.score, Some(SAMPLE_SCORE));
    assert_eq!(content.classification.band, ScoreBand::Marginal);
}

#[tokio::test]
async fn test_decline_issues_no_fetch_and_shows_fixed_message() {
    let backend = ScriptedBackend::new(&[(Location::CapeCanaveral, 0, Script::RateLimited)]);
    let mut panel = SampleFallbackController::new(score_client(&backend), Location::CapeCanaveral);

    panel.load(Location::CapeCanaveral).await;
    panel.decline_sample().unwrap();

    assert_eq!(backend.calls().len(), 1);
    let view = PanelView::from_controller(&panel);
    assert!(!view.prompt_visible);
    assert_eq!(view.error.as_deref(), Some("data retrieval limit reached"));
}

#[tokio::test]
async fn test_later_selection_wins_over_slower_earlier_fetch() {
    // A is slow, B is fast; both are in flight together.
    let backend = ScriptedBackend::new(&[
        (Location::KennedySpaceCenter, 80, Script::Score(12.0)),
        (Location::WallopsFlightFacility, 5, Script::Score(82.0)),
    ]);
    let mut panel = SampleFallbackController::new(score_client(&backend), Location::KennedySpaceCenter);
    let client = panel.client().clone();

    let ticket_a = panel.select_location(Location::KennedySpaceCenter);
    let ticket_b = panel.select_location(Location::WallopsFlightFacility);

    let mut in_flight: FuturesUnordered<_> = [ticket_a, ticket_b]
        .into_iter()
        .map(|ticket| {
            let client = client.clone();
            async move {
                let result = client.fetch(ticket.request).await;
                (ticket, result)
            }
        })
        .collect();

    let mut outcomes = Vec::new();
    while let Some((ticket, result)) = in_flight.next().await {
        let location = ticket.request.location;
        outcomes.push((location, panel.apply(ticket, result)));
    }

    assert_eq!(
        outcomes,
        vec![
            (Location::WallopsFlightFacility, ApplyOutcome::Loaded),
            (Location::KennedySpaceCenter, ApplyOutcome::Discarded),
        ]
    );
    assert_eq!(panel.location(), Location::WallopsFlightFacility);
    assert_eq!(panel.payload().unwrap()["composite_score"], 82.0);
    assert!(!panel.is_loading());
}

#[tokio::test]
async fn test_transport_failure_reaches_panel_as_error() {
    let backend = ScriptedBackend::new(&[(Location::KodiakLaunchComplex, 0, Script::Down)]);
    let mut panel = SampleFallbackController::new(score_client(&backend), Location::KodiakLaunchComplex);

    assert_eq!(panel.load(Location::KodiakLaunchComplex).await, ApplyOutcome::Failed);
    let view = PanelView::from_controller(&panel);
    assert!(!view.prompt_visible);
    assert_eq!(view.error.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = ScriptedBackend::new(&[(Location::SpaceportAmerica, 500, Script::Score(70.0))]);
    let client = score_client(&backend).with_timeout(Duration::from_millis(50));

    let result = client.fetch(ConditionRequest::live(Location::SpaceportAmerica)).await;

    assert!(matches!(result, ConditionResult::Failed(ConditionError::Timeout { .. })));
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn test_band_boundaries() {
    let cases = [
        (Some(0.0), ScoreBand::Critical, BandColor::Red),
        (Some(39.999), ScoreBand::Critical, BandColor::Red),
        (Some(40.0), ScoreBand::Marginal, BandColor::Orange),
        (Some(59.9), ScoreBand::Marginal, BandColor::Orange),
        (Some(60.0), ScoreBand::Good, BandColor::Yellow),
        (Some(79.9), ScoreBand::Good, BandColor::Yellow),
        (Some(80.0), ScoreBand::Excellent, BandColor::Green),
        (Some(100.0), ScoreBand::Excellent, BandColor::Green),
        (None, ScoreBand::Unknown, BandColor::Gray),
    ];
    for (score, band, color) in cases {
        let c = classify(score);
        assert_eq!(c.band, band, "score {:?}", score);
        assert_eq!(c.color, color, "score {:?}", score);
    }
}

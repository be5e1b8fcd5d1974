//! Live Backend Integration Tests
//!
//! These talk to a running dashboard backend and report which launch sites
//! are answering. They are ignored by default.
//!
//! Prerequisites:
//! - Backend listening on LAUNCHMON_API_BASE (default http://localhost:5000)
//!
//! Run with: cargo test --test live_backend -- --ignored --nocapture

use launchmon_service::client::ConditionClient;
use launchmon_service::config::DashboardConfig;
use launchmon_service::ingest::backend::HttpBackend;
use launchmon_service::model::{ConditionRequest, ConditionResult, Location, ResourceKind};
use launchmon_service::schedule::ScheduleFilter;
use launchmon_service::verify::{VerificationStatus, print_summary, verify_sites};
use std::sync::Arc;

fn backend() -> HttpBackend {
    let config = DashboardConfig::load(None).expect("configuration should load");
    HttpBackend::new(&config.api_base_url, config.request_timeout()).expect("backend URL should parse")
}

#[tokio::test]
#[ignore]
async fn test_every_site_answers() {
    let source = Arc::new(backend());
    let weather = ConditionClient::new(source.clone(), ResourceKind::Weather);
    let score = ConditionClient::new(source, ResourceKind::LaunchScore);

    let report = verify_sites(&weather, &score, &Location::ALL).await;
    print_summary(&report);

    assert_eq!(report.summary.total, Location::ALL.len());
    assert!(
        report.results.iter().all(|r| r.status != VerificationStatus::Failed),
        "some sites failed outright"
    );
}

#[tokio::test]
#[ignore]
async fn test_sample_data_is_served_for_known_site() {
    let client = ConditionClient::new(Arc::new(backend()), ResourceKind::LaunchScore);

    let result = client
        .fetch(ConditionRequest::sample(Location::KennedySpaceCenter))
        .await;

    match result {
        ConditionResult::Ok(payload) => println!("sample payload: {}", payload),
        other => panic!("expected sample data, got {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_schedule_filter_by_site() {
    let filter = ScheduleFilter {
        site: Some(Location::KennedySpaceCenter),
        ..Default::default()
    };
    let entries = backend()
        .fetch_launch_schedule(&filter)
        .await
        .expect("schedule should load");

    println!("{} launches at Kennedy Space Center", entries.len());
    assert!(entries.iter().all(|e| e.site == "Kennedy Space Center"));
}

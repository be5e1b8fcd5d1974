//! Multi-site launch score aggregation for the map view.
//!
//! Fans out one launch-score fetch per site, joins them, and keys the
//! results by site. A site whose fetch fails, is rate limited, or returns no
//! usable score is simply absent from the map. There is no retry and no
//! sample-data prompt here; that flow belongs to the detail panels.

use crate::classify::{BandColor, ScoreBand, classify};
use crate::client::ConditionClient;
use crate::logging::{self, DataSource};
use crate::model::{ConditionRequest, ConditionResult, Location, headline_score};
use crate::sites::SITE_REGISTRY;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Score map
// ---------------------------------------------------------------------------

/// Final launch scores keyed by site. A site is either absent or holds its
/// resolved score; there is no partial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SiteScoreMap {
    scores: BTreeMap<Location, f64>,
}

impl SiteScoreMap {
    pub fn get(&self, location: Location) -> Option<f64> {
        self.scores.get(&location).copied()
    }

    pub fn contains(&self, location: Location) -> bool {
        self.scores.contains_key(&location)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, f64)> + '_ {
        self.scores.iter().map(|(loc, score)| (*loc, *score))
    }

    fn insert(&mut self, location: Location, score: f64) {
        self.scores.insert(location, score);
    }
}

/// Pulls the composite score out of a launch-score payload.
pub fn score_from_payload(payload: &Value) -> Option<f64> {
    headline_score(payload).filter(|score| score.is_finite())
}

fn settle(location: Location, result: ConditionResult) -> Option<f64> {
    match result {
        ConditionResult::Ok(payload) => {
            let score = score_from_payload(&payload);
            if score.is_none() {
                logging::warn(DataSource::Map, Some(location.as_str()), "payload carried no usable score");
            }
            score
        }
        // Already logged by the client; the map stays silent about it.
        ConditionResult::RateLimited | ConditionResult::Failed(_) => None,
    }
}

fn unique(sites: &[Location]) -> Vec<Location> {
    let mut seen = Vec::with_capacity(sites.len());
    for site in sites {
        if !seen.contains(site) {
            seen.push(*site);
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Owns the map view's score map and is its only writer.
pub struct SiteScoreAggregator {
    client: ConditionClient,
    scores: SiteScoreMap,
}

impl SiteScoreAggregator {
    /// `client` should be a launch-score client.
    pub fn new(client: ConditionClient) -> Self {
        Self {
            client,
            scores: SiteScoreMap::default(),
        }
    }

    pub fn scores(&self) -> &SiteScoreMap {
        &self.scores
    }

    /// Fetches every site concurrently and returns once all have settled.
    pub async fn aggregate_scores(&self, sites: &[Location]) -> SiteScoreMap {
        let sites = unique(sites);
        let results = join_all(sites.iter().map(|&location| {
            let client = &self.client;
            async move { (location, client.fetch(ConditionRequest::live(location)).await) }
        }))
        .await;

        let mut map = SiteScoreMap::default();
        for (location, result) in results {
            if let Some(score) = settle(location, result) {
                map.insert(location, score);
            }
        }
        logging::log_aggregate_summary(sites.len(), map.len());
        map
    }

    /// Like `aggregate_scores`, but reports each site's score to `on_score`
    /// as soon as that site settles. Each call is one complete site entry.
    pub async fn aggregate_scores_incremental<F>(&self, sites: &[Location], mut on_score: F) -> SiteScoreMap
    where
        F: FnMut(Location, f64),
    {
        let sites = unique(sites);
        let mut pending: FuturesUnordered<_> = sites
            .iter()
            .map(|&location| {
                let client = &self.client;
                async move { (location, client.fetch(ConditionRequest::live(location)).await) }
            })
            .collect();

        let mut map = SiteScoreMap::default();
        while let Some((location, result)) = pending.next().await {
            if let Some(score) = settle(location, result) {
                map.insert(location, score);
                on_score(location, score);
            }
        }
        logging::log_aggregate_summary(sites.len(), map.len());
        map
    }

    /// Re-aggregates and replaces the owned map in one step.
    pub async fn refresh(&mut self, sites: &[Location]) -> &SiteScoreMap {
        self.scores = self.aggregate_scores(sites).await;
        &self.scores
    }
}

// ---------------------------------------------------------------------------
// Map markers
// ---------------------------------------------------------------------------

/// What the tile map needs to draw one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub location: Location,
    pub latitude: f64,
    pub longitude: f64,
    pub description: &'static str,
    pub score: Option<f64>,
    pub band: ScoreBand,
    pub color: BandColor,
}

/// One marker per registered site; unscored sites are gray.
pub fn map_markers(scores: &SiteScoreMap) -> Vec<MapMarker> {
    SITE_REGISTRY
        .iter()
        .map(|site| {
            let score = scores.get(site.location);
            let classification = classify(score);
            MapMarker {
                location: site.location,
                latitude: site.latitude,
                longitude: site.longitude,
                description: site.description,
                score,
                band: classification.band,
                color: classification.color,
            }
        })
        .collect()
}

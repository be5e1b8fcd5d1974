/// Dashboard backend API client
///
/// Retrieves per-site weather conditions and launch scores, and the launch
/// schedule, from the dashboard's backend service.
///
/// Endpoints:
///   GET /weather/{location}[?use_sample=true]
///   GET /launch_score/{location}[?use_sample=true]
///   GET /launch_schedule[?site=&startDate=&endDate=&status=]

use crate::client::ConditionSource;
use crate::model::{ConditionError, ConditionRequest, RATE_LIMIT_MARKER, ResourceKind};
use crate::schedule::{LaunchEntry, ScheduleFilter};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

// ============================================================================
// URL Construction
// ============================================================================

/// Builds `{base}/{resource}/{location}`, percent-encoding the site name and
/// appending `use_sample=true` for sample requests.
pub fn build_resource_url(
    base: &Url,
    kind: ResourceKind,
    request: &ConditionRequest,
) -> Result<Url, ConditionError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ConditionError::Transport(format!("cannot use {} as a base URL", base)))?
        .pop_if_empty()
        .push(kind.path_segment())
        .push(request.location.as_str());
    if request.use_sample {
        url.query_pairs_mut().append_pair("use_sample", "true");
    }
    Ok(url)
}

/// Builds `{base}/launch_schedule` with the filter's query parameters.
pub fn build_schedule_url(base: &Url, filter: &ScheduleFilter) -> Result<Url, ConditionError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ConditionError::Transport(format!("cannot use {} as a base URL", base)))?
        .pop_if_empty()
        .push("launch_schedule");
    let pairs = filter.query_pairs();
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

// ============================================================================
// API Client
// ============================================================================

/// HTTP implementation of `ConditionSource`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpBackend {
    /// # Parameters
    /// - `base_url`: backend root, e.g. `http://localhost:5000`
    /// - `timeout`: transport-level timeout for each request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConditionError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConditionError::Transport(format!("invalid backend URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConditionError::Transport(e.to_string()))?;
        Ok(Self { client, base_url, timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GETs a URL and decodes the body as JSON, whatever the status code.
    async fn get_json(&self, url: Url) -> Result<Value, ConditionError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                ConditionError::Parse(e.to_string())
            } else {
                ConditionError::Transport(format!("HTTP error: {}", status))
            }
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ConditionError {
        if e.is_timeout() {
            ConditionError::Timeout { after: self.timeout }
        } else {
            ConditionError::Transport(e.to_string())
        }
    }

    /// Fetch the launch schedule, filtered server-side.
    pub async fn fetch_launch_schedule(
        &self,
        filter: &ScheduleFilter,
    ) -> Result<Vec<LaunchEntry>, ConditionError> {
        let url = build_schedule_url(&self.base_url, filter)?;
        let payload = self.get_json(url).await?;
        parse_schedule(payload)
    }
}

#[async_trait]
impl ConditionSource for HttpBackend {
    async fn fetch_resource(
        &self,
        kind: ResourceKind,
        request: ConditionRequest,
    ) -> Result<Value, ConditionError> {
        let url = build_resource_url(&self.base_url, kind, &request)?;
        self.get_json(url).await
    }
}

/// Decodes a schedule payload. An `{error: ...}` object instead of an array
/// is surfaced as an error.
pub fn parse_schedule(payload: Value) -> Result<Vec<LaunchEntry>, ConditionError> {
    if let Some(err) = payload.get("error") {
        return Err(match err.as_str() {
            Some(RATE_LIMIT_MARKER) => ConditionError::LimitReached,
            Some(message) => ConditionError::Upstream(message.to_string()),
            None => ConditionError::Upstream(err.to_string()),
        });
    }
    serde_json::from_value(payload).map_err(|e| ConditionError::Parse(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

//! Single-resource condition fetching.
//!
//! `ConditionClient` wraps a `ConditionSource` (the HTTP backend in
//! production, an in-memory source in tests and offline mode), bounds each
//! fetch with a timeout, and folds every outcome into a `ConditionResult`.
//! Nothing escapes this boundary as an error or a panic.

use crate::logging::{self, DataSource};
use crate::model::{
    ConditionError, ConditionRequest, ConditionResult, RATE_LIMIT_MARKER, ResourceKind,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce the decoded JSON body of a per-location
/// resource. HTTP status is deliberately not part of the contract: the
/// payload's `error` field decides the outcome.
#[async_trait]
pub trait ConditionSource: Send + Sync {
    async fn fetch_resource(
        &self,
        kind: ResourceKind,
        request: ConditionRequest,
    ) -> Result<Value, ConditionError>;
}

/// Maps a decoded payload onto a result.
///
/// - `error == "RATE_LIMIT_REACHED"` → `RateLimited`
/// - any other non-null `error` → `Failed(Upstream)`
/// - otherwise → `Ok` with the payload untouched
pub fn interpret_payload(payload: Value) -> ConditionResult {
    match payload.get("error") {
        None | Some(Value::Null) => ConditionResult::Ok(payload),
        Some(Value::String(marker)) if marker == RATE_LIMIT_MARKER => ConditionResult::RateLimited,
        Some(Value::String(message)) => {
            ConditionResult::Failed(ConditionError::Upstream(message.clone()))
        }
        Some(other) => ConditionResult::Failed(ConditionError::Upstream(other.to_string())),
    }
}

/// Stateless fetcher for one resource kind.
#[derive(Clone)]
pub struct ConditionClient {
    source: Arc<dyn ConditionSource>,
    kind: ResourceKind,
    timeout: Duration,
}

impl ConditionClient {
    pub fn new(source: Arc<dyn ConditionSource>, kind: ResourceKind) -> Self {
        Self {
            source,
            kind,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub async fn fetch(&self, request: ConditionRequest) -> ConditionResult {
        let site = request.location.as_str();
        let source = DataSource::from(self.kind);
        logging::debug(
            source,
            Some(site),
            &format!("fetching {} (use_sample={})", self.kind, request.use_sample),
        );

        let outcome = tokio::time::timeout(
            self.timeout,
            self.source.fetch_resource(self.kind, request),
        )
        .await;

        let result = match outcome {
            Err(_) => ConditionResult::Failed(ConditionError::Timeout { after: self.timeout }),
            Ok(Err(err)) => ConditionResult::Failed(err),
            Ok(Ok(payload)) => interpret_payload(payload),
        };

        match &result {
            ConditionResult::Ok(_) => {}
            ConditionResult::RateLimited => logging::log_rate_limited(source, site, request.use_sample),
            ConditionResult::Failed(err) => {
                logging::log_fetch_failure(source, site, &format!("fetch {}", self.kind), err)
            }
        }
        result
    }
}

//! Rate-limit fallback flow for the single-location detail panels.
//!
//! A `SampleFallbackController` owns one panel's state: the selected
//! location, the last payload or error, and the sample-data prompt. Fetches
//! are split into a ticket (issued here), the network call (run by the
//! caller on a cloned `ConditionClient`), and `apply`, which drops the
//! result if a newer ticket has been issued since. That split is what lets
//! a location change supersede an in-flight fetch without locks or
//! cancellation of the request itself.
//!
//! ```text
//!  Idle ──RateLimited──▶ AwaitingChoice ──accept──▶ Resolved(sample) ──retry done──▶ Idle
//!                             │
//!                             └──decline──▶ Idle  (error: "data retrieval limit reached")
//! ```

use crate::client::ConditionClient;
use crate::logging::{self, DataSource};
use crate::model::{ConditionError, ConditionRequest, ConditionResult, Location};
use serde_json::Value;
use thiserror::Error;

/// Where the sample-data prompt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    Idle,
    /// Rate limit seen; waiting for the consumer's decision.
    AwaitingChoice,
    /// Decision taken, retry (if any) not yet applied.
    Resolved { use_sample: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FallbackError {
    #[error("no sample-data decision is pending")]
    NoPendingChoice,
}

/// Permission to apply one fetch result. Issued by the controller, consumed
/// by `apply`.
#[derive(Debug)]
#[must_use = "a ticket is only useful if its fetch result is applied"]
pub struct FetchTicket {
    generation: u64,
    pub request: ConditionRequest,
}

/// What `apply` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Payload stored.
    Loaded,
    /// Error stored.
    Failed,
    /// Rate limit seen; prompt is now showing.
    PromptShown,
    /// Result belonged to a superseded fetch and was ignored.
    Discarded,
}

pub struct SampleFallbackController {
    client: ConditionClient,
    location: Location,
    generation: u64,
    in_flight: bool,
    state: FallbackState,
    payload: Option<Value>,
    error: Option<ConditionError>,
}

impl SampleFallbackController {
    pub fn new(client: ConditionClient, location: Location) -> Self {
        Self {
            client,
            location,
            generation: 0,
            in_flight: false,
            state: FallbackState::Idle,
            payload: None,
            error: None,
        }
    }

    /// The client to run ticket requests on.
    pub fn client(&self) -> &ConditionClient {
        &self.client
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn state(&self) -> FallbackState {
        self.state
    }

    /// True only between a rate-limit detection and the consumer's choice.
    pub fn prompt_visible(&self) -> bool {
        self.state == FallbackState::AwaitingChoice
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&ConditionError> {
        self.error.as_ref()
    }

    fn issue(&mut self, request: ConditionRequest) -> FetchTicket {
        self.generation += 1;
        self.in_flight = true;
        FetchTicket {
            generation: self.generation,
            request,
        }
    }

    /// Switches to `location` and starts a fresh live fetch cycle. Any
    /// pending prompt is dropped and any in-flight result will be discarded.
    pub fn select_location(&mut self, location: Location) -> FetchTicket {
        if self.state != FallbackState::Idle {
            logging::debug(
                DataSource::from(self.client.kind()),
                Some(self.location.as_str()),
                "location changed; sample-data prompt aborted",
            );
        }
        self.location = location;
        self.state = FallbackState::Idle;
        self.payload = None;
        self.error = None;
        self.issue(ConditionRequest::live(location))
    }

    /// Starts a fresh live fetch cycle for the current location.
    pub fn refresh(&mut self) -> FetchTicket {
        self.select_location(self.location)
    }

    /// Accepts sample data. Returns the ticket for the single retry.
    pub fn choose_sample(&mut self) -> Result<FetchTicket, FallbackError> {
        if self.state != FallbackState::AwaitingChoice {
            return Err(FallbackError::NoPendingChoice);
        }
        self.state = FallbackState::Resolved { use_sample: true };
        Ok(self.issue(ConditionRequest::sample(self.location)))
    }

    /// Declines sample data. No further fetch is made.
    pub fn decline_sample(&mut self) -> Result<(), FallbackError> {
        if self.state != FallbackState::AwaitingChoice {
            return Err(FallbackError::NoPendingChoice);
        }
        self.error = Some(ConditionError::LimitReached);
        self.state = FallbackState::Idle;
        Ok(())
    }

    /// Applies a fetch result if its ticket is still current.
    pub fn apply(&mut self, ticket: FetchTicket, result: ConditionResult) -> ApplyOutcome {
        if ticket.generation != self.generation {
            logging::debug(
                DataSource::from(self.client.kind()),
                Some(ticket.request.location.as_str()),
                "discarding result of superseded fetch",
            );
            return ApplyOutcome::Discarded;
        }
        self.in_flight = false;

        if ticket.request.use_sample {
            // The retry ends the prompt cycle whatever it returned.
            self.state = FallbackState::Idle;
        }

        match result {
            ConditionResult::Ok(payload) => {
                self.payload = Some(payload);
                self.error = None;
                ApplyOutcome::Loaded
            }
            ConditionResult::RateLimited if !ticket.request.use_sample => {
                self.payload = None;
                self.error = None;
                self.state = FallbackState::AwaitingChoice;
                ApplyOutcome::PromptShown
            }
            ConditionResult::RateLimited => {
                self.payload = None;
                self.error = Some(ConditionError::LimitReached);
                ApplyOutcome::Failed
            }
            ConditionResult::Failed(err) => {
                self.payload = None;
                self.error = Some(err);
                ApplyOutcome::Failed
            }
        }
    }

    /// Runs a ticket to completion on this controller's client. Holding
    /// `&mut self` across the fetch means nothing can supersede it; use
    /// `client()` plus `apply` when the selection may change meanwhile.
    pub async fn run(&mut self, ticket: FetchTicket) -> ApplyOutcome {
        let client = self.client.clone();
        let result = client.fetch(ticket.request).await;
        self.apply(ticket, result)
    }

    /// Selects `location` and fetches it.
    pub async fn load(&mut self, location: Location) -> ApplyOutcome {
        let ticket = self.select_location(location);
        self.run(ticket).await
    }

    /// Accepts sample data and performs the retry.
    pub async fn accept_sample(&mut self) -> Result<ApplyOutcome, FallbackError> {
        let ticket = self.choose_sample()?;
        Ok(self.run(ticket).await)
    }
}

//! Query controller: owns the search text and the request lifecycle
//!
//! The controller never performs I/O itself. [`QueryController::submit`]
//! moves the state to `Loading` and hands back a [`PendingFetch`]; running
//! that fetch yields a [`Completion`] which is fed back through
//! [`QueryController::apply`]. Every submit bumps a generation token, and a
//! completion is only applied if it carries the latest token, so a slow
//! response for a superseded query can never overwrite a newer result.

use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::{Query, Report, RequestState};
use crate::ports::DemographicsSource;

/// Default bound on a single fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the raw query text and the [`RequestState`] of one search box
pub struct QueryController {
    source: Arc<dyn DemographicsSource>,
    timeout: Duration,
    query: String,
    state: RequestState,
    generation: u64,
}

/// A submitted search whose request has not been issued yet
#[must_use = "a submitted search issues no request until it is run"]
pub struct PendingFetch {
    generation: u64,
    query: Query,
    source: Arc<dyn DemographicsSource>,
    timeout: Duration,
}

/// Result of one fetch, tagged with the generation that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    generation: u64,
    query: Query,
    outcome: Result<Report, FetchError>,
}

/// Whether [`QueryController::apply`] changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The completion belonged to the latest submit and is now the state
    Current,
    /// The completion was superseded by a later submit and was dropped
    Stale,
}

impl QueryController {
    /// Create an idle controller backed by the given source
    pub fn new(source: Arc<dyn DemographicsSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
            query: String::new(),
            state: RequestState::Idle,
            generation: 0,
        }
    }

    /// Bound every fetch by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the held query text. Never touches the request state.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Token of the latest accepted submit (0 before the first one)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a search for the held query.
    ///
    /// Returns `None` without any state change when the query is blank.
    /// Otherwise the state becomes `Loading`, any previous report or error is
    /// dropped, and the returned fetch supersedes whatever was in flight.
    pub fn submit(&mut self) -> Option<PendingFetch> {
        let Some(query) = Query::parse(&self.query) else {
            tracing::debug!("Ignoring submit of blank query");
            return None;
        };

        if self.state.is_loading() {
            tracing::debug!(
                superseded = self.generation,
                "Superseding in-flight search"
            );
        }

        self.generation += 1;
        self.state = RequestState::Loading;

        tracing::debug!(generation = self.generation, query = %query, "Submitting search");

        Some(PendingFetch {
            generation: self.generation,
            query,
            source: Arc::clone(&self.source),
            timeout: self.timeout,
        })
    }

    /// Apply a finished fetch if it belongs to the latest submit
    pub fn apply(&mut self, completion: Completion) -> Applied {
        if completion.generation != self.generation || !self.state.is_loading() {
            tracing::debug!(
                generation = completion.generation,
                latest = self.generation,
                query = %completion.query,
                "Discarding stale response"
            );
            return Applied::Stale;
        }

        self.state = match completion.outcome {
            Ok(report) => {
                tracing::debug!(
                    generation = completion.generation,
                    municipality = %report.municipality,
                    "Search succeeded"
                );
                RequestState::Success(report)
            }
            Err(err) => {
                tracing::warn!(
                    generation = completion.generation,
                    query = %completion.query,
                    error = %err,
                    "Search failed"
                );
                RequestState::Failure(err.to_string())
            }
        };

        Applied::Current
    }

    /// Submit, wait for the response and apply it.
    ///
    /// A blank query leaves the state untouched.
    pub async fn search(&mut self) -> &RequestState {
        if let Some(pending) = self.submit() {
            let completion = pending.run().await;
            self.apply(completion);
        }
        &self.state
    }
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Issue the single outbound request, bounded by the controller's timeout
    pub async fn run(self) -> Completion {
        let outcome = match tokio::time::timeout(self.timeout, self.source.fetch(&self.query)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        Completion { generation: self.generation, query: self.query, outcome }
    }
}

impl Completion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn outcome(&self) -> &Result<Report, FetchError> {
        &self.outcome
    }
}

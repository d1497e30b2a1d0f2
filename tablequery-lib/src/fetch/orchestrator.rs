//! Dispatching requests and arbitrating their responses.

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use log::debug;
use log::warn;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::error::Error;
use crate::model::ResultSet;
use crate::provider::DataProvider;
use crate::provider::ProviderResponse;
use crate::query::Intent;
use crate::query::QueryRequest;
use crate::query::QuerySnapshot;

use super::Generation;
use super::LoadingFlags;
use super::reconcile;

/// What caused a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A single column's filter box changed; that column shows a spinner.
    ColumnFilter(String),
    /// Anything else (keyword search, sort, page change, refresh).
    Other,
}

impl Trigger {
    /// Derives the trigger of an intent.
    pub fn from_intent(intent: &Intent) -> Self {
        match intent.filter_column() {
            Some(column) => Self::ColumnFilter(column.to_string()),
            None => Self::Other,
        }
    }

    /// The column owning the in-column spinner, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnFilter(column) => Some(column),
            Self::Other => None,
        }
    }
}

/// Result of a dispatch that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The response was current and replaced the result set.
    Applied {
        /// Generation of the request.
        generation: Generation,
        /// Page change to apply before the next render, if the total shrank.
        corrective: Option<Intent>,
    },
    /// A newer request was dispatched meanwhile; the response was dropped.
    Stale {
        /// Generation of the dropped request.
        generation: Generation,
        /// Generation that superseded it.
        current: Generation,
    },
}

impl DispatchOutcome {
    /// Returns `true` if the response was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Returns `true` if the response was dropped as stale.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// A dispatch that has taken its generation but not been sent yet.
///
/// Dropping a ticket without completing it leaves its loading flags raised
/// until a newer dispatch completes.
#[derive(Debug)]
pub struct Ticket {
    generation: Generation,
    column: Option<String>,
    token: CancellationToken,
}

impl Ticket {
    /// Generation the dispatch will carry.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

struct OrchestratorState {
    generation: Generation,
    loading: LoadingFlags,
    result_set: ResultSet,
    latest_token: Option<CancellationToken>,
}

/// Issues requests to a provider and keeps the displayed result consistent.
///
/// Requests may overlap. Each dispatch takes the next [`Generation`]; when it
/// completes, its response is applied only if no newer dispatch started in
/// the meantime. Superseded responses are dropped without touching any
/// state, so a slow old request can never overwrite a newer result.
///
/// Failed requests leave the last good result in place.
pub struct FetchOrchestrator<P> {
    provider: P,
    state: Mutex<OrchestratorState>,
    timeout: Option<Duration>,
    cancel_superseded: bool,
}

impl<P: DataProvider> FetchOrchestrator<P> {
    /// Creates an orchestrator with no timeout and no cancellation.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: Mutex::new(OrchestratorState {
                generation: Generation::ZERO,
                loading: LoadingFlags::default(),
                result_set: ResultSet::empty(),
                latest_token: None,
            }),
            timeout: None,
            cancel_superseded: false,
        }
    }

    /// Fails requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stops waiting for a request as soon as a newer one is dispatched.
    ///
    /// The transport call is dropped, which is best effort: the server may
    /// still process it.
    pub fn with_cancel_superseded(mut self, enabled: bool) -> Self {
        self.cancel_superseded = enabled;
        self
    }

    /// Returns the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the last accepted result set.
    pub fn result_set(&self) -> ResultSet {
        self.lock().result_set.clone()
    }

    /// Returns the current loading flags.
    pub fn loading(&self) -> LoadingFlags {
        self.lock().loading.clone()
    }

    /// Returns the result set and loading flags as of the same instant.
    pub(crate) fn observe(&self) -> (ResultSet, LoadingFlags) {
        let state = self.lock();
        (state.result_set.clone(), state.loading.clone())
    }

    /// Returns the highest generation dispatched so far.
    pub fn generation(&self) -> Generation {
        self.lock().generation
    }

    /// Dispatches `request`, compiled from `snapshot`, and waits for it.
    ///
    /// Returns [`DispatchOutcome::Stale`] if a newer dispatch started before
    /// this one finished (whether it succeeded or failed), and
    /// [`Error::Fetch`] if the current request failed. In every case the
    /// loading flags this dispatch set are released.
    pub async fn dispatch(
        &self,
        request: &QueryRequest,
        snapshot: &QuerySnapshot,
        trigger: &Trigger,
    ) -> Result<DispatchOutcome, Error> {
        let ticket = self.begin(trigger);
        self.complete(ticket, request, snapshot).await
    }

    /// Takes the next generation and raises the loading flags for it.
    ///
    /// This is the first half of [`dispatch`](Self::dispatch). Callers that
    /// must order generations with their own state take the ticket while
    /// holding their lock and [`complete`](Self::complete) it afterwards.
    pub fn begin(&self, trigger: &Trigger) -> Ticket {
        let column = trigger.column().map(str::to_string);
        let token = CancellationToken::new();

        let mut state = self.lock();
        state.generation = state.generation.next();
        let generation = state.generation;
        state.loading.begin(generation, column.as_deref());
        if let Some(previous) = state.latest_token.replace(token.clone())
            && self.cancel_superseded
        {
            previous.cancel();
        }

        Ticket {
            generation,
            column,
            token,
        }
    }

    /// Sends the request stamped by `ticket` and arbitrates its response.
    pub async fn complete(
        &self,
        ticket: Ticket,
        request: &QueryRequest,
        snapshot: &QuerySnapshot,
    ) -> Result<DispatchOutcome, Error> {
        let Ticket {
            generation,
            column,
            token,
        } = ticket;
        let column = column.as_deref();

        debug!(
            "dispatch {} page {} size {} filters [{}] order [{}]",
            generation,
            request.page_number(),
            request.page_size(),
            request.column_filters(),
            request.order_by()
        );

        let result = tokio::select! {
            _ = token.cancelled() => None,
            result = self.fetch(request) => Some(result),
        };

        let mut state = self.lock();
        let current = state.generation;
        state.loading.finish(generation, current, column);
        if generation == current {
            state.latest_token = None;
        }

        let stale = DispatchOutcome::Stale {
            generation,
            current,
        };

        let Some(result) = result else {
            debug!("request {} cancelled by {}", generation, current);
            return Ok(stale);
        };

        if generation != current {
            match &result {
                Ok(_) => debug!("discarding stale response {} (current {})", generation, current),
                Err(e) => debug!("discarding stale failure {} (current {}): {}", generation, current, e),
            }
            return Ok(stale);
        }

        match result {
            Ok(response) => {
                let reconciliation = reconcile(response, snapshot);
                debug!(
                    "applied {}: {} records, {} total",
                    generation,
                    reconciliation.result_set.records().len(),
                    reconciliation.result_set.total_count()
                );
                state.result_set = reconciliation.result_set;
                Ok(DispatchOutcome::Applied {
                    generation,
                    corrective: reconciliation.corrective,
                })
            }
            Err(e) => {
                warn!("request {} failed, keeping previous result: {}", generation, e);
                Err(Error::Fetch(e))
            }
        }
    }

    async fn fetch(&self, request: &QueryRequest) -> Result<ProviderResponse, ApiError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.provider.fetch(request))
                .await
                .unwrap_or_else(|_| Err(ApiError::Timeout(timeout))),
            None => self.provider.fetch(request).await,
        }
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Main TableController

use std::sync::Mutex;
use std::sync::MutexGuard;

use log::info;

use crate::config::ControllerConfig;
use crate::error::Error;
use crate::fetch::DispatchOutcome;
use crate::fetch::FetchOrchestrator;
use crate::fetch::LoadingFlags;
use crate::fetch::Ticket;
use crate::fetch::Trigger;
use crate::model::Record;
use crate::model::ResultSet;
use crate::provider::DataProvider;
use crate::query;
use crate::query::Direction;
use crate::query::Intent;
use crate::query::MatchMode;
use crate::query::QueryRequest;
use crate::query::QuerySnapshot;
use crate::query::QueryStore;

/// Drives a remote-backed table.
///
/// Each intent is applied to the current [`QuerySnapshot`], producing a new
/// one; the new snapshot is compiled into a [`QueryRequest`] and dispatched
/// to the provider, and the response becomes the displayed [`ResultSet`].
/// Intents are applied one at a time; their fetches may overlap and are
/// arbitrated by the [`FetchOrchestrator`].
///
/// # Example
///
/// ```ignore
/// use tablequery_lib::TableController;
/// use tablequery_lib::config::ControllerConfig;
/// use tablequery_lib::provider::HttpProvider;
///
/// let provider = HttpProvider::builder()
///     .url("https://localhost:7270/api/Student/GetPaged")
///     .build()?;
/// let controller = TableController::new(provider, ControllerConfig::default());
///
/// controller.refresh().await?;
/// controller.set_global_search("ada").await?;
///
/// let view = controller.view();
/// for record in view.visible_records() {
///     println!("{:?}", record.name);
/// }
/// ```
pub struct TableController<P> {
    store: QueryStore,
    snapshot: Mutex<QuerySnapshot>,
    orchestrator: FetchOrchestrator<P>,
}

impl<P: DataProvider> TableController<P> {
    /// Creates a controller in its initial state. Nothing is fetched until
    /// the first intent or [`refresh`](Self::refresh).
    pub fn new(provider: P, config: ControllerConfig) -> Self {
        let store = QueryStore::new(
            config.columns,
            config.sort_policy,
            config.global_filter_policy,
        );
        let snapshot = store.initial(config.page_size);
        let orchestrator = FetchOrchestrator::new(provider)
            .with_timeout(config.request_timeout)
            .with_cancel_superseded(config.cancel_superseded);

        Self {
            store,
            snapshot: Mutex::new(snapshot),
            orchestrator,
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.lock().clone()
    }

    /// Returns everything the table needs to render.
    pub fn view(&self) -> ViewState {
        let snapshot = self.lock();
        let (result_set, loading) = self.orchestrator.observe();
        ViewState {
            snapshot: snapshot.clone(),
            result_set,
            loading,
        }
    }

    /// Returns the orchestrator.
    pub fn orchestrator(&self) -> &FetchOrchestrator<P> {
        &self.orchestrator
    }

    /// Applies `intent` and fetches the resulting page.
    ///
    /// Validation errors leave the snapshot unchanged. A fetch failure
    /// leaves the new snapshot in place and the previous result displayed,
    /// so the user can simply retry. If the response shows the current page
    /// is past the end, the controller moves to the first page and fetches
    /// again before returning.
    pub async fn submit(&self, intent: Intent) -> Result<DispatchOutcome, Error> {
        let trigger = Trigger::from_intent(&intent);
        let pending = self.apply(intent, &trigger)?;
        self.run(pending).await
    }

    /// Fetches the current snapshot again.
    pub async fn refresh(&self) -> Result<DispatchOutcome, Error> {
        let pending = {
            let current = self.lock();
            let request = query::build(&current)?;
            Pending {
                snapshot: current.clone(),
                request,
                ticket: self.orchestrator.begin(&Trigger::Other),
            }
        };
        self.run(pending).await
    }

    /// Keyword search box changed.
    pub async fn set_global_search(&self, term: impl Into<String>) -> Result<DispatchOutcome, Error> {
        self.submit(Intent::set_global_search(term)).await
    }

    /// A column filter changed; `None` clears it.
    pub async fn set_column_filter(
        &self,
        column: impl Into<String>,
        value: Option<String>,
        match_mode: Option<MatchMode>,
    ) -> Result<DispatchOutcome, Error> {
        self.submit(Intent::set_column_filter(column, value, match_mode))
            .await
    }

    /// A column header was clicked (`None`) or a direction was picked.
    pub async fn set_sort(
        &self,
        field: impl Into<String>,
        direction: Option<Direction>,
    ) -> Result<DispatchOutcome, Error> {
        self.submit(Intent::set_sort(field, direction)).await
    }

    /// The paginator moved.
    pub async fn set_page(&self, offset: usize, page_size: usize) -> Result<DispatchOutcome, Error> {
        self.submit(Intent::set_page(offset, page_size)).await
    }

    async fn run(&self, mut pending: Pending) -> Result<DispatchOutcome, Error> {
        loop {
            let outcome = self
                .orchestrator
                .complete(pending.ticket, &pending.request, &pending.snapshot)
                .await?;

            match outcome {
                DispatchOutcome::Applied {
                    corrective: Some(intent),
                    ..
                } => {
                    info!(
                        "offset {} is past the end of the result, returning to the first page",
                        pending.snapshot.pagination().offset()
                    );
                    pending = self.apply(intent, &Trigger::Other)?;
                }
                outcome => return Ok(outcome),
            }
        }
    }

    /// Replaces the snapshot, compiles its request and takes a generation,
    /// all under the snapshot lock, so generations follow snapshot order.
    fn apply(&self, intent: Intent, trigger: &Trigger) -> Result<Pending, Error> {
        let mut current = self.lock();
        let next = self.store.apply(&current, intent)?;
        let request = query::build(&next)?;
        let ticket = self.orchestrator.begin(trigger);
        *current = next.clone();
        Ok(Pending {
            snapshot: next,
            request,
            ticket,
        })
    }

    fn lock(&self) -> MutexGuard<'_, QuerySnapshot> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Pending {
    snapshot: QuerySnapshot,
    request: QueryRequest,
    ticket: Ticket,
}

/// What the table renders from.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Current query state.
    pub snapshot: QuerySnapshot,
    /// Last accepted result.
    pub result_set: ResultSet,
    /// Busy indicators.
    pub loading: LoadingFlags,
}

impl ViewState {
    /// The rows of the current page.
    pub fn visible_records(&self) -> &[Record] {
        self.result_set.visible(self.snapshot.pagination())
    }

    /// Total matching records, for the paginator.
    pub fn total_records(&self) -> usize {
        self.result_set.total_count()
    }

    /// Number of pages the paginator spans.
    pub fn page_count(&self) -> usize {
        self.snapshot.pagination().page_count(self.total_records())
    }

    /// 1-based number of the current page.
    pub fn page_number(&self) -> usize {
        self.snapshot.pagination().page_number().unwrap_or(1)
    }

    /// Returns `true` while the table-wide spinner should show.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Returns `true` while the spinner in `column`'s filter box should show.
    pub fn is_column_loading(&self, column: &str) -> bool {
        self.loading.is_column_loading(column)
    }
}

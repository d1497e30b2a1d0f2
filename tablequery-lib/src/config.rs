//! Controller configuration

use std::time::Duration;

use crate::model::ColumnSet;
use crate::query::GlobalFilterPolicy;
use crate::query::SortPolicy;

/// Configuration of a [`TableController`](crate::TableController).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tablequery_lib::config::ControllerConfig;
/// use tablequery_lib::query::{GlobalFilterPolicy, SortPolicy};
///
/// let config = ControllerConfig::default()
///     .with_page_size(20)
///     .with_sort_policy(SortPolicy::Single)
///     .with_global_filter_policy(GlobalFilterPolicy::Independent)
///     .with_request_timeout(Some(Duration::from_secs(5)));
///
/// assert_eq!(config.page_size, 20);
/// ```
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Columns of the table, in filter priority order.
    ///
    /// Default: name, address, phoneNo
    pub columns: ColumnSet,

    /// Rows per page before the user picks another size.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Header click behaviour.
    ///
    /// Default: [`SortPolicy::Multiple`]
    pub sort_policy: SortPolicy,

    /// Keyword search behaviour.
    ///
    /// Default: [`GlobalFilterPolicy::PropagateToColumns`]
    pub global_filter_policy: GlobalFilterPolicy,

    /// Time after which an unanswered request fails. `None` waits forever.
    ///
    /// Default: 30 seconds
    pub request_timeout: Option<Duration>,

    /// Stop waiting for a request once a newer one is dispatched.
    ///
    /// Default: false
    pub cancel_superseded: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            columns: ColumnSet::default(),
            page_size: 10,
            sort_policy: SortPolicy::default(),
            global_filter_policy: GlobalFilterPolicy::default(),
            request_timeout: Some(Duration::from_secs(30)),
            cancel_superseded: false,
        }
    }
}

impl ControllerConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the columns.
    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the sort policy.
    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }

    /// Sets the keyword search policy.
    pub fn with_global_filter_policy(mut self, policy: GlobalFilterPolicy) -> Self {
        self.global_filter_policy = policy;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables or disables cancelling superseded requests.
    pub fn with_cancel_superseded(mut self, enabled: bool) -> Self {
        self.cancel_superseded = enabled;
        self
    }
}

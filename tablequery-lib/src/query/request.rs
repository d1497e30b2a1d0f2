//! Canonical request compilation.

use serde::Serialize;

use crate::error::Error;

use super::GlobalFilterPolicy;
use super::QuerySnapshot;

/// The request sent to the data provider.
///
/// Only [`build`] creates requests, so a request always reflects exactly one
/// snapshot. Empty strings stand for "not set".
///
/// Serializes to the structured body the endpoint expects:
///
/// ```json
/// {
///   "pageNumber": 1,
///   "pageSize": 10,
///   "globalfilter": "",
///   "orderBy": "name,asc",
///   "columnFilters": "name",
///   "searchItem": "ada",
///   "matchMode": "contains"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    page_number: usize,
    page_size: usize,
    #[serde(rename = "globalfilter")]
    global_filter: String,
    order_by: String,
    column_filters: String,
    search_item: String,
    match_mode: String,
}

impl QueryRequest {
    /// 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The keyword search term.
    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    /// `field,direction` pairs joined by commas.
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    /// Names of the columns with an active filter, joined by commas.
    pub fn column_filters(&self) -> &str {
        &self.column_filters
    }

    /// The value being searched for.
    pub fn search_item(&self) -> &str {
        &self.search_item
    }

    /// Wire name of the match mode applied to the search item.
    pub fn match_mode(&self) -> &str {
        &self.match_mode
    }

    /// The `page` / `pageSize` pairs of the query-string request style.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

/// Compiles a snapshot into its canonical request.
///
/// Pure and deterministic: equal snapshots compile to equal requests. Column
/// filters are listed in column priority order and the search item is taken
/// from the first active one. Under [`GlobalFilterPolicy::Independent`] the
/// keyword term is used as search item when no column filter is active.
///
/// Fails with [`Error::InvalidPagination`] when the page arithmetic is not
/// exact.
///
/// # Example
///
/// ```
/// use tablequery_lib::model::ColumnSet;
/// use tablequery_lib::query::{self, GlobalFilterPolicy, QuerySnapshot};
///
/// let snapshot = QuerySnapshot::new(&ColumnSet::default(), 10, GlobalFilterPolicy::default());
/// let request = query::build(&snapshot).unwrap();
///
/// assert_eq!(request.page_number(), 1);
/// assert_eq!(request.order_by(), "");
/// assert_eq!(request.column_filters(), "");
/// ```
pub fn build(snapshot: &QuerySnapshot) -> Result<QueryRequest, Error> {
    let pagination = snapshot.pagination();
    let page_number = pagination.page_number()?;

    let active: Vec<_> = snapshot.active_filters().collect();

    let column_filters = active
        .iter()
        .map(|f| f.column.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let (search_item, match_mode) = match active.first() {
        Some(first) => (
            first.entry.value().unwrap_or_default().to_string(),
            first.entry.match_mode().as_str().to_string(),
        ),
        None if snapshot.global_policy() == GlobalFilterPolicy::Independent
            && !snapshot.global_search_term().is_empty() =>
        {
            (
                snapshot.global_search_term().to_string(),
                GlobalFilterPolicy::MATCH_MODE.as_str().to_string(),
            )
        }
        None => (String::new(), String::new()),
    };

    Ok(QueryRequest {
        page_number,
        page_size: pagination.page_size(),
        global_filter: snapshot.global_search_term().to_string(),
        order_by: snapshot.sort().to_wire(),
        column_filters,
        search_item,
        match_mode,
    })
}

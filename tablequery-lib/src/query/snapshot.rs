//! Query snapshot and the intents that replace it.

use crate::error::Error;
use crate::model::ColumnSet;

use super::Direction;
use super::FilterEntry;
use super::MatchMode;
use super::Pagination;
use super::SortPolicy;
use super::SortSpec;

/// How the keyword search box interacts with the column filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlobalFilterPolicy {
    /// The term is copied into every filterable column as a `contains`
    /// filter, overwriting whatever those columns held.
    #[default]
    PropagateToColumns,
    /// The term is kept apart from the column filters and sent as its own
    /// field; it only becomes the search item when no column filter is set.
    Independent,
}

impl GlobalFilterPolicy {
    /// Match mode given to the global term.
    pub const MATCH_MODE: MatchMode = MatchMode::Contains;

    /// Parses `propagate` / `independent`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" | "propagate-to-columns" => Some(Self::PropagateToColumns),
            "independent" => Some(Self::Independent),
            _ => None,
        }
    }
}

/// The filter of one named column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnFilter {
    /// Column field name.
    pub column: String,
    /// Current filter.
    pub entry: FilterEntry,
}

/// Immutable point-in-time value of all query state.
///
/// Snapshots are never edited; [`QueryStore::apply`] produces a new one for
/// each intent. Column filters are kept in column priority order so that two
/// snapshots with the same logical state compile to the same request no
/// matter in which order the filters were typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySnapshot {
    filters: Vec<ColumnFilter>,
    sort: SortSpec,
    pagination: Pagination,
    global_search: Option<String>,
    global_policy: GlobalFilterPolicy,
}

impl QuerySnapshot {
    /// Creates the initial snapshot: every filter inactive, unsorted, first
    /// page, no keyword.
    pub fn new(columns: &ColumnSet, page_size: usize, global_policy: GlobalFilterPolicy) -> Self {
        Self {
            filters: columns
                .filterable()
                .map(|c| ColumnFilter {
                    column: c.field().to_string(),
                    entry: FilterEntry::inactive(),
                })
                .collect(),
            sort: SortSpec::new(),
            pagination: Pagination::first(page_size),
            global_search: None,
            global_policy,
        }
    }

    /// Returns a copy with the given pagination, without validating it.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Returns a copy with the given sort spec.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// All column filters in priority order.
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// The filter of a column, if the column is filterable.
    pub fn filter(&self, column: &str) -> Option<&FilterEntry> {
        self.filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| &f.entry)
    }

    /// Active column filters in priority order.
    pub fn active_filters(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter().filter(|f| f.entry.is_active())
    }

    /// The sort spec.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The pagination state.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The keyword search term, empty when none.
    pub fn global_search_term(&self) -> &str {
        self.global_search.as_deref().unwrap_or("")
    }

    /// The keyword policy this snapshot was built under.
    pub fn global_policy(&self) -> GlobalFilterPolicy {
        self.global_policy
    }
}

/// A discrete user or system action producing a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Keyword search box changed.
    SetGlobalSearch {
        /// New term; empty clears the search.
        term: String,
    },
    /// A column filter box changed.
    SetColumnFilter {
        /// Column field name.
        column: String,
        /// New value; `None` (or empty) deactivates the filter.
        value: Option<String>,
        /// Match mode; `None` deactivates the filter.
        match_mode: Option<MatchMode>,
    },
    /// A column header was clicked (`direction: None`) or a direction was
    /// picked explicitly.
    SetSort {
        /// Column field name.
        field: String,
        /// Explicit direction, or `None` to toggle.
        direction: Option<Direction>,
    },
    /// The paginator moved.
    SetPage {
        /// First row of the page.
        offset: usize,
        /// Rows per page.
        page_size: usize,
    },
}

impl Intent {
    /// Keyword search intent.
    pub fn set_global_search(term: impl Into<String>) -> Self {
        Self::SetGlobalSearch { term: term.into() }
    }

    /// Column filter intent.
    pub fn set_column_filter(
        column: impl Into<String>,
        value: Option<String>,
        match_mode: Option<MatchMode>,
    ) -> Self {
        Self::SetColumnFilter {
            column: column.into(),
            value,
            match_mode,
        }
    }

    /// Sort intent.
    pub fn set_sort(field: impl Into<String>, direction: Option<Direction>) -> Self {
        Self::SetSort {
            field: field.into(),
            direction,
        }
    }

    /// Page change intent.
    pub fn set_page(offset: usize, page_size: usize) -> Self {
        Self::SetPage { offset, page_size }
    }

    /// The column whose filter box triggered this intent, if any.
    pub fn filter_column(&self) -> Option<&str> {
        match self {
            Self::SetColumnFilter { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Applies intents to snapshots under a fixed column set and policies.
///
/// # Example
///
/// ```
/// use tablequery_lib::model::ColumnSet;
/// use tablequery_lib::query::{GlobalFilterPolicy, Intent, QueryStore, SortPolicy};
///
/// let store = QueryStore::new(
///     ColumnSet::default(),
///     SortPolicy::Multiple,
///     GlobalFilterPolicy::PropagateToColumns,
/// );
/// let initial = store.initial(10);
///
/// let next = store.apply(&initial, Intent::set_sort("name", None)).unwrap();
/// assert_eq!(next.sort().to_wire(), "name,asc");
/// assert!(initial.sort().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct QueryStore {
    columns: ColumnSet,
    sort_policy: SortPolicy,
    global_policy: GlobalFilterPolicy,
}

impl QueryStore {
    /// Creates a store.
    pub fn new(columns: ColumnSet, sort_policy: SortPolicy, global_policy: GlobalFilterPolicy) -> Self {
        Self {
            columns,
            sort_policy,
            global_policy,
        }
    }

    /// The column set intents are validated against.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// The initial snapshot for a page size.
    pub fn initial(&self, page_size: usize) -> QuerySnapshot {
        QuerySnapshot::new(&self.columns, page_size, self.global_policy)
    }

    /// Produces the snapshot that follows `snapshot` after `intent`.
    ///
    /// Filter changes return to the first page. Fails with
    /// [`Error::InvalidColumn`] for unknown columns (or columns that do not
    /// support the operation) and [`Error::InvalidPagination`] for inexact
    /// page changes; `snapshot` is never modified.
    pub fn apply(&self, snapshot: &QuerySnapshot, intent: Intent) -> Result<QuerySnapshot, Error> {
        let mut next = snapshot.clone();

        match intent {
            Intent::SetGlobalSearch { term } => {
                let term = Some(term).filter(|t| !t.is_empty());
                if self.global_policy == GlobalFilterPolicy::PropagateToColumns {
                    for filter in &mut next.filters {
                        filter.entry =
                            FilterEntry::new(term.clone(), GlobalFilterPolicy::MATCH_MODE);
                    }
                }
                next.global_search = term;
                next.pagination = next.pagination.reset();
            }
            Intent::SetColumnFilter {
                column,
                value,
                match_mode,
            } => {
                let filter = next
                    .filters
                    .iter_mut()
                    .find(|f| f.column == column)
                    .ok_or_else(|| Error::invalid_column(&column))?;
                filter.entry = FilterEntry::new(value, match_mode.unwrap_or(MatchMode::None));
                next.pagination = next.pagination.reset();
            }
            Intent::SetSort { field, direction } => {
                if !self.columns.is_sortable(&field) {
                    return Err(Error::invalid_column(field));
                }
                next.sort = match direction {
                    Some(direction) => self.sort_policy.set(&next.sort, &field, direction),
                    None => self.sort_policy.toggle(&next.sort, &field),
                };
            }
            Intent::SetPage { offset, page_size } => {
                next.pagination = Pagination::checked(offset, page_size)?;
            }
        }

        Ok(next)
    }
}

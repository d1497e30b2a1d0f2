//! Evaluating a snapshot over records held in memory.
//!
//! Used when the provider returns the whole table instead of a page: the
//! filters and sort the server would have applied are applied here.

use crate::model::Record;

use super::GlobalFilterPolicy;
use super::QuerySnapshot;

/// Field searched by the keyword box in addition to the filterable columns.
const ID_FIELD: &str = "id";

impl QuerySnapshot {
    /// Returns `true` if `record` passes every active column filter and, under
    /// [`GlobalFilterPolicy::Independent`], the keyword search.
    ///
    /// The keyword matches when any filterable column or the record id
    /// contains it. Under [`GlobalFilterPolicy::PropagateToColumns`] the
    /// keyword already lives in the column filters and is not applied twice.
    pub fn matches(&self, record: &Record) -> bool {
        let columns_pass = self
            .active_filters()
            .all(|f| f.entry.matches(record.field(&f.column).as_deref()));
        if !columns_pass {
            return false;
        }

        let term = self.global_search_term();
        if self.global_policy() == GlobalFilterPolicy::PropagateToColumns || term.is_empty() {
            return true;
        }

        std::iter::once(ID_FIELD)
            .chain(self.filters().iter().map(|f| f.column.as_str()))
            .any(|field| GlobalFilterPolicy::MATCH_MODE.matches(record.field(field).as_deref(), term))
    }
}

/// Filters and sorts `records` the way the snapshot's request asks the server
/// to. Sorting is stable, so rows tied on every sort key keep their order.
///
/// # Example
///
/// ```
/// use tablequery_lib::model::{ColumnSet, Record};
/// use tablequery_lib::query::{self, GlobalFilterPolicy, Intent, QueryStore, SortPolicy};
///
/// let store = QueryStore::new(ColumnSet::default(), SortPolicy::Multiple, GlobalFilterPolicy::default());
/// let snapshot = store
///     .apply(&store.initial(10), Intent::set_sort("name", None))
///     .unwrap();
///
/// let records = vec![
///     Record::new(1_i64, "Grace", "a", "1"),
///     Record::new(2_i64, "Ada", "b", "2"),
/// ];
/// let sorted = query::evaluate(records, &snapshot);
/// assert_eq!(sorted[0].name.as_deref(), Some("Ada"));
/// ```
pub fn evaluate(records: Vec<Record>, snapshot: &QuerySnapshot) -> Vec<Record> {
    let mut records: Vec<Record> = records.into_iter().filter(|r| snapshot.matches(r)).collect();
    if !snapshot.sort().is_empty() {
        records.sort_by(|a, b| snapshot.sort().compare(a, b));
    }
    records
}

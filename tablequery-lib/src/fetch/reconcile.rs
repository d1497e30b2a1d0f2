//! Folding a provider response into view state.

use crate::model::ResultSet;
use crate::provider::ProviderResponse;
use crate::query;
use crate::query::Intent;
use crate::query::QuerySnapshot;

/// Outcome of reconciling a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The new result set.
    pub result_set: ResultSet,
    /// A page change to apply before the next render, when the current page
    /// starts beyond the new total.
    pub corrective: Option<Intent>,
}

/// Builds the result set for `response`, fetched for `snapshot`.
///
/// A paged response is taken verbatim; the provider's filtering and ordering
/// are authoritative. An unpaginated response holds the whole table, so the
/// snapshot's filters and sort are applied to it with [`query::evaluate`] and
/// the total is the number of rows left.
///
/// If the total shrank below the snapshot's offset, a `SetPage(0, page_size)`
/// intent is returned as `corrective`.
pub fn reconcile(response: ProviderResponse, snapshot: &QuerySnapshot) -> Reconciliation {
    let result_set = match response {
        ProviderResponse::Paged {
            students,
            total_records,
        } => ResultSet::paged(students, total_records),
        ProviderResponse::Unpaginated(records) => {
            ResultSet::unpaginated(query::evaluate(records, snapshot))
        }
    };

    let pagination = snapshot.pagination();
    let corrective = (result_set.total_count() < pagination.offset())
        .then(|| Intent::set_page(0, pagination.page_size()));

    Reconciliation {
        result_set,
        corrective,
    }
}

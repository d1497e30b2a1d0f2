//! The records currently shown by the table

use crate::query::Pagination;

use super::Record;

/// Records and total count of the last accepted response.
///
/// A result set is always replaced as a whole; it is never patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    records: Vec<Record>,
    total_count: usize,
    server_paged: bool,
}

impl ResultSet {
    /// A page of a server-paginated result.
    pub fn paged(records: Vec<Record>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
            server_paged: true,
        }
    }

    /// Every matching record, filtered and sorted locally; the total is the
    /// record count.
    pub fn unpaginated(records: Vec<Record>) -> Self {
        Self {
            total_count: records.len(),
            records,
            server_paged: false,
        }
    }

    /// An empty result, shown before the first response arrives.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All records as returned by the provider.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Total number of matching records on the server.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns `true` if the provider paginated the result itself.
    pub fn is_server_paged(&self) -> bool {
        self.server_paged
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The rows to display for `pagination`.
    ///
    /// A server-paged result already is the requested page, so at most
    /// `page_size` of its rows are shown. An unpaginated result holds every
    /// matching row and is sliced at the offset.
    pub fn visible(&self, pagination: Pagination) -> &[Record] {
        let start = if self.server_paged {
            0
        } else {
            pagination.offset().min(self.records.len())
        };
        let end = start
            .saturating_add(pagination.page_size())
            .min(self.records.len());
        &self.records[start..end]
    }
}

//! Error types

mod api;

pub use api::*;

/// Errors returned by the query controller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An intent referenced a column the table does not define, or a column
    /// that does not support the requested operation.
    #[error("Invalid column: {column}")]
    InvalidColumn {
        /// The offending column name.
        column: String,
    },

    /// Page arithmetic is not exact (zero page size, or an offset that is
    /// not a multiple of the page size).
    #[error("Invalid pagination: offset {offset} with page size {page_size}")]
    InvalidPagination {
        /// The requested offset.
        offset: usize,
        /// The requested page size.
        page_size: usize,
    },

    /// The remote provider failed to deliver a page.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ApiError),
}

impl Error {
    /// Creates a new invalid column error.
    pub fn invalid_column(column: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
        }
    }

    /// Returns `true` if this error is a runtime fetch failure rather than a
    /// programming error.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

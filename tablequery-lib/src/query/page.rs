//! Pagination state.

use crate::error::Error;

/// Offset-based pagination of a table.
///
/// `offset` is the index of the first row on the page. For the page number to
/// be meaningful the offset must be a multiple of the page size; every page
/// change intent is validated against that, and [`Pagination::page_number`]
/// checks it again.
///
/// # Example
///
/// ```
/// use tablequery_lib::query::Pagination;
///
/// let page = Pagination::for_page(3, 10).unwrap();
/// assert_eq!(page.offset(), 20);
/// assert_eq!(page.page_number().unwrap(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    offset: usize,
    page_size: usize,
}

impl Pagination {
    /// Creates pagination state without validating it.
    pub fn new(offset: usize, page_size: usize) -> Self {
        Self { offset, page_size }
    }

    /// Creates pagination state, rejecting inexact page arithmetic.
    pub fn checked(offset: usize, page_size: usize) -> Result<Self, Error> {
        let page = Self::new(offset, page_size);
        page.page_number()?;
        Ok(page)
    }

    /// The first page for the given page size.
    pub fn first(page_size: usize) -> Self {
        Self::new(0, page_size)
    }

    /// Creates pagination from a 1-based page number.
    pub fn for_page(page_number: usize, page_size: usize) -> Result<Self, Error> {
        if page_number == 0 {
            return Err(Error::InvalidPagination {
                offset: 0,
                page_size,
            });
        }
        let offset = (page_number - 1)
            .checked_mul(page_size)
            .ok_or(Error::InvalidPagination {
                offset: usize::MAX,
                page_size,
            })?;
        Self::checked(offset, page_size)
    }

    /// Index of the first row on the page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the 1-based page number.
    ///
    /// Fails with [`Error::InvalidPagination`] when the page size is zero or
    /// the offset is not a multiple of it.
    pub fn page_number(&self) -> Result<usize, Error> {
        if self.page_size == 0 || self.offset % self.page_size != 0 {
            return Err(Error::InvalidPagination {
                offset: self.offset,
                page_size: self.page_size,
            });
        }
        Ok(self.offset / self.page_size + 1)
    }

    /// Number of pages needed to show `total` rows (zero for an empty table).
    pub fn page_count(&self, total: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(self.page_size)
    }

    /// Returns the same page size starting at offset 0.
    pub fn reset(&self) -> Self {
        Self::first(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_is_one() {
        assert_eq!(Pagination::new(0, 10).page_number().unwrap(), 1);
    }

    #[test]
    fn test_page_number_exact_for_multiples() {
        for page_size in 1..=25 {
            for page in 0..40 {
                let pagination = Pagination::new(page * page_size, page_size);
                assert_eq!(pagination.page_number().unwrap(), page + 1);
            }
        }
    }

    #[test]
    fn test_inexact_offset_rejected() {
        assert!(matches!(
            Pagination::new(15, 10).page_number(),
            Err(Error::InvalidPagination {
                offset: 15,
                page_size: 10
            })
        ));
        assert!(Pagination::checked(0, 0).is_err());
    }

    #[test]
    fn test_for_page() {
        assert_eq!(Pagination::for_page(1, 20).unwrap(), Pagination::new(0, 20));
        assert_eq!(Pagination::for_page(5, 10).unwrap().offset(), 40);
        assert!(Pagination::for_page(0, 10).is_err());
    }

    #[test]
    fn test_page_count() {
        let page = Pagination::first(10);
        assert_eq!(page.page_count(0), 0);
        assert_eq!(page.page_count(10), 1);
        assert_eq!(page.page_count(47), 5);
        assert_eq!(Pagination::first(0).page_count(47), 0);
    }
}

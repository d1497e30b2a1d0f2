//! Request generations and loading flags.

use std::collections::BTreeMap;
use std::fmt;

/// Tag of a dispatched request.
///
/// Generations increase by one per dispatch; only a response carrying the
/// highest generation issued so far may change the displayed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any request was dispatched.
    pub const ZERO: Self = Self(0);

    /// The generation following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Busy indicators of the table.
///
/// The global flag drives the table-wide spinner. Column flags drive the
/// small spinner inside a filter box and are owned by the request that set
/// them: a newer request for the same column takes the flag over, and only
/// the owner may clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    global: bool,
    columns: BTreeMap<String, Generation>,
}

impl LoadingFlags {
    /// Returns `true` while the latest request is in flight.
    pub fn is_loading(&self) -> bool {
        self.global
    }

    /// Returns `true` while a filter request for `column` is in flight.
    pub fn is_column_loading(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Columns with a filter request in flight, in name order.
    pub fn busy_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub(crate) fn begin(&mut self, generation: Generation, column: Option<&str>) {
        self.global = true;
        if let Some(column) = column {
            self.columns.insert(column.to_string(), generation);
        }
    }

    pub(crate) fn finish(&mut self, generation: Generation, current: Generation, column: Option<&str>) {
        if let Some(column) = column
            && self.columns.get(column) == Some(&generation)
        {
            self.columns.remove(column);
        }
        if generation == current {
            self.global = false;
        }
    }
}

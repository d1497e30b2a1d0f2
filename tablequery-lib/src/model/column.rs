//! Column definitions

/// A single table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    field: String,
    filterable: bool,
    sortable: bool,
}

impl ColumnDef {
    /// Creates a column that can be both filtered and sorted.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            filterable: true,
            sortable: true,
        }
    }

    /// Sets whether the column has a filter box.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Sets whether the column header can be clicked to sort.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Returns the wire name of the column.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns `true` if the column accepts a filter.
    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Returns `true` if the column can be sorted.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }
}

/// The ordered set of columns a table exposes.
///
/// Declaration order is significant: it is the fixed priority order used
/// when compiling filters into a request, independent of the order in which
/// the user edited them.
///
/// # Example
///
/// ```
/// use tablequery_lib::model::{ColumnDef, ColumnSet};
///
/// let columns = ColumnSet::new([
///     ColumnDef::new("name"),
///     ColumnDef::new("id").filterable(false),
/// ]);
///
/// assert!(columns.is_filterable("name"));
/// assert!(!columns.is_filterable("id"));
/// assert!(columns.is_sortable("id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
}

impl ColumnSet {
    /// Creates a column set. Later duplicates of a field are ignored.
    pub fn new(columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        let mut unique: Vec<ColumnDef> = Vec::new();
        for column in columns {
            if !unique.iter().any(|c| c.field == column.field) {
                unique.push(column);
            }
        }
        Self { columns: unique }
    }

    /// Looks up a column by field name.
    pub fn get(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Returns `true` if the column exists and accepts a filter.
    pub fn is_filterable(&self, field: &str) -> bool {
        self.get(field).is_some_and(ColumnDef::is_filterable)
    }

    /// Returns `true` if the column exists and can be sorted.
    pub fn is_sortable(&self, field: &str) -> bool {
        self.get(field).is_some_and(ColumnDef::is_sortable)
    }

    /// Iterates over the filterable columns in priority order.
    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.filterable)
    }

    /// Iterates over all columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns are defined.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for ColumnSet {
    /// The student table: name, address and phone number.
    fn default() -> Self {
        Self::new([
            ColumnDef::new("name"),
            ColumnDef::new("address"),
            ColumnDef::new("phoneNo"),
        ])
    }
}

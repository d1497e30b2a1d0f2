//! Sort specification and the header-click toggle rules.

use std::cmp::Ordering;

use crate::model::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Returns the wire name (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses `asc`/`ascending`/`desc`/`descending`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// One sorted column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortEntry {
    /// Column field name.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

impl SortEntry {
    /// Creates an ascending entry.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending entry.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sorted columns, unique by field.
///
/// The first entry is the primary sort key.
///
/// # Example
///
/// ```
/// use tablequery_lib::query::SortSpec;
///
/// let spec = SortSpec::new().then_asc("name").then_desc("address");
/// assert_eq!(spec.to_wire(), "name,asc,address,desc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    entries: Vec<SortEntry>,
}

impl SortSpec {
    /// Creates an empty (unsorted) spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an ascending entry, replacing any existing entry for the field.
    pub fn then_asc(self, field: impl Into<String>) -> Self {
        self.then(SortEntry::asc(field))
    }

    /// Appends a descending entry, replacing any existing entry for the field.
    pub fn then_desc(self, field: impl Into<String>) -> Self {
        self.then(SortEntry::desc(field))
    }

    fn then(mut self, entry: SortEntry) -> Self {
        self.entries.retain(|e| e.field != entry.field);
        self.entries.push(entry);
        self
    }

    /// Returns the entries in priority order.
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Returns the direction of a field, if it is sorted.
    pub fn direction_of(&self, field: &str) -> Option<Direction> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.direction)
    }

    /// Returns `true` if no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compiles the spec into the `orderBy` wire string.
    ///
    /// Each entry becomes `field,direction`; entries are joined with commas
    /// in priority order. An unsorted spec yields an empty string.
    pub fn to_wire(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{},{}", e.field, e.direction.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Orders two records by each entry in turn, the first entry deciding.
    ///
    /// Values compare case-insensitively; a missing value sorts before any
    /// present one.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.entries
            .iter()
            .map(|entry| {
                let ordering = sort_key(a, &entry.field).cmp(&sort_key(b, &entry.field));
                match entry.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn sort_key(record: &Record, field: &str) -> Option<String> {
    record.field(field).map(|v| v.to_lowercase())
}

/// How a click on a sortable column header changes the sort spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    /// At most one sorted column. Clicking the sorted column flips it;
    /// clicking another column replaces the spec with that column ascending.
    Single,
    /// Any number of sorted columns. Clicking a sorted column flips it in
    /// place; clicking an unsorted column appends it ascending.
    #[default]
    Multiple,
}

impl SortPolicy {
    /// Computes the spec after a header click on `field`.
    pub fn toggle(self, current: &SortSpec, field: &str) -> SortSpec {
        let direction = current
            .direction_of(field)
            .map_or(Direction::Asc, Direction::flip);
        self.set(current, field, direction)
    }

    /// Computes the spec after explicitly sorting `field` in `direction`.
    pub fn set(self, current: &SortSpec, field: &str, direction: Direction) -> SortSpec {
        let entry = SortEntry {
            field: field.to_string(),
            direction,
        };
        match self {
            Self::Single => SortSpec {
                entries: vec![entry],
            },
            Self::Multiple => {
                let mut entries = current.entries.clone();
                match entries.iter_mut().find(|e| e.field == field) {
                    Some(existing) => existing.direction = direction,
                    None => entries.push(entry),
                }
                SortSpec { entries }
            }
        }
    }

    /// Parses `single` / `multiple`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "multiple" | "multi" => Some(Self::Multiple),
            _ => None,
        }
    }
}

/// Resolves a header click on `field` under `policy`.
///
/// Shorthand for [`SortPolicy::toggle`].
pub fn resolve(current: &SortSpec, field: &str, policy: SortPolicy) -> SortSpec {
    policy.toggle(current, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_toggle_is_two_cycle() {
        let once = resolve(&SortSpec::new(), "name", SortPolicy::Single);
        assert_eq!(once.entries(), [SortEntry::asc("name")]);

        let twice = resolve(&once, "name", SortPolicy::Single);
        assert_eq!(twice.entries(), [SortEntry::desc("name")]);

        let thrice = resolve(&twice, "name", SortPolicy::Single);
        assert_eq!(thrice, once);
    }

    #[test]
    fn test_single_other_field_replaces_and_resets() {
        let spec = SortSpec::new().then_desc("name");
        let next = resolve(&spec, "address", SortPolicy::Single);
        assert_eq!(next.entries(), [SortEntry::asc("address")]);
    }

    #[test]
    fn test_multiple_flip_keeps_position() {
        let spec = SortSpec::new().then_asc("a").then_desc("b");
        let next = resolve(&spec, "a", SortPolicy::Multiple);
        assert_eq!(next.entries(), [SortEntry::desc("a"), SortEntry::desc("b")]);
    }

    #[test]
    fn test_multiple_appends_new_field() {
        let spec = SortSpec::new().then_desc("b");
        let next = resolve(&spec, "a", SortPolicy::Multiple);
        assert_eq!(next.entries(), [SortEntry::desc("b"), SortEntry::asc("a")]);
    }

    #[test]
    fn test_multiple_never_removes() {
        let mut spec = SortSpec::new();
        for _ in 0..5 {
            spec = resolve(&spec, "name", SortPolicy::Multiple);
            assert_eq!(spec.entries().len(), 1);
        }
    }

    #[test]
    fn test_explicit_direction() {
        let spec = SortSpec::new().then_asc("a").then_asc("b");
        let next = SortPolicy::Multiple.set(&spec, "a", Direction::Desc);
        assert_eq!(next.to_wire(), "a,desc,b,asc");

        let next = SortPolicy::Single.set(&spec, "b", Direction::Desc);
        assert_eq!(next.to_wire(), "b,desc");
    }

    #[test]
    fn test_compare_by_entries_in_order() {
        let a = Record::new(1_i64, "ada", "North", "1");
        let b = Record::new(2_i64, "Ada", "South", "2");
        let c = Record::new(3_i64, "bob", "North", "3");

        let spec = SortSpec::new().then_asc("name").then_desc("address");
        let mut records = vec![c.clone(), a.clone(), b.clone()];
        records.sort_by(|x, y| spec.compare(x, y));
        assert_eq!(records, [b.clone(), a.clone(), c.clone()]);

        let spec = SortSpec::new().then_desc("name");
        assert_eq!(spec.compare(&a, &c), Ordering::Greater);
        assert_eq!(SortSpec::new().compare(&a, &c), Ordering::Equal);
    }

    #[test]
    fn test_missing_value_sorts_first() {
        let mut blank = Record::new(1_i64, "x", "x", "x");
        blank.name = None;
        let named = Record::new(2_i64, "Ada", "x", "x");
        let spec = SortSpec::new().then_asc("name");
        assert_eq!(spec.compare(&blank, &named), Ordering::Less);
    }

    #[test]
    fn test_empty_wire() {
        assert_eq!(SortSpec::new().to_wire(), "");
    }
}

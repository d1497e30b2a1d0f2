//! Column filter types.

use serde::Deserialize;
use serde::Serialize;

/// Comparison applied between a column value and the filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Substring match.
    #[default]
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Exact match.
    Equals,
    /// Anything but an exact match.
    NotEquals,
    /// No comparison; the filter is inactive.
    None,
}

impl MatchMode {
    /// Returns the wire name of the match mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::None => "none",
        }
    }

    /// Parses a wire name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let mode = match s.to_ascii_lowercase().as_str() {
            "contains" => Self::Contains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "equals" => Self::Equals,
            "notequals" => Self::NotEquals,
            "none" => Self::None,
            _ => return None,
        };
        Some(mode)
    }

    /// Compares a column value against `needle`, ignoring case.
    ///
    /// A missing value only passes `NotEquals` and `None`.
    pub fn matches(&self, value: Option<&str>, needle: &str) -> bool {
        let Some(value) = value else {
            return matches!(self, Self::NotEquals | Self::None);
        };

        let value = value.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            Self::Contains => value.contains(&needle),
            Self::StartsWith => value.starts_with(&needle),
            Self::EndsWith => value.ends_with(&needle),
            Self::Equals => value == needle,
            Self::NotEquals => value != needle,
            Self::None => true,
        }
    }
}

/// The filter of a single column.
///
/// A filter is active only when it carries a value and a real match mode.
/// Empty strings are treated as "no value", matching what a cleared filter
/// box sends.
///
/// # Example
///
/// ```
/// use tablequery_lib::query::{FilterEntry, MatchMode};
///
/// assert!(FilterEntry::new(Some("ada"), MatchMode::Contains).is_active());
/// assert!(!FilterEntry::new(Some(""), MatchMode::Contains).is_active());
/// assert!(!FilterEntry::new(Some("ada"), MatchMode::None).is_active());
/// assert!(!FilterEntry::inactive().is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterEntry {
    value: Option<String>,
    match_mode: MatchMode,
}

impl FilterEntry {
    /// Creates a filter entry, normalizing an empty value to `None`.
    pub fn new(value: Option<impl Into<String>>, match_mode: MatchMode) -> Self {
        let value = value.map(Into::into).filter(|v: &String| !v.is_empty());
        Self { value, match_mode }
    }

    /// An inactive `contains` filter, the initial state of every column.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// The filter value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The match mode.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Returns `true` if this filter restricts the result set.
    pub fn is_active(&self) -> bool {
        self.value.is_some() && self.match_mode != MatchMode::None
    }

    /// Returns `true` if a column holding `value` passes this filter.
    /// Inactive filters pass everything.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match &self.value {
            Some(needle) => self.match_mode.matches(value, needle),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_mode_round_trip_names() {
        for mode in [
            MatchMode::Contains,
            MatchMode::StartsWith,
            MatchMode::EndsWith,
            MatchMode::Equals,
            MatchMode::NotEquals,
            MatchMode::None,
        ] {
            assert_eq!(MatchMode::parse(mode.as_str()), Some(mode));
            assert_eq!(
                serde_json::to_value(mode).unwrap(),
                serde_json::Value::String(mode.as_str().to_string())
            );
        }
        assert_eq!(MatchMode::parse("STARTSWITH"), Some(MatchMode::StartsWith));
        assert_eq!(MatchMode::parse("like"), None);
    }

    #[test]
    fn test_null_value_inactive_regardless_of_mode() {
        let entry = FilterEntry::new(None::<String>, MatchMode::Equals);
        assert!(!entry.is_active());
        assert_eq!(entry.value(), None);
    }

    #[test]
    fn test_match_modes_ignore_case() {
        let value = Some("12 College Road");
        assert!(MatchMode::Contains.matches(value, "college"));
        assert!(MatchMode::StartsWith.matches(value, "12 c"));
        assert!(MatchMode::EndsWith.matches(value, "ROAD"));
        assert!(MatchMode::Equals.matches(value, "12 college road"));
        assert!(!MatchMode::Equals.matches(value, "12 College"));
        assert!(MatchMode::NotEquals.matches(value, "12 College"));
        assert!(!MatchMode::StartsWith.matches(value, "College"));
    }

    #[test]
    fn test_missing_value() {
        assert!(!MatchMode::Contains.matches(None, "a"));
        assert!(!MatchMode::Equals.matches(None, "a"));
        assert!(MatchMode::NotEquals.matches(None, "a"));
    }

    #[test]
    fn test_inactive_entry_passes_everything() {
        assert!(FilterEntry::inactive().matches(None));
        assert!(FilterEntry::new(Some("x"), MatchMode::None).matches(Some("abc")));
        assert!(!FilterEntry::new(Some("x"), MatchMode::Contains).matches(Some("abc")));
    }
}

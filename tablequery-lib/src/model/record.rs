//! Record returned by the data provider

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Stable identity of a record (the table's data key).
///
/// Endpoints are free to use numeric or string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric key.
    Number(i64),
    /// String key (GUIDs, slugs).
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A single row of the student table.
///
/// # Example
///
/// ```
/// use tablequery_lib::model::Record;
///
/// let record: Record = serde_json::from_str(
///     r#"{"id": 7, "name": "Ada", "address": "12 Loop St", "phoneNo": "555-0100"}"#,
/// ).unwrap();
///
/// assert_eq!(record.field("phoneNo").as_deref(), Some("555-0100"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Data key.
    pub id: RecordId,
    /// Student name.
    #[serde(default)]
    pub name: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Phone number, `phoneNo` on the wire.
    #[serde(default)]
    pub phone_no: Option<String>,
}

impl Record {
    /// Creates a record with all display fields set.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone_no: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            address: Some(address.into()),
            phone_no: Some(phone_no.into()),
        }
    }

    /// Returns the display value of a field by its wire name.
    ///
    /// Returns `None` for unknown fields and for fields the endpoint left null.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "name" => self.name.clone(),
            "address" => self.address.clone(),
            "phoneNo" => self.phone_no.clone(),
            _ => None,
        }
    }
}

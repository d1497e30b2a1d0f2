//! Response bodies returned by providers

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::Record;

/// A provider response.
///
/// Endpoints either paginate (`{ "students": [...], "totalRecords": 47 }`)
/// or return every record as a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    /// One page plus the total number of matching records.
    Paged {
        /// Records on the page.
        students: Vec<Record>,
        /// Total matching records across all pages.
        #[serde(rename = "totalRecords")]
        total_records: usize,
    },
    /// Every record, without pagination metadata.
    Unpaginated(Vec<Record>),
}

impl ProviderResponse {
    /// Creates a paged response.
    pub fn paged(records: Vec<Record>, total_records: usize) -> Self {
        Self::Paged {
            students: records,
            total_records,
        }
    }

    /// Creates an unpaginated response.
    pub fn unpaginated(records: Vec<Record>) -> Self {
        Self::Unpaginated(records)
    }

    /// Decodes a response body.
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    /// The records of the response.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Paged { students, .. } => students,
            Self::Unpaginated(records) => records,
        }
    }

    /// The total record count; the record count for unpaginated responses.
    pub fn total_count(&self) -> usize {
        match self {
            Self::Paged { total_records, .. } => *total_records,
            Self::Unpaginated(records) => records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paged() {
        let response = ProviderResponse::parse(
            r#"{"students": [{"id": 1, "name": "Ada", "address": "Main St", "phoneNo": "555"}],
                "totalRecords": 47}"#,
        )
        .unwrap();
        assert_eq!(response.records().len(), 1);
        assert_eq!(response.total_count(), 47);
    }

    #[test]
    fn test_parse_bare_array() {
        let response = ProviderResponse::parse(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#).unwrap();
        assert!(matches!(response, ProviderResponse::Unpaginated(_)));
        assert_eq!(response.total_count(), 3);
    }

    #[test]
    fn test_parse_error_keeps_body() {
        let err = ProviderResponse::parse(r#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Parse { body: Some(ref body), .. } if body.contains("boom")
        ));
    }
}

//! Shared types for content store operations.

use serde_json::Value;

use crate::errors::ContentStoreError;

/// A record as returned by the content store after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Store-assigned identifier, normalised to a string.
    pub id: String,
}

impl StoredRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Build a record from a returned document.
    ///
    /// Numeric ids (Postgres-backed collections) and string ids (Mongo-backed
    /// collections) are both accepted.
    pub fn from_document(doc: &Value) -> Result<Self, ContentStoreError> {
        match doc.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(Self::new(id.clone())),
            Some(Value::Number(id)) => Ok(Self::new(id.to_string())),
            Some(other) => Err(ContentStoreError::parse(format!(
                "unsupported id value: {}",
                other
            ))),
            None => Err(ContentStoreError::parse("document has no id")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids() {
        let record = StoredRecord::from_document(&json!({"id": 17, "name": "Pool"})).unwrap();
        assert_eq!(record.id, "17");

        let record =
            StoredRecord::from_document(&json!({"id": "65f1c0ffee", "name": "Pool"})).unwrap();
        assert_eq!(record.id, "65f1c0ffee");
    }

    #[test]
    fn test_missing_or_invalid_id() {
        let err = StoredRecord::from_document(&json!({"name": "Pool"})).unwrap_err();
        assert!(matches!(err, ContentStoreError::ParseError(_)));

        let err = StoredRecord::from_document(&json!({"id": null})).unwrap_err();
        assert!(matches!(err, ContentStoreError::ParseError(_)));

        let err = StoredRecord::from_document(&json!({"id": ""})).unwrap_err();
        assert!(matches!(err, ContentStoreError::ParseError(_)));
    }
}

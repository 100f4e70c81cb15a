//! Content store error types.
//!
//! Errors are classified once, where the backend response is interpreted.
//! Callers branch on [`ContentStoreErrorKind`] instead of inspecting messages.

use thiserror::Error;

/// Coarse classification of a [`ContentStoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentStoreErrorKind {
    Connection,
    Duplicate,
    Validation,
    NotFound,
    Unexpected,
    Parse,
    Serialization,
}

/// Unified errors from content store operations.
#[derive(Debug, Clone, Error)]
pub enum ContentStoreError {
    /// The store could not be reached or rejected our credentials.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A unique constraint (slug, name, legacy id) rejected the write.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The store rejected the payload, e.g. a required field is blank.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The record addressed by an update does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("Unexpected response (status {status}): {body}")]
    Unexpected { status: u16, body: String },

    /// The response body could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The request body could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ContentStoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a duplicate key error.
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound(format!("collection={}, id={}", collection, id))
    }

    /// Create an unexpected response error.
    pub fn unexpected(status: u16, body: impl Into<String>) -> Self {
        Self::Unexpected {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn kind(&self) -> ContentStoreErrorKind {
        match self {
            Self::ConnectionError(_) => ContentStoreErrorKind::Connection,
            Self::DuplicateKey(_) => ContentStoreErrorKind::Duplicate,
            Self::ValidationError(_) => ContentStoreErrorKind::Validation,
            Self::NotFound(_) => ContentStoreErrorKind::NotFound,
            Self::Unexpected { .. } => ContentStoreErrorKind::Unexpected,
            Self::ParseError(_) => ContentStoreErrorKind::Parse,
            Self::SerializationError(_) => ContentStoreErrorKind::Serialization,
        }
    }

    /// Whether the write was rejected by a uniqueness constraint.
    pub fn is_duplicate(&self) -> bool {
        self.kind() == ContentStoreErrorKind::Duplicate
    }

    /// Whether the error means the store itself is unusable for the rest of the run.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ContentStoreErrorKind::Connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_errors_are_fatal() {
        assert!(ContentStoreError::connection("refused").is_fatal());
        assert!(!ContentStoreError::duplicate("slug").is_fatal());
        assert!(!ContentStoreError::validation("name").is_fatal());
        assert!(!ContentStoreError::unexpected(500, "boom").is_fatal());
        assert!(!ContentStoreError::not_found("properties", "7").is_fatal());
    }

    #[test]
    fn test_duplicate_is_decided_by_kind() {
        let err = ContentStoreError::duplicate("slug must be unique");
        assert!(err.is_duplicate());
        assert_eq!(err.kind(), ContentStoreErrorKind::Duplicate);

        // A validation message that merely mentions "duplicate" is not a duplicate.
        let err = ContentStoreError::validation("duplicate spaces in name");
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ContentStoreError::not_found("residences", "42");
        assert_eq!(
            err.to_string(),
            "Record not found: collection=residences, id=42"
        );

        let err = ContentStoreError::unexpected(502, "bad gateway");
        assert_eq!(
            err.to_string(),
            "Unexpected response (status 502): bad gateway"
        );
    }
}

//! Error types for the seed migration.
//!
//! Only [`MigrationError`] ever leaves a run. Row-level problems are absorbed
//! by the importer and linker and surface as counts in the summary.
use seed_migrate_repository::ContentStoreError;
use thiserror::Error;

/// Errors raised while reading the legacy database.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source connection error: {0}")]
    Connection(String),

    #[error("Source query error: {0}")]
    Query(String),

    /// A single value could not be decoded into its expected type.
    #[error("Source decode error: {0}")]
    Decode(String),

    /// A row lacks a mandatory column and cannot be transformed.
    #[error("Malformed {table} row (id {legacy_id:?}): missing {column}")]
    MalformedRow {
        table: &'static str,
        legacy_id: Option<i64>,
        column: &'static str,
    },
}

impl SourceError {
    pub fn malformed(table: &'static str, legacy_id: Option<i64>, column: &'static str) -> Self {
        Self::MalformedRow {
            table,
            legacy_id,
            column,
        }
    }

    /// Connection and query failures abort the run; decode and malformed
    /// rows only skip the row.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Query(_))
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => Self::Connection(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Decode(err.to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

/// Fatal errors that terminate a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Content store error: {0}")]
    ContentStore(#[from] ContentStoreError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_classification() {
        assert!(SourceError::from(sqlx::Error::PoolTimedOut).is_fatal());
        assert!(SourceError::from(sqlx::Error::RowNotFound).is_fatal());

        let err = SourceError::from(sqlx::Error::ColumnDecode {
            index: "latitude".to_string(),
            source: "not a number".into(),
        });
        assert!(matches!(err, SourceError::Decode(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_malformed_row_is_not_fatal() {
        let err = SourceError::malformed("amenity", Some(4), "name");
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Malformed amenity row (id Some(4)): missing name");
    }
}

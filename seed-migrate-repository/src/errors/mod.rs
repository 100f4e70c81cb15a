//! Error types for the seed migration repository.
//!
//! This module provides a unified error type for all content store operations.

mod content_store_error;

pub use content_store_error::{ContentStoreError, ContentStoreErrorKind};

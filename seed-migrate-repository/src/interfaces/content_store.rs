//! Content store trait definition.
//!
//! This module defines the narrow interface the seed migration needs from the
//! target content store: creating records and updating them by id.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ContentStoreError;
use crate::types::StoredRecord;

/// Abstracts the target content store (Payload CMS, or a mock in tests).
///
/// Implementations are injected into the migration as `Arc<dyn ContentStore>`
/// so the pipeline can be exercised without a running CMS.
///
/// Identifiers are assigned by the store and returned in [`StoredRecord`].
/// Implementations must classify failures into [`ContentStoreError`] variants
/// so callers never need to inspect error messages.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create a record in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection slug (e.g. `"amenities"`)
    /// * `data` - The record fields as a JSON object
    ///
    /// # Returns
    ///
    /// * `Ok(StoredRecord)` - The created record with its store-assigned id
    /// * `Err(ContentStoreError)` - `DuplicateKey` when a unique field collides,
    ///   `ConnectionError` when the store is unreachable, others otherwise
    async fn create(&self, collection: &str, data: &Value)
        -> Result<StoredRecord, ContentStoreError>;

    /// Update fields of an existing record.
    ///
    /// Only the fields present in `data` are replaced.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection slug
    /// * `id` - The store-assigned record id
    /// * `data` - The fields to replace as a JSON object
    ///
    /// # Returns
    ///
    /// * `Ok(StoredRecord)` - The updated record
    /// * `Err(ContentStoreError)` - `NotFound` when `id` does not exist, others as for `create`
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError>;
}

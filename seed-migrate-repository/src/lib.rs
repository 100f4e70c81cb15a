//! # Seed Migrate Repository
//!
//! This crate provides the content store boundary used by the seed migration.
//! It includes the error taxonomy, the `ContentStore` interface, a concrete
//! client for the Payload CMS REST API and an in-memory mock for tests.

pub mod errors;
pub mod interfaces;
pub mod mock;
pub mod payload;
pub mod types;

pub use errors::{ContentStoreError, ContentStoreErrorKind};
pub use interfaces::ContentStore;
pub use mock::MockContentStore;
pub use payload::{PayloadClient, PayloadConfig};
pub use types::StoredRecord;

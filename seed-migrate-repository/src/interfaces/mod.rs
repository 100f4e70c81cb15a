//! Interfaces for the content store.

mod content_store;

pub use content_store::ContentStore;

//! Mock content store for testing and local development.
//!
//! `MockContentStore` keeps collections in memory, enforces the required and
//! unique fields it is configured with, and records every write so tests can
//! assert on the calls the migration issued. State survives across runs, which
//! makes repeated seeding observable.
//!
//! # Example
//!
//! ```ignore
//! use seed_migrate_repository::{ContentStore, MockContentStore};
//!
//! let store = MockContentStore::new()
//!     .with_required("amenities", &["name", "slug"])
//!     .with_unique("amenities", &["slug"]);
//!
//! let record = store.create("amenities", &json!({"name": "Pool", "slug": "pool"})).await?;
//! assert_eq!(store.count("amenities"), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ContentStoreError;
use crate::interfaces::ContentStore;
use crate::types::StoredRecord;

/// A write observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCall {
    Create {
        collection: String,
        data: Value,
    },
    Update {
        collection: String,
        id: String,
        data: Value,
    },
}

#[derive(Default)]
struct MockState {
    /// collection -> (id, document) in insertion order
    collections: HashMap<String, Vec<(String, Value)>>,
    next_ids: HashMap<String, u64>,
    required: HashMap<String, Vec<String>>,
    unique: HashMap<String, Vec<String>>,
    create_failures: HashMap<String, ContentStoreError>,
    update_failures: HashMap<String, ContentStoreError>,
    calls: Vec<WriteCall>,
}

/// In-memory [`ContentStore`] with Payload-like validation.
#[derive(Default)]
pub struct MockContentStore {
    state: Mutex<MockState>,
}

impl MockContentStore {
    /// Create an empty store with no validation rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject creates in `collection` whose `fields` are missing, null or blank.
    pub fn with_required(self, collection: &str, fields: &[&str]) -> Self {
        self.lock()
            .required
            .insert(collection.to_string(), to_strings(fields));
        self
    }

    /// Reject creates in `collection` that repeat a stored value of any of `fields`.
    pub fn with_unique(self, collection: &str, fields: &[&str]) -> Self {
        self.lock()
            .unique
            .insert(collection.to_string(), to_strings(fields));
        self
    }

    /// Fail every create in `collection` with `error`.
    pub fn fail_creates(&self, collection: &str, error: ContentStoreError) {
        self.lock()
            .create_failures
            .insert(collection.to_string(), error);
    }

    /// Fail every update in `collection` with `error`.
    pub fn fail_updates(&self, collection: &str, error: ContentStoreError) {
        self.lock()
            .update_failures
            .insert(collection.to_string(), error);
    }

    /// Number of stored records in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.lock()
            .collections
            .get(collection)
            .map_or(0, |records| records.len())
    }

    /// Stored documents of a collection, in creation order.
    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.lock()
            .collections
            .get(collection)
            .map(|records| records.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    /// Stored document by id.
    pub fn find(&self, collection: &str, id: &str) -> Option<Value> {
        self.lock().collections.get(collection).and_then(|records| {
            records
                .iter()
                .find(|(record_id, _)| record_id == id)
                .map(|(_, doc)| doc.clone())
        })
    }

    /// Every write received so far, successful or not.
    pub fn calls(&self) -> Vec<WriteCall> {
        self.lock().calls.clone()
    }

    /// Updates received for a collection.
    pub fn updates(&self, collection: &str) -> Vec<(String, Value)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                WriteCall::Update {
                    collection: c,
                    id,
                    data,
                } if c == collection => Some((id.clone(), data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls while keeping stored records.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MockState {
    fn validate(&self, collection: &str, data: &Value) -> Result<(), ContentStoreError> {
        let Some(object) = data.as_object() else {
            return Err(ContentStoreError::validation("payload must be an object"));
        };

        for field in self.required.get(collection).into_iter().flatten() {
            let blank = match object.get(field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if blank {
                return Err(ContentStoreError::validation(format!(
                    "The following field is invalid: {}",
                    field
                )));
            }
        }

        let stored = self.collections.get(collection);
        for field in self.unique.get(collection).into_iter().flatten() {
            let Some(value) = object.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = stored
                .into_iter()
                .flatten()
                .any(|(_, doc)| doc.get(field) == Some(value));
            if taken {
                return Err(ContentStoreError::duplicate(format!(
                    "{}: Value must be unique",
                    field
                )));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn create(
        &self,
        collection: &str,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError> {
        let mut state = self.lock();
        state.calls.push(WriteCall::Create {
            collection: collection.to_string(),
            data: data.clone(),
        });

        if let Some(err) = state.create_failures.get(collection) {
            return Err(err.clone());
        }
        state.validate(collection, data)?;

        let next = state.next_ids.entry(collection.to_string()).or_insert(0);
        *next += 1;
        let id = next.to_string();

        let mut doc = data.clone();
        if let Some(object) = doc.as_object_mut() {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), doc));

        Ok(StoredRecord::new(id))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError> {
        let mut state = self.lock();
        state.calls.push(WriteCall::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            data: data.clone(),
        });

        if let Some(err) = state.update_failures.get(collection) {
            return Err(err.clone());
        }
        let Some(fields) = data.as_object() else {
            return Err(ContentStoreError::validation("payload must be an object"));
        };

        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|(record_id, _)| record_id == id))
            .and_then(|(_, doc)| doc.as_object_mut())
            .ok_or_else(|| ContentStoreError::not_found(collection, id))?;

        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }

        Ok(StoredRecord::new(id))
    }
}

fn to_strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

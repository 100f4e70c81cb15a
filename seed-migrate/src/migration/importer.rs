// Entity importer - one create call per legacy row
use std::sync::Arc;

use seed_migrate_repository::ContentStore;
use tracing::{debug, warn};

use crate::errors::MigrationError;
use crate::identifiers::{IdentifierMap, TargetId};
use crate::transform::LegacyRecord;

/// What happened to one legacy row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Created and mapped.
    Created(TargetId),
    /// A unique field already exists in the store (e.g. a repeated run).
    Duplicate,
    /// A mandatory reference did not resolve; nothing was sent.
    Unresolved,
    /// The store rejected the row for another reason.
    Failed,
}

/// Transforms legacy rows into payloads and creates them in the content store.
pub struct EntityImporter {
    store: Arc<dyn ContentStore>,
}

impl EntityImporter {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Import one record, mapping its legacy id on success.
    ///
    /// Row-level failures are absorbed into the returned [`ImportOutcome`];
    /// only a connection-level store failure is returned as an error.
    pub async fn import<R: LegacyRecord>(
        &self,
        ids: &mut IdentifierMap,
        record: &R,
    ) -> Result<ImportOutcome, MigrationError> {
        let kind = R::KIND;

        let payload = match record.to_payload(ids) {
            Ok(payload) => payload,
            Err(unresolved) => {
                debug!(
                    kind = %kind,
                    legacy_id = record.legacy_id(),
                    reference = %unresolved,
                    "Skipping row with unresolved reference"
                );
                return Ok(ImportOutcome::Unresolved);
            }
        };

        match self.store.create(kind.collection(), &payload).await {
            Ok(stored) => {
                let target_id = TargetId::from(stored.id);
                ids.set(kind, record.legacy_id(), target_id.clone());
                Ok(ImportOutcome::Created(target_id))
            }
            Err(e) if e.is_duplicate() => {
                debug!(
                    kind = %kind,
                    legacy_id = record.legacy_id(),
                    name = record.label(),
                    "Already present in the content store"
                );
                Ok(ImportOutcome::Duplicate)
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                warn!(
                    kind = %kind,
                    legacy_id = record.legacy_id(),
                    name = record.label(),
                    error = %e,
                    "⚠ Failed to import {}",
                    kind
                );
                Ok(ImportOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::EntityKind;
    use crate::models::{AmenityRecord, ResidenceRecord};
    use seed_migrate_repository::{ContentStoreError, MockContentStore};

    fn amenity(id: i64, name: &str) -> AmenityRecord {
        AmenityRecord {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn store() -> Arc<MockContentStore> {
        Arc::new(
            MockContentStore::new()
                .with_required("amenities", &["name", "slug"])
                .with_unique("amenities", &["slug"]),
        )
    }

    #[tokio::test]
    async fn test_created_rows_are_mapped() {
        let store = store();
        let importer = EntityImporter::new(store.clone());
        let mut ids = IdentifierMap::new();

        let outcome = importer.import(&mut ids, &amenity(5, "Pool")).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Created(TargetId::from("1")));
        assert_eq!(ids.get(EntityKind::Amenity, 5).unwrap().as_str(), "1");
        assert_eq!(store.count("amenities"), 1);
    }

    #[tokio::test]
    async fn test_duplicates_are_not_mapped() {
        let store = store();
        let importer = EntityImporter::new(store.clone());
        let mut ids = IdentifierMap::new();

        importer.import(&mut ids, &amenity(5, "Pool")).await.unwrap();
        let outcome = importer.import(&mut ids, &amenity(6, "Pool")).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Duplicate);
        assert!(!ids.contains(EntityKind::Amenity, 6));
        assert_eq!(ids.len(EntityKind::Amenity), 1);
    }

    #[tokio::test]
    async fn test_rejected_rows_are_skipped() {
        let importer = EntityImporter::new(store());
        let mut ids = IdentifierMap::new();

        let outcome = importer.import(&mut ids, &amenity(5, "")).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(ids.len(EntityKind::Amenity), 0);
    }

    #[tokio::test]
    async fn test_unresolved_rows_never_reach_the_store() {
        let store = store();
        let importer = EntityImporter::new(store.clone());
        let mut ids = IdentifierMap::new();

        let residence = ResidenceRecord {
            id: 1,
            property_id: 99,
            name: "Studio".to_string(),
            ..Default::default()
        };
        let outcome = importer.import(&mut ids, &residence).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Unresolved);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_connection_errors_are_fatal() {
        let store = store();
        store.fail_creates("amenities", ContentStoreError::connection("refused"));
        let importer = EntityImporter::new(store);
        let mut ids = IdentifierMap::new();

        let err = importer.import(&mut ids, &amenity(5, "Pool")).await.unwrap_err();
        assert!(matches!(err, MigrationError::ContentStore(_)));
    }
}

// Relationship linker - writes multi-valued reference fields once both sides exist
use std::collections::HashMap;
use std::sync::Arc;

use seed_migrate_repository::ContentStore;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::MigrationError;
use crate::identifiers::{EntityKind, IdentifierMap};
use crate::migration::report::LinkReport;

/// Where a relationship lives in the content model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// Owning entity; its collection receives the update.
    pub parent: EntityKind,
    /// Referenced entity.
    pub child: EntityKind,
    /// Multi-valued relationship field on the parent.
    pub field: &'static str,
}

impl LinkTarget {
    pub const PROPERTY_AMENITIES: LinkTarget = LinkTarget {
        parent: EntityKind::Property,
        child: EntityKind::Amenity,
        field: "amenities",
    };
}

/// Legacy children of one legacy parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    pub parent: i64,
    pub children: Vec<i64>,
}

/// Group `(parent, child)` pairs by parent, in first-seen parent order.
pub fn group_by_parent<I>(pairs: I) -> Vec<LinkGroup>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut groups: Vec<LinkGroup> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for (parent, child) in pairs {
        let position = *index.entry(parent).or_insert_with(|| {
            groups.push(LinkGroup {
                parent,
                children: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].children.push(child);
    }

    groups
}

/// Issues one relationship update per resolvable parent.
pub struct RelationshipLinker {
    store: Arc<dyn ContentStore>,
}

impl RelationshipLinker {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Replace the relationship field of every resolvable parent.
    ///
    /// Groups whose parent is unmapped are skipped whole. Unmapped children
    /// are dropped and the rest is written. A failed update is logged and
    /// the next group proceeds; only a connection-level failure aborts.
    pub async fn link(
        &self,
        ids: &IdentifierMap,
        target: LinkTarget,
        groups: &[LinkGroup],
    ) -> Result<LinkReport, MigrationError> {
        let mut report = LinkReport::default();

        for group in groups {
            let Some(parent_id) = ids.get(target.parent, group.parent) else {
                debug!(
                    parent = %target.parent,
                    legacy_id = group.parent,
                    "Skipping links of unmapped parent"
                );
                report.unresolved_parents += 1;
                continue;
            };

            let children = ids.resolve_all(target.child, &group.children);
            report.dropped_children += group.children.len() - children.len();
            if children.is_empty() {
                report.empty += 1;
                continue;
            }

            let children: Vec<Value> = children
                .into_iter()
                .map(|id| Value::String(id.as_str().to_string()))
                .collect();
            let mut data = Map::new();
            data.insert(target.field.to_string(), Value::Array(children));

            match self
                .store
                .update(target.parent.collection(), parent_id.as_str(), &Value::Object(data))
                .await
            {
                Ok(_) => report.linked += 1,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!(
                        parent = %target.parent,
                        legacy_id = group.parent,
                        field = target.field,
                        error = %e,
                        "⚠ Failed to link {} for {} {}",
                        target.field,
                        target.parent,
                        group.parent
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::TargetId;
    use seed_migrate_repository::{ContentStoreError, MockContentStore};
    use serde_json::json;

    #[test]
    fn test_group_by_parent_keeps_first_seen_order() {
        let groups = group_by_parent(vec![(2, 10), (1, 11), (2, 12), (3, 10), (1, 13)]);

        assert_eq!(
            groups,
            vec![
                LinkGroup { parent: 2, children: vec![10, 12] },
                LinkGroup { parent: 1, children: vec![11, 13] },
                LinkGroup { parent: 3, children: vec![10] },
            ]
        );
        assert!(group_by_parent(Vec::new()).is_empty());
    }

    async fn seeded_store(ids: &mut IdentifierMap) -> Arc<MockContentStore> {
        let store = Arc::new(MockContentStore::new());
        for legacy_id in [1, 2] {
            let record = store
                .create("properties", &json!({"name": format!("Property {}", legacy_id)}))
                .await
                .unwrap();
            ids.set(EntityKind::Property, legacy_id, TargetId::from(record.id));
        }
        ids.set(EntityKind::Amenity, 10, TargetId::from("a10"));
        ids.set(EntityKind::Amenity, 11, TargetId::from("a11"));
        store
    }

    #[tokio::test]
    async fn test_links_resolved_children_only() {
        let mut ids = IdentifierMap::new();
        let store = seeded_store(&mut ids).await;
        let linker = RelationshipLinker::new(store.clone());

        let groups = group_by_parent(vec![(1, 10), (1, 99), (1, 11), (2, 98)]);
        let report = linker
            .link(&ids, LinkTarget::PROPERTY_AMENITIES, &groups)
            .await
            .unwrap();

        assert_eq!(report.linked, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.dropped_children, 2);

        let updates = store.updates("properties");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "1");
        assert_eq!(updates[0].1, json!({"amenities": ["a10", "a11"]}));
    }

    #[tokio::test]
    async fn test_unmapped_parent_produces_no_update() {
        let mut ids = IdentifierMap::new();
        let store = seeded_store(&mut ids).await;
        let linker = RelationshipLinker::new(store.clone());

        let groups = group_by_parent(vec![(404, 10), (404, 11)]);
        let report = linker
            .link(&ids, LinkTarget::PROPERTY_AMENITIES, &groups)
            .await
            .unwrap();

        assert_eq!(report.unresolved_parents, 1);
        assert_eq!(report.linked, 0);
        assert!(store.updates("properties").is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_does_not_stop_other_groups() {
        let mut ids = IdentifierMap::new();
        let store = seeded_store(&mut ids).await;
        store.fail_updates("properties", ContentStoreError::validation("amenities invalid"));
        let linker = RelationshipLinker::new(store.clone());

        let groups = group_by_parent(vec![(1, 10), (2, 11)]);
        let report = linker
            .link(&ids, LinkTarget::PROPERTY_AMENITIES, &groups)
            .await
            .unwrap();

        assert_eq!(report.failed, 2);
        assert_eq!(store.updates("properties").len(), 2);
    }

    #[tokio::test]
    async fn test_connection_failure_aborts_linking() {
        let mut ids = IdentifierMap::new();
        let store = seeded_store(&mut ids).await;
        store.fail_updates("properties", ContentStoreError::connection("reset"));
        let linker = RelationshipLinker::new(store.clone());

        let groups = group_by_parent(vec![(1, 10), (2, 11)]);
        let err = linker
            .link(&ids, LinkTarget::PROPERTY_AMENITIES, &groups)
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::ContentStore(_)));
        assert_eq!(store.updates("properties").len(), 1);
    }
}

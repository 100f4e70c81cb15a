//! Legacy id → store id bookkeeping for one run.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::error;

/// Entity types that receive a fresh identifier in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Amenity,
    Destination,
    Property,
    Residence,
}

impl EntityKind {
    /// Target collection slug.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Amenity => "amenities",
            EntityKind::Destination => "destinations",
            EntityKind::Property => "properties",
            EntityKind::Residence => "residences",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Amenity => "amenity",
            EntityKind::Destination => "destination",
            EntityKind::Property => "property",
            EntityKind::Residence => "residence",
        };
        f.write_str(name)
    }
}

/// Identifier assigned by the content store. Opaque to the migration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(String);

impl TargetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One write-once mapping per [`EntityKind`], owned by the run that fills it.
#[derive(Debug, Default)]
pub struct IdentifierMap {
    maps: HashMap<EntityKind, HashMap<i64, TargetId>>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the store id of a created entity.
    ///
    /// Keys are write-once. Setting a key twice is a bug in the caller: the
    /// first value is kept, debug builds panic.
    pub fn set(&mut self, kind: EntityKind, legacy_id: i64, target_id: TargetId) {
        match self.maps.entry(kind).or_default().entry(legacy_id) {
            Entry::Vacant(slot) => {
                slot.insert(target_id);
            }
            Entry::Occupied(existing) => {
                error!(
                    kind = %kind,
                    legacy_id,
                    existing = %existing.get(),
                    rejected = %target_id,
                    "Identifier already mapped"
                );
                debug_assert!(false, "{} {} mapped twice", kind, legacy_id);
            }
        }
    }

    pub fn get(&self, kind: EntityKind, legacy_id: i64) -> Option<&TargetId> {
        self.maps.get(&kind).and_then(|map| map.get(&legacy_id))
    }

    pub fn contains(&self, kind: EntityKind, legacy_id: i64) -> bool {
        self.get(kind, legacy_id).is_some()
    }

    /// Number of mapped entities of a kind.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.maps.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.maps.values().all(HashMap::is_empty)
    }

    /// Resolve a list of legacy ids, keeping input order.
    ///
    /// Unmapped ids are dropped, and so are repeats of an already resolved id.
    pub fn resolve_all(&self, kind: EntityKind, legacy_ids: &[i64]) -> Vec<&TargetId> {
        let mut seen = HashSet::new();
        legacy_ids
            .iter()
            .filter_map(|id| self.get(kind, *id))
            .filter(|&target| seen.insert(target.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_are_independent_per_kind() {
        let mut ids = IdentifierMap::new();
        assert!(ids.is_empty());

        ids.set(EntityKind::Amenity, 1, TargetId::from("a1"));
        ids.set(EntityKind::Property, 1, TargetId::from("p1"));

        assert_eq!(ids.get(EntityKind::Amenity, 1).unwrap().as_str(), "a1");
        assert_eq!(ids.get(EntityKind::Property, 1).unwrap().as_str(), "p1");
        assert_eq!(ids.get(EntityKind::Destination, 1), None);
        assert_eq!(ids.len(EntityKind::Amenity), 1);
        assert_eq!(ids.len(EntityKind::Residence), 0);
        assert!(!ids.is_empty());
    }

    #[test]
    fn test_absent_key_is_not_found() {
        let ids = IdentifierMap::new();
        assert!(!ids.contains(EntityKind::Property, 404));
    }

    #[test]
    #[should_panic(expected = "mapped twice")]
    #[cfg(debug_assertions)]
    fn test_second_set_is_a_bug() {
        let mut ids = IdentifierMap::new();
        ids.set(EntityKind::Amenity, 1, TargetId::from("a1"));
        ids.set(EntityKind::Amenity, 1, TargetId::from("a2"));
    }

    #[test]
    fn test_resolve_all_keeps_order_and_drops_misses() {
        let mut ids = IdentifierMap::new();
        ids.set(EntityKind::Amenity, 10, TargetId::from("x"));
        ids.set(EntityKind::Amenity, 20, TargetId::from("y"));

        let resolved = ids.resolve_all(EntityKind::Amenity, &[20, 99, 10, 20]);
        let resolved: Vec<&str> = resolved.iter().map(|id| id.as_str()).collect();
        assert_eq!(resolved, vec!["y", "x"]);
    }

    #[test]
    fn test_collections() {
        assert_eq!(EntityKind::Amenity.collection(), "amenities");
        assert_eq!(EntityKind::Residence.collection(), "residences");
        assert_eq!(EntityKind::Property.to_string(), "property");
    }
}

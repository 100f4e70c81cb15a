//! Legacy record → content store payload mapping.
//!
//! Each record type knows its target collection and how to build its creation
//! payload. Cross-entity references are resolved through the run's
//! [`IdentifierMap`]; optional references that do not resolve are omitted,
//! mandatory ones fail with [`UnresolvedReference`].
pub mod fields;
pub mod rich_text;

use serde_json::{json, Value};
use thiserror::Error;

use crate::identifiers::{EntityKind, IdentifierMap, TargetId};
use crate::models::{AmenityRecord, DestinationRecord, PropertyRecord, ResidenceRecord};
use fields::{classify_kitchen, flag, non_blank, parse_count, slug_or_derived, KitchenType};

/// Legacy data carries no amenity classification, every amenity lands in
/// this category until one is available.
pub const DEFAULT_AMENITY_CATEGORY: &str = "other";

/// A mandatory reference whose legacy id has no entry in the identifier map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unresolved {kind} reference {legacy_id}")]
pub struct UnresolvedReference {
    pub kind: EntityKind,
    pub legacy_id: i64,
}

/// A typed legacy row that becomes one entity of the content model.
pub trait LegacyRecord {
    const KIND: EntityKind;

    fn legacy_id(&self) -> i64;

    /// Human-readable identification for logs.
    fn label(&self) -> &str;

    /// Build the creation payload. Null fields are omitted.
    fn to_payload(&self, ids: &IdentifierMap) -> Result<Value, UnresolvedReference>;
}

impl LegacyRecord for AmenityRecord {
    const KIND: EntityKind = EntityKind::Amenity;

    fn legacy_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_payload(&self, _ids: &IdentifierMap) -> Result<Value, UnresolvedReference> {
        Ok(without_nulls(json!({
            "legacy_id": self.id,
            "name": self.name.trim(),
            "slug": slug_or_derived(self.slug.as_deref(), &self.name),
            "featured": flag(self.featured),
            "category": DEFAULT_AMENITY_CATEGORY,
        })))
    }
}

impl LegacyRecord for DestinationRecord {
    const KIND: EntityKind = EntityKind::Destination;

    fn legacy_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_payload(&self, _ids: &IdentifierMap) -> Result<Value, UnresolvedReference> {
        Ok(without_nulls(json!({
            "legacy_id": self.id,
            "name": self.name.trim(),
            "slug": slug_or_derived(self.slug.as_deref(), &self.name),
            "description": self.description.as_deref().and_then(rich_text::from_plain_text),
            "latitude": self.latitude,
            "longitude": self.longitude,
            "radius_miles": self.radius,
        })))
    }
}

impl LegacyRecord for PropertyRecord {
    const KIND: EntityKind = EntityKind::Property;

    fn legacy_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_payload(&self, ids: &IdentifierMap) -> Result<Value, UnresolvedReference> {
        // A destination outside the migrated set is dropped, not an error.
        let destination = self
            .destination_id
            .and_then(|id| ids.get(EntityKind::Destination, id))
            .map(TargetId::as_str);

        let state = non_blank(self.state.as_deref()).or(non_blank(self.state_code.as_deref()));

        Ok(without_nulls(json!({
            "legacy_id": self.id,
            "name": self.name.trim(),
            "slug": slug_or_derived(self.slug.as_deref(), &self.name),
            "tagline": non_blank(self.tagline.as_deref()),
            "description": self.description.as_deref().and_then(rich_text::from_plain_text),
            "star_rating": self.star_rating,
            "destination": destination,
            "location": {
                "address": non_blank(self.address_line1.as_deref()),
                "city": non_blank(self.city.as_deref()),
                "state": state,
                "postal_code": non_blank(self.postal_code.as_deref()),
                "latitude": self.latitude,
                "longitude": self.longitude,
            },
            "rental": {
                "enabled": flag(self.rental_enabled),
                "lowest_price": self.rental_lowest_price,
                "check_in_time": non_blank(self.check_in_time.as_deref()),
                "check_out_time": non_blank(self.check_out_time.as_deref()),
                "pets_allowed": flag(self.pets_allowed),
            },
        })))
    }
}

impl LegacyRecord for ResidenceRecord {
    const KIND: EntityKind = EntityKind::Residence;

    fn legacy_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_payload(&self, ids: &IdentifierMap) -> Result<Value, UnresolvedReference> {
        let property = ids
            .get(EntityKind::Property, self.property_id)
            .ok_or(UnresolvedReference {
                kind: EntityKind::Property,
                legacy_id: self.property_id,
            })?;

        Ok(without_nulls(json!({
            "legacy_id": self.id,
            "property": property.as_str(),
            "name": self.name.trim(),
            "slug": non_blank(self.slug.as_deref()),
            "description": self.description.as_deref().and_then(rich_text::from_plain_text),
            "bedrooms": parse_count(self.number_of_bedrooms.as_deref()),
            "bathrooms": parse_count(self.number_of_bathrooms.as_deref()),
            "max_occupancy": parse_count(self.sleep_quantity.as_deref()),
            "square_footage": non_blank(self.square_footage.as_deref()),
            "kitchen_type": classify_kitchen(self.kitchen_type.as_deref()).map(KitchenType::as_str),
            "for_rental": true,
        })))
    }
}

/// Drop null members of every object, recursively.
fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(without_nulls).collect()),
        other => other,
    }
}

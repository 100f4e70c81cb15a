// Legacy MySQL reading functions
use bigdecimal::{BigDecimal, ToPrimitive};
use futures::StreamExt;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;

use crate::config::{
    AMENITY_LIMIT, DESTINATION_LIMIT, PROPERTY_AMENITY_LIMIT, PROPERTY_LIMIT, RESIDENCE_LIMIT,
};
use crate::errors::SourceError;
use crate::legacy::{LegacySource, LegacyTable, RowStream};
use crate::models::{
    AmenityRecord, DestinationRecord, PropertyAmenityRecord, PropertyRecord, ResidenceRecord,
};

// Integer, decimal and time columns are cast so their wire types do not
// depend on the legacy column definitions. Every ORDER BY ends on the primary
// key so reruns see rows in the same order.

const AMENITIES_QUERY: &str = "
    SELECT CAST(id AS SIGNED) AS id, name, slug,
           CAST(featured AS SIGNED) AS featured,
           CAST(sequence AS SIGNED) AS sequence
    FROM amenity
    WHERE is_filterable_rental = 1
    ORDER BY sequence, id
    LIMIT ?";

const DESTINATIONS_QUERY: &str = "
    SELECT CAST(d.id AS SIGNED) AS id, d.name, d.slug, d.description,
           CAST(d.radius AS DECIMAL(10,2)) AS radius,
           CAST(a.latitude AS DECIMAL(10,7)) AS latitude,
           CAST(a.longitude AS DECIMAL(10,7)) AS longitude
    FROM destination d
    LEFT JOIN address a ON d.address_id = a.id
    WHERE d.rental_enabled = 1 AND d.is_searchable = 1
    ORDER BY d.name, d.id
    LIMIT ?";

const PROPERTIES_QUERY: &str = "
    SELECT CAST(p.id AS SIGNED) AS id, p.name, p.slug, p.tagline, p.description,
           CAST(p.destination_id AS SIGNED) AS destination_id,
           CAST(p.star_rating AS DECIMAL(4,2)) AS star_rating,
           CAST(p.rental_enabled AS SIGNED) AS rental_enabled,
           CAST(p.rental_lowest_price AS DECIMAL(12,2)) AS rental_lowest_price,
           CAST(p.check_in_time AS CHAR) AS check_in_time,
           CAST(p.check_out_time AS CHAR) AS check_out_time,
           CAST(p.pets_allowed AS SIGNED) AS pets_allowed,
           a.address_line1, a.city, s.name AS state, s.code AS state_code,
           CAST(a.postal_code AS CHAR) AS postal_code,
           CAST(a.latitude AS DECIMAL(10,7)) AS latitude,
           CAST(a.longitude AS DECIMAL(10,7)) AS longitude
    FROM property p
    LEFT JOIN address a ON p.address_id = a.id
    LEFT JOIN state s ON a.state_id = s.id
    WHERE p.rental_enabled = 1
    ORDER BY p.name, p.id
    LIMIT ?";

// MySQL rejects LIMIT inside an IN subquery, hence the derived table. It
// selects the same properties as PROPERTIES_QUERY.
const PROPERTY_AMENITIES_QUERY: &str = "
    SELECT DISTINCT CAST(pa.property_id AS SIGNED) AS property_id,
           CAST(pa.amenity_id AS SIGNED) AS amenity_id
    FROM property_amenity pa
    WHERE pa.property_id IN (
        SELECT rental.id FROM (
            SELECT p.id FROM property p
            WHERE p.rental_enabled = 1
            ORDER BY p.name, p.id
            LIMIT ?
        ) AS rental
    )
    ORDER BY property_id, amenity_id
    LIMIT ?";

const RESIDENCES_QUERY: &str = "
    SELECT CAST(pr.id AS SIGNED) AS id,
           CAST(pr.property_id AS SIGNED) AS property_id,
           pr.name, pr.slug, pr.description,
           CAST(pr.number_of_bedrooms AS CHAR) AS number_of_bedrooms,
           CAST(pr.number_of_bathrooms AS CHAR) AS number_of_bathrooms,
           CAST(pr.sleep_quantity AS CHAR) AS sleep_quantity,
           CAST(pr.square_footage AS CHAR) AS square_footage,
           kt.name AS kitchen_type
    FROM property_residence pr
    LEFT JOIN kitchen_type kt ON pr.kitchen_type_id = kt.id
    WHERE pr.for_rental = 1
      AND pr.property_id IN (
        SELECT rental.id FROM (
            SELECT p.id FROM property p
            WHERE p.rental_enabled = 1
            ORDER BY p.name, p.id
            LIMIT ?
        ) AS rental
      )
    ORDER BY pr.property_id, pr.name, pr.id
    LIMIT ?";

type Decoder<T> = fn(&MySqlRow) -> Result<T, SourceError>;

/// [`LegacySource`] backed by the Vacatia MySQL database.
pub struct MySqlLegacySource {
    pool: MySqlPool,
}

impl MySqlLegacySource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn stream<'a, T: Send + 'a>(
        &'a self,
        sql: &'static str,
        limits: &[i64],
        decode: Decoder<T>,
    ) -> RowStream<'a, T> {
        let mut query = sqlx::query(sql);
        for limit in limits {
            query = query.bind(*limit);
        }

        query
            .fetch(&self.pool)
            .map(move |row: Result<MySqlRow, sqlx::Error>| -> Result<T, SourceError> {
                decode(&row?)
            })
            .boxed()
    }
}

impl LegacySource for MySqlLegacySource {
    fn amenities(&self) -> RowStream<'_, AmenityRecord> {
        self.stream(AMENITIES_QUERY, &[AMENITY_LIMIT], decode_amenity)
    }

    fn destinations(&self) -> RowStream<'_, DestinationRecord> {
        self.stream(DESTINATIONS_QUERY, &[DESTINATION_LIMIT], decode_destination)
    }

    fn properties(&self) -> RowStream<'_, PropertyRecord> {
        self.stream(PROPERTIES_QUERY, &[PROPERTY_LIMIT], decode_property)
    }

    fn property_amenities(&self) -> RowStream<'_, PropertyAmenityRecord> {
        self.stream(
            PROPERTY_AMENITIES_QUERY,
            &[PROPERTY_LIMIT, PROPERTY_AMENITY_LIMIT],
            decode_property_amenity,
        )
    }

    fn residences(&self) -> RowStream<'_, ResidenceRecord> {
        self.stream(
            RESIDENCES_QUERY,
            &[PROPERTY_LIMIT, RESIDENCE_LIMIT],
            decode_residence,
        )
    }
}

fn decode_amenity(row: &MySqlRow) -> Result<AmenityRecord, SourceError> {
    let table = LegacyTable::Amenity;
    let id = required_id(row, table, "id", None)?;

    Ok(AmenityRecord {
        id,
        name: required_text(row, table, "name", id)?,
        slug: row.try_get("slug")?,
        featured: row.try_get("featured")?,
        sequence: row.try_get("sequence")?,
    })
}

fn decode_destination(row: &MySqlRow) -> Result<DestinationRecord, SourceError> {
    let table = LegacyTable::Destination;
    let id = required_id(row, table, "id", None)?;

    Ok(DestinationRecord {
        id,
        name: required_text(row, table, "name", id)?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        radius: decimal(row, "radius")?,
        latitude: decimal(row, "latitude")?,
        longitude: decimal(row, "longitude")?,
    })
}

fn decode_property(row: &MySqlRow) -> Result<PropertyRecord, SourceError> {
    let table = LegacyTable::Property;
    let id = required_id(row, table, "id", None)?;

    Ok(PropertyRecord {
        id,
        name: required_text(row, table, "name", id)?,
        slug: row.try_get("slug")?,
        tagline: row.try_get("tagline")?,
        description: row.try_get("description")?,
        destination_id: row.try_get("destination_id")?,
        star_rating: decimal(row, "star_rating")?,
        rental_enabled: row.try_get("rental_enabled")?,
        rental_lowest_price: decimal(row, "rental_lowest_price")?,
        check_in_time: row.try_get("check_in_time")?,
        check_out_time: row.try_get("check_out_time")?,
        pets_allowed: row.try_get("pets_allowed")?,
        address_line1: row.try_get("address_line1")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        state_code: row.try_get("state_code")?,
        postal_code: row.try_get("postal_code")?,
        latitude: decimal(row, "latitude")?,
        longitude: decimal(row, "longitude")?,
    })
}

fn decode_property_amenity(row: &MySqlRow) -> Result<PropertyAmenityRecord, SourceError> {
    let table = LegacyTable::PropertyAmenity;
    let property_id = required_id(row, table, "property_id", None)?;

    Ok(PropertyAmenityRecord {
        property_id,
        amenity_id: required_id(row, table, "amenity_id", Some(property_id))?,
    })
}

fn decode_residence(row: &MySqlRow) -> Result<ResidenceRecord, SourceError> {
    let table = LegacyTable::Residence;
    let id = required_id(row, table, "id", None)?;

    Ok(ResidenceRecord {
        id,
        property_id: required_id(row, table, "property_id", Some(id))?,
        name: required_text(row, table, "name", id)?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        number_of_bedrooms: row.try_get("number_of_bedrooms")?,
        number_of_bathrooms: row.try_get("number_of_bathrooms")?,
        sleep_quantity: row.try_get("sleep_quantity")?,
        square_footage: row.try_get("square_footage")?,
        kitchen_type: row.try_get("kitchen_type")?,
    })
}

fn required_id(
    row: &MySqlRow,
    table: LegacyTable,
    column: &'static str,
    legacy_id: Option<i64>,
) -> Result<i64, SourceError> {
    row.try_get::<Option<i64>, _>(column)?
        .ok_or_else(|| SourceError::malformed(table.name(), legacy_id, column))
}

fn required_text(
    row: &MySqlRow,
    table: LegacyTable,
    column: &'static str,
    legacy_id: i64,
) -> Result<String, SourceError> {
    row.try_get::<Option<String>, _>(column)?
        .ok_or_else(|| SourceError::malformed(table.name(), Some(legacy_id), column))
}

fn decimal(row: &MySqlRow, column: &str) -> Result<Option<f64>, SourceError> {
    let value: Option<BigDecimal> = row.try_get(column)?;
    Ok(value.and_then(|d| d.to_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_query_is_bounded_and_ordered() {
        for query in [
            AMENITIES_QUERY,
            DESTINATIONS_QUERY,
            PROPERTIES_QUERY,
            PROPERTY_AMENITIES_QUERY,
            RESIDENCES_QUERY,
        ] {
            assert!(query.contains("ORDER BY"), "{}", query);
            assert!(query.trim_end().ends_with("LIMIT ?"), "{}", query);
        }
    }

    #[test]
    fn test_placeholder_counts_match_bound_limits() {
        let placeholders = |query: &str| query.matches('?').count();
        assert_eq!(placeholders(AMENITIES_QUERY), 1);
        assert_eq!(placeholders(DESTINATIONS_QUERY), 1);
        assert_eq!(placeholders(PROPERTIES_QUERY), 1);
        assert_eq!(placeholders(PROPERTY_AMENITIES_QUERY), 2);
        assert_eq!(placeholders(RESIDENCES_QUERY), 2);
    }

    #[test]
    fn test_availability_filters() {
        assert!(AMENITIES_QUERY.contains("is_filterable_rental = 1"));
        assert!(DESTINATIONS_QUERY.contains("d.rental_enabled = 1 AND d.is_searchable = 1"));
        assert!(PROPERTIES_QUERY.contains("p.rental_enabled = 1"));
        assert!(RESIDENCES_QUERY.contains("pr.for_rental = 1"));
    }

    #[test]
    fn test_star_rating_keeps_two_decimals() {
        // 4.25 must not be rounded to 4.3 on the wire
        assert!(PROPERTIES_QUERY.contains("CAST(p.star_rating AS DECIMAL(4,2))"));
        assert!(!PROPERTIES_QUERY.contains("DECIMAL(3,1)"));
    }
}

//! In-memory legacy source for testing and local development.
//!
//! `InMemorySource` serves pre-built records in the order they were given,
//! and can append malformed rows or fail a table outright to exercise the
//! migration's error handling without a MySQL server.
//!
//! # Example
//!
//! ```ignore
//! use seed_migrate::legacy::{InMemorySource, LegacyTable};
//!
//! let source = InMemorySource::new()
//!     .with_amenities(vec![pool, gym])
//!     .with_malformed_row(LegacyTable::Amenity, Some(3), "name")
//!     .with_connection_failure(LegacyTable::Residence);
//! ```

use futures::stream::{self, StreamExt};

use crate::errors::SourceError;
use crate::legacy::{LegacySource, LegacyTable, RowStream};
use crate::models::{
    AmenityRecord, DestinationRecord, PropertyAmenityRecord, PropertyRecord, ResidenceRecord,
};

#[derive(Debug, Clone)]
struct MalformedRow {
    table: LegacyTable,
    legacy_id: Option<i64>,
    column: &'static str,
}

/// [`LegacySource`] serving records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    amenities: Vec<AmenityRecord>,
    destinations: Vec<DestinationRecord>,
    properties: Vec<PropertyRecord>,
    property_amenities: Vec<PropertyAmenityRecord>,
    residences: Vec<ResidenceRecord>,
    malformed: Vec<MalformedRow>,
    failing: Option<LegacyTable>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amenities(mut self, records: Vec<AmenityRecord>) -> Self {
        self.amenities = records;
        self
    }

    pub fn with_destinations(mut self, records: Vec<DestinationRecord>) -> Self {
        self.destinations = records;
        self
    }

    pub fn with_properties(mut self, records: Vec<PropertyRecord>) -> Self {
        self.properties = records;
        self
    }

    pub fn with_property_amenities(mut self, records: Vec<PropertyAmenityRecord>) -> Self {
        self.property_amenities = records;
        self
    }

    pub fn with_residences(mut self, records: Vec<ResidenceRecord>) -> Self {
        self.residences = records;
        self
    }

    /// Append a row lacking `column` to the end of `table`'s stream.
    pub fn with_malformed_row(
        mut self,
        table: LegacyTable,
        legacy_id: Option<i64>,
        column: &'static str,
    ) -> Self {
        self.malformed.push(MalformedRow {
            table,
            legacy_id,
            column,
        });
        self
    }

    /// Make reading `table` fail as if the connection had been lost.
    pub fn with_connection_failure(mut self, table: LegacyTable) -> Self {
        self.failing = Some(table);
        self
    }

    fn serve<T: Clone + Send + 'static>(
        &self,
        table: LegacyTable,
        records: &[T],
    ) -> RowStream<'_, T> {
        if self.failing == Some(table) {
            let err = SourceError::Connection(format!("lost connection reading {}", table.name()));
            return stream::iter(vec![Err(err)]).boxed();
        }

        let malformed = self
            .malformed
            .iter()
            .filter(|row| row.table == table)
            .map(|row| {
                Err(SourceError::malformed(
                    row.table.name(),
                    row.legacy_id,
                    row.column,
                ))
            });

        let rows: Vec<Result<T, SourceError>> =
            records.iter().cloned().map(Ok).chain(malformed).collect();
        stream::iter(rows).boxed()
    }
}

impl LegacySource for InMemorySource {
    fn amenities(&self) -> RowStream<'_, AmenityRecord> {
        self.serve(LegacyTable::Amenity, &self.amenities)
    }

    fn destinations(&self) -> RowStream<'_, DestinationRecord> {
        self.serve(LegacyTable::Destination, &self.destinations)
    }

    fn properties(&self) -> RowStream<'_, PropertyRecord> {
        self.serve(LegacyTable::Property, &self.properties)
    }

    fn property_amenities(&self) -> RowStream<'_, PropertyAmenityRecord> {
        self.serve(LegacyTable::PropertyAmenity, &self.property_amenities)
    }

    fn residences(&self) -> RowStream<'_, ResidenceRecord> {
        self.serve(LegacyTable::Residence, &self.residences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_records_then_malformed_rows() {
        let source = InMemorySource::new()
            .with_amenities(vec![AmenityRecord {
                id: 1,
                name: "Pool".to_string(),
                ..Default::default()
            }])
            .with_malformed_row(LegacyTable::Amenity, Some(2), "name")
            .with_malformed_row(LegacyTable::Property, Some(9), "name");

        let rows: Vec<_> = source.amenities().collect().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().name, "Pool");
        assert!(matches!(
            rows[1],
            Err(SourceError::MalformedRow { legacy_id: Some(2), .. })
        ));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let source = InMemorySource::new().with_connection_failure(LegacyTable::Residence);

        let rows: Vec<_> = source.residences().collect().await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].as_ref().unwrap_err().is_fatal());

        let rows: Vec<_> = source.amenities().collect().await;
        assert!(rows.is_empty());
    }
}

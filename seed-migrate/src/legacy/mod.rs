// Legacy module - database connection and row extraction
pub mod connection;
pub mod mock;
pub mod reader;

use futures::stream::BoxStream;

use crate::errors::SourceError;
use crate::models::{
    AmenityRecord, DestinationRecord, PropertyAmenityRecord, PropertyRecord, ResidenceRecord,
};

pub use connection::connect;
pub use mock::InMemorySource;
pub use reader::MySqlLegacySource;

/// Lazily polled rows of one phase query. Not restartable.
pub type RowStream<'a, T> = BoxStream<'a, Result<T, SourceError>>;

/// Legacy tables (or joins) read by the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyTable {
    Amenity,
    Destination,
    Property,
    PropertyAmenity,
    Residence,
}

impl LegacyTable {
    pub fn name(self) -> &'static str {
        match self {
            LegacyTable::Amenity => "amenity",
            LegacyTable::Destination => "destination",
            LegacyTable::Property => "property",
            LegacyTable::PropertyAmenity => "property_amenity",
            LegacyTable::Residence => "property_residence",
        }
    }
}

/// Source of legacy rows, one bounded and deterministically ordered query
/// per phase.
///
/// A connection or query failure is reported as a fatal [`SourceError`] item
/// of the stream; a row that cannot be decoded is reported as a non-fatal
/// item and the stream continues.
pub trait LegacySource: Send + Sync {
    /// Filterable rental amenities, by display sequence.
    fn amenities(&self) -> RowStream<'_, AmenityRecord>;

    /// Searchable rental destinations with their coordinates, by name.
    fn destinations(&self) -> RowStream<'_, DestinationRecord>;

    /// Rental-enabled properties with address and state, by name.
    fn properties(&self) -> RowStream<'_, PropertyRecord>;

    /// Distinct property/amenity pairs of rental-enabled properties, by property.
    fn property_amenities(&self) -> RowStream<'_, PropertyAmenityRecord>;

    /// Rentable residences of rental-enabled properties, by property then name.
    fn residences(&self) -> RowStream<'_, ResidenceRecord>;
}

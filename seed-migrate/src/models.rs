// Typed legacy records, one per source query

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmenityRecord {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub featured: Option<i64>,
    pub sequence: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationRecord {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub radius: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub destination_id: Option<i64>,
    pub star_rating: Option<f64>,
    pub rental_enabled: Option<i64>,
    pub rental_lowest_price: Option<f64>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub pets_allowed: Option<i64>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the property/amenity junction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyAmenityRecord {
    pub property_id: i64,
    pub amenity_id: i64,
}

/// A rentable unit. Counts are kept as the raw legacy text because the
/// legacy columns hold values like "Studio" or "2.5".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidenceRecord {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub number_of_bedrooms: Option<String>,
    pub number_of_bathrooms: Option<String>,
    pub sleep_quantity: Option<String>,
    pub square_footage: Option<String>,
    pub kitchen_type: Option<String>,
}

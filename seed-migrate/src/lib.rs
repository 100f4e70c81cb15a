//! # Seed Migrate
//!
//! Seeds the Payload CMS content model from the legacy Vacatia MySQL schema.
//!
//! The run is split in five phases executed in dependency order by
//! [`MigrationExecutor`]: amenities, destinations, properties, property
//! amenity links and residences. Legacy ids are translated to store-assigned
//! ids through an [`IdentifierMap`] that lives for one run only.

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod legacy;
pub mod migration;
pub mod models;
pub mod transform;

pub use config::SeedConfig;
pub use errors::{ConfigError, MigrationError, SourceError};
pub use identifiers::{EntityKind, IdentifierMap, TargetId};
pub use migration::{MigrationExecutor, MigrationSummary, Phase};

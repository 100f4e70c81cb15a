// Migration module - phase orchestration, entity import and relationship linking
pub mod executor;
pub mod importer;
pub mod linker;
pub mod report;

pub use executor::{MigrationExecutor, Phase};
pub use importer::{EntityImporter, ImportOutcome};
pub use linker::{group_by_parent, LinkGroup, LinkTarget, RelationshipLinker};
pub use report::{LinkReport, MappedCounts, MigrationSummary, PhaseReport};

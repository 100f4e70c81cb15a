//! Per-phase counters and the final run summary.
use std::time::Duration;

use tracing::info;

use crate::identifiers::{EntityKind, IdentifierMap};
use crate::migration::importer::ImportOutcome;

/// Counters of an entity import phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseReport {
    pub created: usize,
    pub duplicates: usize,
    pub unresolved: usize,
    pub failed: usize,
    /// Rows rejected while decoding, before transformation.
    pub malformed: usize,
}

impl PhaseReport {
    pub fn record(&mut self, outcome: &ImportOutcome) {
        match outcome {
            ImportOutcome::Created(_) => self.created += 1,
            ImportOutcome::Duplicate => self.duplicates += 1,
            ImportOutcome::Unresolved => self.unresolved += 1,
            ImportOutcome::Failed => self.failed += 1,
        }
    }

    /// Rows that did not produce an entity.
    pub fn skipped(&self) -> usize {
        self.duplicates + self.unresolved + self.failed + self.malformed
    }
}

/// Counters of a relationship linking phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Parents whose relationship field was written.
    pub linked: usize,
    /// Groups skipped because the parent was not mapped.
    pub unresolved_parents: usize,
    /// Groups skipped because none of the children were mapped.
    pub empty: usize,
    /// Children left out of a written relationship.
    pub dropped_children: usize,
    pub failed: usize,
    pub malformed: usize,
}

/// Final identifier map sizes, i.e. entities created in this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappedCounts {
    pub amenities: usize,
    pub destinations: usize,
    pub properties: usize,
    pub residences: usize,
}

impl MappedCounts {
    pub fn from_map(ids: &IdentifierMap) -> Self {
        Self {
            amenities: ids.len(EntityKind::Amenity),
            destinations: ids.len(EntityKind::Destination),
            properties: ids.len(EntityKind::Property),
            residences: ids.len(EntityKind::Residence),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    pub amenities: PhaseReport,
    pub destinations: PhaseReport,
    pub properties: PhaseReport,
    pub property_amenities: LinkReport,
    pub residences: PhaseReport,
    pub mapped: MappedCounts,
    pub elapsed: Duration,
}

impl MigrationSummary {
    /// Total number of rows that did not make it into the store.
    pub fn skipped(&self) -> usize {
        self.amenities.skipped()
            + self.destinations.skipped()
            + self.properties.skipped()
            + self.residences.skipped()
    }

    pub fn log(&self) {
        info!("\n=== Seed Complete ===");
        info!("Total time: {:.2}s", self.elapsed.as_secs_f64());
        info!("Amenities:    {}", self.mapped.amenities);
        info!("Destinations: {}", self.mapped.destinations);
        info!("Properties:   {}", self.mapped.properties);
        info!("Residences:   {}", self.mapped.residences);
        info!(
            "Linked amenities for {} properties",
            self.property_amenities.linked
        );
        info!(
            skipped = self.skipped(),
            duplicates = self.amenities.duplicates
                + self.destinations.duplicates
                + self.properties.duplicates
                + self.residences.duplicates,
            "Rows not imported"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::TargetId;

    #[test]
    fn test_phase_report_counts_outcomes() {
        let mut report = PhaseReport::default();
        report.record(&ImportOutcome::Created(TargetId::from("1")));
        report.record(&ImportOutcome::Created(TargetId::from("2")));
        report.record(&ImportOutcome::Duplicate);
        report.record(&ImportOutcome::Failed);
        report.malformed += 1;

        assert_eq!(report.created, 2);
        assert_eq!(report.skipped(), 3);
    }

    #[test]
    fn test_mapped_counts() {
        let mut ids = IdentifierMap::new();
        ids.set(EntityKind::Amenity, 1, TargetId::from("a"));
        ids.set(EntityKind::Amenity, 2, TargetId::from("b"));
        ids.set(EntityKind::Residence, 1, TargetId::from("r"));

        let counts = MappedCounts::from_map(&ids);
        assert_eq!(
            counts,
            MappedCounts {
                amenities: 2,
                destinations: 0,
                properties: 0,
                residences: 1,
            }
        );
    }
}

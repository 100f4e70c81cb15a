// Migration executor - orchestrates the five seed phases
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use seed_migrate_repository::ContentStore;
use tracing::{info, warn};

use crate::errors::MigrationError;
use crate::identifiers::IdentifierMap;
use crate::legacy::{LegacySource, RowStream};
use crate::migration::importer::EntityImporter;
use crate::migration::linker::{group_by_parent, LinkTarget, RelationshipLinker};
use crate::migration::report::{LinkReport, MappedCounts, MigrationSummary, PhaseReport};
use crate::transform::LegacyRecord;

/// Seed phases, in execution order.
///
/// Links and residences need properties mapped, links also need amenities,
/// and properties optionally reference destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Amenities,
    Destinations,
    Properties,
    PropertyAmenityLinks,
    Residences,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Amenities,
        Phase::Destinations,
        Phase::Properties,
        Phase::PropertyAmenityLinks,
        Phase::Residences,
    ];

    pub fn number(self) -> usize {
        match self {
            Phase::Amenities => 1,
            Phase::Destinations => 2,
            Phase::Properties => 3,
            Phase::PropertyAmenityLinks => 4,
            Phase::Residences => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Amenities => "amenities",
            Phase::Destinations => "destinations",
            Phase::Properties => "properties",
            Phase::PropertyAmenityLinks => "property amenities",
            Phase::Residences => "residences",
        }
    }
}

/// Migration executor that coordinates the seed process
pub struct MigrationExecutor {
    source: Arc<dyn LegacySource>,
    importer: EntityImporter,
    linker: RelationshipLinker,
}

impl MigrationExecutor {
    /// Create a new migration executor
    pub fn new(source: Arc<dyn LegacySource>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            source,
            importer: EntityImporter::new(store.clone()),
            linker: RelationshipLinker::new(store),
        }
    }

    /// Execute all phases in order.
    ///
    /// The identifier map is created here and dropped when the run ends.
    /// Returns an error only for fatal failures (source or store
    /// unreachable); rows skipped along the way are reported in the summary.
    pub async fn execute(&self) -> Result<MigrationSummary, MigrationError> {
        let start_time = Instant::now();
        let mut ids = IdentifierMap::new();

        let amenities = self
            .import_phase(Phase::Amenities, &mut ids, self.source.amenities())
            .await?;
        let destinations = self
            .import_phase(Phase::Destinations, &mut ids, self.source.destinations())
            .await?;
        let properties = self
            .import_phase(Phase::Properties, &mut ids, self.source.properties())
            .await?;
        let property_amenities = self.link_property_amenities(&ids).await?;
        let residences = self
            .import_phase(Phase::Residences, &mut ids, self.source.residences())
            .await?;

        Ok(MigrationSummary {
            amenities,
            destinations,
            properties,
            property_amenities,
            residences,
            mapped: MappedCounts::from_map(&ids),
            elapsed: start_time.elapsed(),
        })
    }

    async fn import_phase<R>(
        &self,
        phase: Phase,
        ids: &mut IdentifierMap,
        mut rows: RowStream<'_, R>,
    ) -> Result<PhaseReport, MigrationError>
    where
        R: LegacyRecord,
    {
        log_phase_start(phase);
        let started = Instant::now();
        let mut report = PhaseReport::default();

        while let Some(row) = rows.next().await {
            let record = match row {
                Ok(record) => record,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!(phase = phase.label(), error = %e, "⚠ Skipping malformed row");
                    report.malformed += 1;
                    continue;
                }
            };

            let outcome = self.importer.import(ids, &record).await?;
            report.record(&outcome);
        }

        info!(
            phase = phase.label(),
            duplicates = report.duplicates,
            unresolved = report.unresolved,
            failed = report.failed,
            malformed = report.malformed,
            elapsed = ?started.elapsed(),
            "  ✓ Imported {} {}",
            report.created,
            phase.label()
        );
        Ok(report)
    }

    async fn link_property_amenities(
        &self,
        ids: &IdentifierMap,
    ) -> Result<LinkReport, MigrationError> {
        let phase = Phase::PropertyAmenityLinks;
        log_phase_start(phase);
        let started = Instant::now();

        let mut pairs = Vec::new();
        let mut malformed = 0;
        let mut rows = self.source.property_amenities();
        while let Some(row) = rows.next().await {
            match row {
                Ok(pair) => pairs.push((pair.property_id, pair.amenity_id)),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!(phase = phase.label(), error = %e, "⚠ Skipping malformed row");
                    malformed += 1;
                }
            }
        }
        drop(rows);

        let groups = group_by_parent(pairs);
        let mut report = self
            .linker
            .link(ids, LinkTarget::PROPERTY_AMENITIES, &groups)
            .await?;
        report.malformed = malformed;

        info!(
            phase = phase.label(),
            unresolved_parents = report.unresolved_parents,
            dropped_children = report.dropped_children,
            failed = report.failed,
            elapsed = ?started.elapsed(),
            "  ✓ Linked amenities for {} properties",
            report.linked
        );
        Ok(report)
    }
}

fn log_phase_start(phase: Phase) {
    info!(
        "📦 Phase {}/{}: {}",
        phase.number(),
        Phase::ALL.len(),
        phase.label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let numbers: Vec<usize> = Phase::ALL.iter().map(|p| p.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(Phase::ALL[3], Phase::PropertyAmenityLinks);
        assert_eq!(Phase::ALL[4], Phase::Residences);
    }
}

//! The full layout pipeline for one snapshot.
//!
//! index → generations → layered positions → manual resolution → connectors.
//! Pure and synchronous: identical input yields identical output.

use serde::Serialize;

use crate::config::TreeConfig;
use crate::graph::RelationshipIndex;
use crate::model::{Person, PersonId, PositionMap, Relationship};

use super::connectors::{Connector, ConnectorBuilder};
use super::generation::GenerationAssignment;
use super::layered::LayeredLayout;
use super::positions::{resolve_positions, ResolvedPositions};

/// Non-fatal anomalies found during a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutWarnings {
    /// People used as traversal seeds without being parentless.
    pub synthetic_roots: Vec<PersonId>,
    /// People with no resolved position (not drawn).
    pub unplaced: Vec<PersonId>,
    /// Self-relationships dropped by the index.
    pub skipped_relationships: Vec<String>,
    /// Parent edges form a cycle.
    pub lineage_cycle: bool,
}

impl LayoutWarnings {
    /// Whether the pass was clean.
    pub fn is_empty(&self) -> bool {
        self.synthetic_roots.is_empty()
            && self.unplaced.is_empty()
            && self.skipped_relationships.is_empty()
            && !self.lineage_cycle
    }
}

/// Output of one layout pass.
#[derive(Debug)]
pub struct LayoutPass {
    /// Adjacency built from the relationships.
    pub index: RelationshipIndex,
    /// Generation buckets.
    pub generations: GenerationAssignment,
    /// Final positions.
    pub positions: ResolvedPositions,
    /// Connector geometry over the final positions.
    pub connectors: Vec<Connector>,
    /// Anomalies.
    pub warnings: LayoutWarnings,
}

impl LayoutPass {
    /// Run the pipeline.
    pub fn run(
        people: &[Person],
        relationships: &[Relationship],
        manual: &PositionMap,
        config: &TreeConfig,
    ) -> Self {
        let index = RelationshipIndex::build(relationships);
        let generations = GenerationAssignment::assign(people, &index);
        let computed = LayeredLayout::new(config.layout.clone()).compute(&generations);
        let positions = resolve_positions(&computed, manual, config.position_mode);
        let connectors = ConnectorBuilder::new(&positions.positions, &index, &config.layout)
            .build(&positions.order);

        let lineage_cycle = index.has_lineage_cycle();
        if lineage_cycle {
            log::warn!("parent relationships contain a cycle");
        }

        let warnings = LayoutWarnings {
            synthetic_roots: generations.synthetic_roots().to_vec(),
            unplaced: positions.unplaced.clone(),
            skipped_relationships: index.skipped_relationships().to_vec(),
            lineage_cycle,
        };

        log::debug!(
            "layout pass: {} people, {} generations, {} connectors",
            positions.order.len(),
            generations.buckets().len(),
            connectors.len()
        );

        Self {
            index,
            generations,
            positions,
            connectors,
            warnings,
        }
    }
}

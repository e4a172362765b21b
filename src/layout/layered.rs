//! Layered generational layout.
//!
//! Turns generation buckets into card coordinates. Each generation is one row:
//!
//! - `total_width = count * (card_width + gutter)`
//! - cards run left to right from `x = -total_width / 2`
//! - `y = generation * row_height + top_margin`
//!
//! Rows are centered on x = 0 independently of each other, so a row is not
//! aligned under its parents. Positions are card top-left corners.

use crate::config::LayoutConfig;
use crate::model::{PersonId, Position, PositionMap};

use super::generation::GenerationAssignment;

/// Result of the layered layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredResult {
    /// Person → top-left card corner.
    pub positions: PositionMap,
    /// People in placement order: generation ascending, then row order.
    pub order: Vec<PersonId>,
}

impl LayeredResult {
    /// Number of people placed.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The layered layout engine.
pub struct LayeredLayout {
    config: LayoutConfig,
}

impl LayeredLayout {
    /// Create a new layered layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layered layout with default spacing.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// Spacing in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Y coordinate of a generation row.
    pub fn row_y(&self, generation: u32) -> f32 {
        generation as f32 * self.config.row_height + self.config.top_margin
    }

    /// Compute positions for every assigned person.
    pub fn compute(&self, assignment: &GenerationAssignment) -> LayeredResult {
        let mut result = LayeredResult {
            positions: PositionMap::new(),
            order: Vec::with_capacity(assignment.len()),
        };

        let pitch = self.config.card_width + self.config.gutter;

        for (&generation, members) in assignment.buckets() {
            let total_width = members.len() as f32 * pitch;
            let start_x = -total_width / 2.0;
            let y = self.row_y(generation);

            for (slot, id) in members.iter().enumerate() {
                let x = start_x + slot as f32 * pitch;
                result.positions.insert(id.clone(), Position::new(x, y));
                result.order.push(id.clone());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipIndex;
    use crate::model::{Person, Relationship};

    fn layout(ids: &[&str], rels: &[Relationship]) -> LayeredResult {
        let people: Vec<Person> = ids.iter().map(|id| Person::named(*id, *id)).collect();
        let index = RelationshipIndex::build(rels);
        let assignment = GenerationAssignment::assign(&people, &index);
        LayeredLayout::new(LayoutConfig {
            card_width: 100.0,
            card_height: 50.0,
            row_height: 200.0,
            gutter: 20.0,
            top_margin: 10.0,
        })
        .compute(&assignment)
    }

    fn pos(result: &LayeredResult, id: &str) -> Position {
        result.positions[&PersonId::new(id)]
    }

    #[test]
    fn test_empty() {
        let result = layout(&[], &[]);
        assert!(result.is_empty());
        assert!(result.positions.is_empty());
    }

    #[test]
    fn test_single_person_row_centered() {
        let result = layout(&["A"], &[]);
        // total = 1 * 120, start = -60
        assert_eq!(pos(&result, "A"), Position::new(-60.0, 10.0));
    }

    #[test]
    fn test_rows_centered_independently() {
        let result = layout(
            &["A", "B", "C"],
            &[
                Relationship::spouse("r1", "A", "B"),
                Relationship::parent("r2", "A", "C"),
            ],
        );

        // Row 0: A, B → total 240, start -120
        assert_eq!(pos(&result, "A"), Position::new(-120.0, 10.0));
        assert_eq!(pos(&result, "B"), Position::new(0.0, 10.0));
        // Row 1: C alone, not under the couple's midpoint
        assert_eq!(pos(&result, "C"), Position::new(-60.0, 210.0));

        let ids: Vec<&str> = result.order.iter().map(PersonId::as_str).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn test_input_order_changes_layout() {
        let forward = layout(&["A", "B"], &[]);
        let reversed = layout(&["B", "A"], &[]);

        assert_ne!(pos(&forward, "A"), pos(&reversed, "A"));
        assert_eq!(pos(&forward, "A"), pos(&reversed, "B"));
    }

    #[test]
    fn test_deterministic() {
        let rels = [
            Relationship::spouse("r1", "A", "B"),
            Relationship::parent("r2", "A", "C"),
            Relationship::parent("r3", "A", "D"),
        ];
        let first = layout(&["A", "B", "C", "D"], &rels);
        let second = layout(&["A", "B", "C", "D"], &rels);
        assert_eq!(first, second);
    }

    #[test]
    fn test_row_y() {
        let engine = LayeredLayout::with_defaults();
        let config = engine.config().clone();
        assert_eq!(engine.row_y(0), config.top_margin);
        assert_eq!(engine.row_y(2), 2.0 * config.row_height + config.top_margin);
    }
}

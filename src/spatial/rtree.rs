//! R-tree based card index using the rstar crate.
//!
//! Cards are stored as rectangles, so queries answer "which card is under the
//! pointer" rather than "which point is closest". Provides:
//! - Point hit testing (topmost card wins on overlap)
//! - Rectangle intersection (viewport culling)

use rstar::{RTree, RTreeObject, AABB};

use crate::model::{PersonId, Rect};

/// A card rectangle in the spatial index.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBox {
    /// Person the card belongs to.
    pub id: PersonId,
    /// Card bounds in layout space.
    pub rect: Rect,
    /// Draw order; higher is on top.
    pub z: usize,
}

impl RTreeObject for CardBox {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.min_x, self.rect.min_y],
            [self.rect.max_x, self.rect.max_y],
        )
    }
}

/// Spatial index for cards.
///
/// Uses an R*-tree for efficient spatial queries.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<CardBox>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Rebuild the index from cards in draw order.
    ///
    /// Bulk loading is more efficient than incremental inserts.
    pub fn rebuild(&mut self, cards: &[(PersonId, Rect)]) {
        let boxes: Vec<CardBox> = cards
            .iter()
            .enumerate()
            .map(|(z, (id, rect))| CardBox {
                id: id.clone(),
                rect: *rect,
                z,
            })
            .collect();

        self.tree = RTree::bulk_load(boxes);
    }

    /// Card under a layout-space point. Edges count as inside.
    pub fn hit(&self, x: f32, y: f32) -> Option<&PersonId> {
        let probe = AABB::from_point([x, y]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .max_by_key(|card| card.z)
            .map(|card| &card.id)
    }

    /// Cards intersecting a rectangle, in draw order.
    pub fn in_rect(&self, rect: &Rect) -> Vec<PersonId> {
        let envelope = AABB::from_corners([rect.min_x, rect.min_y], [rect.max_x, rect.max_y]);
        let mut cards: Vec<&CardBox> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .collect();
        cards.sort_by_key(|card| card.z);
        cards.into_iter().map(|card| card.id.clone()).collect()
    }

    /// Clear all cards from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of cards in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

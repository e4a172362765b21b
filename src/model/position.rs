//! Layout-space positions and rectangles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// A point in layout space. For cards this is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Midpoint between two positions.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Person → position. Ordered so every pass iterates deterministically.
pub type PositionMap = BTreeMap<PersonId, Position>;

/// Axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl Rect {
    /// Rectangle from a top-left corner and a size.
    pub fn from_origin(origin: Position, width: f32, height: f32) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + width,
            max_y: origin.y + height,
        }
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Bounding rectangle of a set of rectangles, `None` when empty.
    pub fn enclosing(rects: impl IntoIterator<Item = Rect>) -> Option<Self> {
        rects.into_iter().reduce(Rect::union)
    }
}

//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based index of card rectangles for pointer
//! hit testing and viewport queries.

mod rtree;

pub use rtree::SpatialIndex;

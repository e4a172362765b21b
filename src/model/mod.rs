//! Input records and layout-space primitives.
//!
//! People and relationships arrive from the external data store as flat lists.
//! Positions are either computed by the layout engine or supplied as manual
//! overrides after a drag.

mod person;
mod position;
mod relationship;

pub use person::{Person, PersonId};
pub use position::{Position, PositionMap, Rect};
pub use relationship::{validate_relationships, Relationship, RelationshipType};

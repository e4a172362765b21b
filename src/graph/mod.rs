//! Relationship graph structures.
//!
//! The relationship index turns the flat relationship list into adjacency
//! lookups. It is rebuilt on every pass and never mutated afterwards.

mod index;

pub use index::RelationshipIndex;

//! Error types.
//!
//! Only input validation and the JS boundary can fail. The layout and render
//! pass never errors; anomalies there are reported as `LayoutWarnings`.

use thiserror::Error;

use crate::model::{PersonId, RelationshipType};

/// Errors raised while validating or decoding tree input.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// A relationship points from a person to themselves.
    #[error("relationship {relationship_id} relates {person_id} to themselves")]
    SelfRelationship {
        relationship_id: String,
        person_id: PersonId,
    },

    /// The same pair is related twice with the same type.
    #[error("relationship {relationship_id} duplicates an existing {kind:?} between {from} and {to}")]
    DuplicateRelationship {
        relationship_id: String,
        kind: RelationshipType,
        from: PersonId,
        to: PersonId,
    },

    /// A relationship endpoint is not in the people list.
    #[error("relationship {relationship_id} references unknown person {person_id}")]
    UnknownPerson {
        relationship_id: String,
        person_id: PersonId,
    },

    /// Configuration could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input or output could not cross the JS boundary.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result alias for fallible tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

//! Relationship records and upstream validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::person::{Person, PersonId};
use crate::error::{Result, TreeError};

/// Kind of relationship between two people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// `from` is a parent of `to`.
    Parent,
    /// Current partners. Symmetric.
    Spouse,
    /// Former partners. Symmetric, never affects generations.
    Divorced,
}

impl RelationshipType {
    /// Whether the relationship reads the same in both directions.
    #[inline]
    pub fn is_symmetric(self) -> bool {
        !matches!(self, Self::Parent)
    }
}

/// A typed edge between two people of one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Record identifier.
    pub id: String,
    /// Parent for `Parent` edges, either partner otherwise.
    pub from_person_id: PersonId,
    /// Child for `Parent` edges, either partner otherwise.
    pub to_person_id: PersonId,
    /// Relationship kind.
    pub relationship_type: RelationshipType,
}

impl Relationship {
    /// Create a relationship record.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<PersonId>,
        to: impl Into<PersonId>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: id.into(),
            from_person_id: from.into(),
            to_person_id: to.into(),
            relationship_type,
        }
    }

    /// Shorthand for a parent → child edge.
    pub fn parent(
        id: impl Into<String>,
        parent: impl Into<PersonId>,
        child: impl Into<PersonId>,
    ) -> Self {
        Self::new(id, parent, child, RelationshipType::Parent)
    }

    /// Shorthand for a spouse edge.
    pub fn spouse(id: impl Into<String>, a: impl Into<PersonId>, b: impl Into<PersonId>) -> Self {
        Self::new(id, a, b, RelationshipType::Spouse)
    }

    /// Shorthand for a divorced edge.
    pub fn divorced(id: impl Into<String>, a: impl Into<PersonId>, b: impl Into<PersonId>) -> Self {
        Self::new(id, a, b, RelationshipType::Divorced)
    }

    /// Whether both ends are the same person.
    #[inline]
    pub fn is_self_relationship(&self) -> bool {
        self.from_person_id == self.to_person_id
    }

    /// Order-independent identity for symmetric kinds, directed for parents.
    pub fn pair_key(&self) -> (RelationshipType, PersonId, PersonId) {
        let (a, b) = (&self.from_person_id, &self.to_person_id);
        if self.relationship_type.is_symmetric() && b < a {
            (self.relationship_type, b.clone(), a.clone())
        } else {
            (self.relationship_type, a.clone(), b.clone())
        }
    }
}

/// Validate a relationship set before it is handed to the layout engine.
///
/// Rejects self-relationships, duplicates (`spouse` a↔b and b↔a count as the
/// same pair) and endpoints missing from `people`. Stops at the first problem.
pub fn validate_relationships(people: &[Person], relationships: &[Relationship]) -> Result<()> {
    let known: HashSet<&PersonId> = people.iter().map(|p| &p.id).collect();
    let mut seen = HashSet::with_capacity(relationships.len());

    for rel in relationships {
        if rel.is_self_relationship() {
            return Err(TreeError::SelfRelationship {
                relationship_id: rel.id.clone(),
                person_id: rel.from_person_id.clone(),
            });
        }

        for endpoint in [&rel.from_person_id, &rel.to_person_id] {
            if !known.contains(endpoint) {
                return Err(TreeError::UnknownPerson {
                    relationship_id: rel.id.clone(),
                    person_id: endpoint.clone(),
                });
            }
        }

        let key = rel.pair_key();
        if !seen.insert(key) {
            return Err(TreeError::DuplicateRelationship {
                relationship_id: rel.id.clone(),
                kind: rel.relationship_type,
                from: rel.from_person_id.clone(),
                to: rel.to_person_id.clone(),
            });
        }
    }

    Ok(())
}

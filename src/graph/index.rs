//! RelationshipIndex - adjacency lookups over a flat relationship list.
//!
//! Builds the mappings the generation assignor and connector builder read:
//! - spouse ↔ spouse (symmetric)
//! - parent → children
//! - child → parents
//! - former spouse ↔ former spouse (`divorced`, symmetric, drawn only)
//!
//! Neighbour lists keep relationship input order, which makes the traversal
//! and therefore the layout reproducible. Parent edges are mirrored into a
//! petgraph `StableGraph` so lineage-level diagnostics (cycles) can use
//! petgraph's algorithms.

use petgraph::Directed;
use petgraph::algo::is_cyclic_directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::HashMap;

use crate::model::{PersonId, Relationship, RelationshipType};

/// Adjacency index for one family.
#[derive(Debug, Default)]
pub struct RelationshipIndex {
    /// Current partners, both directions.
    spouses: HashMap<PersonId, Vec<PersonId>>,

    /// Divorced partners, both directions.
    former_spouses: HashMap<PersonId, Vec<PersonId>>,

    /// Parent → children.
    children: HashMap<PersonId, Vec<PersonId>>,

    /// Child → parents.
    parents: HashMap<PersonId, Vec<PersonId>>,

    /// Distinct parent → child edges in input order.
    parent_edges: Vec<(PersonId, PersonId)>,

    /// Parent edges as a directed graph.
    lineage: StableGraph<PersonId, (), Directed>,

    /// Map from PersonId to lineage NodeIndex.
    lineage_index: HashMap<PersonId, NodeIndex>,

    /// Ids of self-relationships that were dropped.
    skipped: Vec<String>,
}

impl RelationshipIndex {
    /// Build the index from a relationship list.
    ///
    /// Self-relationships are invalid input. They are dropped here as a last
    /// line of defence and reported through `skipped_relationships`. Repeated
    /// edges collapse into one entry.
    pub fn build(relationships: &[Relationship]) -> Self {
        let mut index = Self::default();

        for rel in relationships {
            if rel.is_self_relationship() {
                log::warn!(
                    "dropping self-relationship {} on person {}",
                    rel.id,
                    rel.from_person_id
                );
                index.skipped.push(rel.id.clone());
                continue;
            }

            let from = &rel.from_person_id;
            let to = &rel.to_person_id;

            match rel.relationship_type {
                RelationshipType::Spouse => {
                    push_unique(&mut index.spouses, from, to);
                    push_unique(&mut index.spouses, to, from);
                }
                RelationshipType::Divorced => {
                    push_unique(&mut index.former_spouses, from, to);
                    push_unique(&mut index.former_spouses, to, from);
                }
                RelationshipType::Parent => {
                    if push_unique(&mut index.children, from, to) {
                        push_unique(&mut index.parents, to, from);
                        index.parent_edges.push((from.clone(), to.clone()));
                        index.add_lineage_edge(from, to);
                    }
                }
            }
        }

        index
    }

    fn add_lineage_edge(&mut self, parent: &PersonId, child: &PersonId) {
        let parent_index = self.lineage_node(parent);
        let child_index = self.lineage_node(child);
        self.lineage.add_edge(parent_index, child_index, ());
    }

    fn lineage_node(&mut self, id: &PersonId) -> NodeIndex {
        if let Some(&index) = self.lineage_index.get(id) {
            return index;
        }
        let index = self.lineage.add_node(id.clone());
        self.lineage_index.insert(id.clone(), index);
        index
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Current partners of a person.
    pub fn spouses_of(&self, id: &PersonId) -> &[PersonId] {
        self.spouses.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Former (divorced) partners of a person.
    pub fn former_spouses_of(&self, id: &PersonId) -> &[PersonId] {
        self.former_spouses.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of a person.
    pub fn children_of(&self, id: &PersonId) -> &[PersonId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parents of a person.
    pub fn parents_of(&self, id: &PersonId) -> &[PersonId] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the person has at least one recorded parent.
    pub fn has_parents(&self, id: &PersonId) -> bool {
        self.parents.contains_key(id)
    }

    /// Distinct parent → child edges in input order.
    pub fn parent_edges(&self) -> &[(PersonId, PersonId)] {
        &self.parent_edges
    }

    /// Ids of self-relationships that were dropped while building.
    pub fn skipped_relationships(&self) -> &[String] {
        &self.skipped
    }

    /// Whether parent edges form a cycle (someone is their own ancestor).
    pub fn has_lineage_cycle(&self) -> bool {
        is_cyclic_directed(&self.lineage)
    }

    /// Whether the index holds no usable edges.
    pub fn is_empty(&self) -> bool {
        self.spouses.is_empty() && self.former_spouses.is_empty() && self.parent_edges.is_empty()
    }
}

/// Append `value` to `map[key]` unless already present. Returns true if added.
fn push_unique(
    map: &mut HashMap<PersonId, Vec<PersonId>>,
    key: &PersonId,
    value: &PersonId,
) -> bool {
    let list = map.entry(key.clone()).or_default();
    if list.contains(value) {
        false
    } else {
        list.push(value.clone());
        true
    }
}

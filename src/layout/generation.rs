//! Generation assignment.
//!
//! Partitions people into integer generations by walking the relationship
//! index depth-first from every root:
//!
//! 1. A person already visited is skipped (cycles, re-entrant spouses).
//! 2. Otherwise the person is recorded at generation `g` and appended to
//!    bucket `g`.
//! 3. Unvisited spouses are walked at the same generation `g`.
//! 4. Unvisited children are walked at `g + 1`.
//!
//! Roots are people without recorded parents, in input order. When nobody
//! qualifies the first person is used instead, and a final catch-all pass
//! seeds any person still unvisited so nobody silently drops out of the
//! layout. Both kinds of seed are reported as synthetic roots.
//!
//! The walk uses an explicit stack. Spouses are pushed above children so the
//! visiting order matches a recursive preorder: a spouse's whole subtree is
//! finished before the children of the person who led to them.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::graph::RelationshipIndex;
use crate::model::{Person, PersonId};

/// Result of generation assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationAssignment {
    /// Generation index → people in traversal order.
    buckets: BTreeMap<u32, Vec<PersonId>>,
    /// Person → generation index.
    generation_of: HashMap<PersonId, u32>,
    /// Seeds that were not genuine roots.
    synthetic_roots: Vec<PersonId>,
}

impl GenerationAssignment {
    /// Walk `people` through `index` and assign every person a generation.
    pub fn assign(people: &[Person], index: &RelationshipIndex) -> Self {
        let mut walker = GenerationWalker::new(people);

        let roots: Vec<&PersonId> = people
            .iter()
            .map(|p| &p.id)
            .filter(|id| !index.has_parents(id))
            .collect();

        if roots.is_empty() {
            if let Some(first) = people.first() {
                log::warn!("no person without parents; using {} as root", first.id);
                walker.assignment.synthetic_roots.push(first.id.clone());
                walker.walk(&first.id, index);
            }
        } else {
            for root in roots {
                walker.walk(root, index);
            }
        }

        // Catch-all: components with no valid root
        for person in people {
            if !walker.is_visited(&person.id) {
                log::warn!("{} unreachable from any root; seeding it at generation 0", person.id);
                walker.assignment.synthetic_roots.push(person.id.clone());
                walker.walk(&person.id, index);
            }
        }

        walker.assignment
    }

    /// Generation buckets in ascending order.
    pub fn buckets(&self) -> &BTreeMap<u32, Vec<PersonId>> {
        &self.buckets
    }

    /// People in one generation.
    pub fn bucket(&self, generation: u32) -> &[PersonId] {
        self.buckets.get(&generation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Generation of a person, if visited.
    pub fn generation_of(&self, id: &PersonId) -> Option<u32> {
        self.generation_of.get(id).copied()
    }

    /// Seeds that were not people without parents.
    pub fn synthetic_roots(&self) -> &[PersonId] {
        &self.synthetic_roots
    }

    /// Number of people assigned.
    pub fn len(&self) -> usize {
        self.generation_of.len()
    }

    /// Whether nobody was assigned.
    pub fn is_empty(&self) -> bool {
        self.generation_of.is_empty()
    }

    /// Deepest generation index, `None` when empty.
    pub fn max_generation(&self) -> Option<u32> {
        self.buckets.keys().next_back().copied()
    }
}

/// Traversal state: the visited set plus the assignment being built.
struct GenerationWalker<'a> {
    /// People present in the input; ids outside it are never visited.
    known: HashSet<&'a PersonId>,
    assignment: GenerationAssignment,
}

impl<'a> GenerationWalker<'a> {
    fn new(people: &'a [Person]) -> Self {
        Self {
            known: people.iter().map(|p| &p.id).collect(),
            assignment: GenerationAssignment::default(),
        }
    }

    fn is_visited(&self, id: &PersonId) -> bool {
        self.assignment.generation_of.contains_key(id)
    }

    /// Record `id` at `generation`. Returns false if it was already visited.
    fn visit(&mut self, id: &PersonId, generation: u32) -> bool {
        if self.is_visited(id) || !self.known.contains(id) {
            return false;
        }
        self.assignment.generation_of.insert(id.clone(), generation);
        self.assignment
            .buckets
            .entry(generation)
            .or_default()
            .push(id.clone());
        true
    }

    fn walk(&mut self, root: &PersonId, index: &RelationshipIndex) {
        let mut stack: Vec<(PersonId, u32)> = vec![(root.clone(), 0)];

        while let Some((person, generation)) = stack.pop() {
            if !self.visit(&person, generation) {
                continue;
            }

            // Pushed in reverse so the first child / spouse pops first
            for child in index.children_of(&person).iter().rev() {
                if !self.is_visited(child) {
                    stack.push((child.clone(), generation + 1));
                }
            }
            for spouse in index.spouses_of(&person).iter().rev() {
                if !self.is_visited(spouse) {
                    stack.push((spouse.clone(), generation));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Relationship;

    fn people(ids: &[&str]) -> Vec<Person> {
        ids.iter().map(|id| Person::named(*id, *id)).collect()
    }

    fn id(s: &str) -> PersonId {
        PersonId::new(s)
    }

    fn assign(ids: &[&str], rels: &[Relationship]) -> GenerationAssignment {
        GenerationAssignment::assign(&people(ids), &RelationshipIndex::build(rels))
    }

    #[test]
    fn test_empty_input() {
        let result = assign(&[], &[]);
        assert!(result.is_empty());
        assert_eq!(result.max_generation(), None);
        assert!(result.synthetic_roots().is_empty());
    }

    #[test]
    fn test_couple_with_child() {
        let result = assign(
            &["A", "B", "C"],
            &[
                Relationship::spouse("r1", "A", "B"),
                Relationship::parent("r2", "A", "C"),
            ],
        );

        assert_eq!(result.generation_of(&id("A")), Some(0));
        assert_eq!(result.generation_of(&id("B")), Some(0));
        assert_eq!(result.generation_of(&id("C")), Some(1));
        assert_eq!(result.bucket(0), &[id("A"), id("B")]);
        assert_eq!(result.bucket(1), &[id("C")]);
    }

    #[test]
    fn test_spouse_without_parents_is_still_a_root() {
        // X and Y both lack parents; X comes first and pulls Y in as spouse
        let result = assign(&["X", "Y"], &[Relationship::spouse("r1", "X", "Y")]);

        assert_eq!(result.bucket(0), &[id("X"), id("Y")]);
        assert!(result.synthetic_roots().is_empty());
    }

    #[test]
    fn test_divorced_partner_walked_as_own_root() {
        let result = assign(
            &["A", "B", "C", "D"],
            &[
                Relationship::divorced("r1", "A", "B"),
                Relationship::parent("r2", "A", "C"),
                Relationship::parent("r3", "B", "D"),
            ],
        );

        // A's subtree finishes before B is reached from the root list
        assert_eq!(result.bucket(0), &[id("A"), id("B")]);
        assert_eq!(result.bucket(1), &[id("C"), id("D")]);
        assert!(result.synthetic_roots().is_empty());
    }

    #[test]
    fn test_fallback_root_when_everyone_has_parents() {
        // Parent cycle: nobody is parentless
        let result = assign(
            &["X", "Y"],
            &[
                Relationship::parent("r1", "X", "Y"),
                Relationship::parent("r2", "Y", "X"),
            ],
        );

        assert_eq!(result.synthetic_roots(), &[id("X")]);
        assert_eq!(result.generation_of(&id("X")), Some(0));
        assert_eq!(result.generation_of(&id("Y")), Some(1));
    }

    #[test]
    fn test_catch_all_seeds_rootless_component() {
        // A is a genuine root; P/Q form a parent cycle unreachable from A
        let result = assign(
            &["A", "P", "Q"],
            &[
                Relationship::parent("r1", "P", "Q"),
                Relationship::parent("r2", "Q", "P"),
            ],
        );

        assert_eq!(result.len(), 3);
        assert_eq!(result.synthetic_roots(), &[id("P")]);
        assert_eq!(result.bucket(0), &[id("A"), id("P")]);
        assert_eq!(result.bucket(1), &[id("Q")]);
    }

    #[test]
    fn test_spouse_subtree_before_partner_children() {
        // A↔B, B→D (B's child from elsewhere), A→C.
        // Preorder: A, B, D, C
        let result = assign(
            &["A", "B", "C", "D"],
            &[
                Relationship::spouse("r1", "A", "B"),
                Relationship::parent("r2", "A", "C"),
                Relationship::parent("r3", "B", "D"),
            ],
        );

        assert_eq!(result.bucket(0), &[id("A"), id("B")]);
        assert_eq!(result.bucket(1), &[id("D"), id("C")]);
    }

    #[test]
    fn test_generation_monotonic_for_three_levels() {
        let rels = [
            Relationship::spouse("r1", "g1", "g2"),
            Relationship::parent("r2", "g1", "p1"),
            Relationship::parent("r3", "g2", "p1"),
            Relationship::spouse("r4", "p1", "p2"),
            Relationship::parent("r5", "p1", "c1"),
            Relationship::parent("r6", "p2", "c1"),
            Relationship::parent("r7", "p1", "c2"),
        ];
        let result = assign(&["g1", "g2", "p1", "p2", "c1", "c2"], &rels);

        for rel in &rels {
            let from = result.generation_of(&rel.from_person_id).unwrap();
            let to = result.generation_of(&rel.to_person_id).unwrap();
            match rel.relationship_type {
                crate::model::RelationshipType::Parent => assert_eq!(to, from + 1, "{}", rel.id),
                _ => assert_eq!(to, from, "{}", rel.id),
            }
        }
        assert_eq!(result.max_generation(), Some(2));
    }

    #[test]
    fn test_unknown_ids_are_not_visited() {
        let result = assign(&["A"], &[Relationship::parent("r1", "A", "ghost")]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.generation_of(&id("ghost")), None);
    }

    #[test]
    fn test_visit_skips_already_visited() {
        let people = people(&["A"]);
        let mut walker = GenerationWalker::new(&people);

        assert!(walker.visit(&id("A"), 3));
        assert!(!walker.visit(&id("A"), 0));
        assert_eq!(walker.assignment.generation_of(&id("A")), Some(3));
        assert_eq!(walker.assignment.bucket(3).len(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let count = 20_000;
        let ids: Vec<String> = (0..count).map(|i| format!("p{i}")).collect();
        let people: Vec<Person> = ids.iter().map(|i| Person::named(i.clone(), i.clone())).collect();
        let rels: Vec<Relationship> = (1..count)
            .map(|i| Relationship::parent(format!("r{i}"), ids[i - 1].as_str(), ids[i].as_str()))
            .collect();

        let result = GenerationAssignment::assign(&people, &RelationshipIndex::build(&rels));
        assert_eq!(result.len(), count);
        assert_eq!(result.max_generation(), Some(count as u32 - 1));
    }
}

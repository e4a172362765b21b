//! Callbacks into the host application.

use serde::{Deserialize, Serialize};

use crate::model::PersonId;

/// Relative added through a quick-relate anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickRelate {
    /// Anchor above the card.
    Parent,
    /// Anchor below the card.
    Child,
    /// Anchor right of the card.
    Spouse,
    /// Anchor left of the card.
    Sibling,
}

impl QuickRelate {
    /// All anchors in drawing order.
    pub const ALL: [QuickRelate; 4] = [Self::Parent, Self::Spouse, Self::Child, Self::Sibling];
}

/// Entries of a card's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuAction {
    /// Open the edit form.
    Edit,
    /// Start capturing a memory about this person.
    RecordMemory,
    /// Delete the person.
    Delete,
}

impl MenuAction {
    /// Menu entries in display order.
    pub const ALL: [MenuAction; 3] = [Self::Edit, Self::RecordMemory, Self::Delete];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::RecordMemory => "Record memory",
            Self::Delete => "Delete",
        }
    }
}

/// Host-side handlers fired by canvas gestures.
///
/// Only `move_person` is required; the rest default to no-ops.
pub trait TreeCallbacks {
    /// A node drag ended at `(x, y)` in layout space. The host is expected to
    /// persist this into the manual position map.
    fn move_person(&mut self, id: &PersonId, x: f32, y: f32);

    /// A node was clicked without being dragged.
    fn select_person(&mut self, _id: &PersonId) {}

    /// "Edit" chosen from the context menu.
    fn edit_person(&mut self, _id: &PersonId) {}

    /// "Delete" chosen from the context menu.
    fn delete_person(&mut self, _id: &PersonId) {}

    /// "Record memory" chosen from the context menu.
    fn record_memory_about(&mut self, _id: &PersonId, _name: &str) {}

    /// A quick-relate anchor was activated.
    fn add_relative(&mut self, _id: &PersonId, _relation: QuickRelate) {}
}

/// Callback sink that records every call. Useful for hosts that batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedCallbacks {
    /// Calls in order.
    pub calls: Vec<CallbackEvent>,
}

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CallbackEvent {
    /// `move_person`.
    Move { id: PersonId, x: f32, y: f32 },
    /// `select_person`.
    Select { id: PersonId },
    /// `edit_person`.
    Edit { id: PersonId },
    /// `delete_person`.
    Delete { id: PersonId },
    /// `record_memory_about`.
    RecordMemory { id: PersonId, name: String },
    /// `add_relative`.
    AddRelative { id: PersonId, relation: QuickRelate },
}

impl TreeCallbacks for RecordedCallbacks {
    fn move_person(&mut self, id: &PersonId, x: f32, y: f32) {
        self.calls.push(CallbackEvent::Move { id: id.clone(), x, y });
    }

    fn select_person(&mut self, id: &PersonId) {
        self.calls.push(CallbackEvent::Select { id: id.clone() });
    }

    fn edit_person(&mut self, id: &PersonId) {
        self.calls.push(CallbackEvent::Edit { id: id.clone() });
    }

    fn delete_person(&mut self, id: &PersonId) {
        self.calls.push(CallbackEvent::Delete { id: id.clone() });
    }

    fn record_memory_about(&mut self, id: &PersonId, name: &str) {
        self.calls.push(CallbackEvent::RecordMemory {
            id: id.clone(),
            name: name.to_owned(),
        });
    }

    fn add_relative(&mut self, id: &PersonId, relation: QuickRelate) {
        self.calls.push(CallbackEvent::AddRelative {
            id: id.clone(),
            relation,
        });
    }
}

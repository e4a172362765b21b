//! Node renderer.
//!
//! Produces the draw description for one person's card: photo or initials,
//! truncated name, lifespan, and the hover affordances (four quick-relate
//! anchors plus the context menu).

use serde::Serialize;

use crate::canvas::{MenuAction, QuickRelate};
use crate::config::{CardConfig, LayoutConfig};
use crate::model::{Person, PersonId, Position, Rect};

/// Photo region content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Portrait {
    /// Clipped avatar image.
    Photo { url: String },
    /// Initials placeholder.
    Initials { text: String },
}

/// A quick-relate anchor drawn around a hovered card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    /// Relative added when activated.
    pub relation: QuickRelate,
    /// Anchor center in layout space.
    pub position: Position,
}

/// A context menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MenuItem {
    /// Action fired.
    pub action: MenuAction,
    /// Display label.
    pub label: &'static str,
}

/// Everything needed to draw one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCard {
    /// Person shown.
    pub id: PersonId,
    /// Card bounds in layout space.
    pub rect: Rect,
    /// Name as drawn, truncated to the character budget.
    pub display_name: String,
    /// Untruncated name, for tooltips and callbacks.
    pub full_name: String,
    /// Photo or initials.
    pub portrait: Portrait,
    /// Lifespan label.
    pub lifespan: String,
    /// Pointer is over this card.
    pub hovered: bool,
    /// Card is being dragged.
    pub dragging: bool,
    /// Quick-relate anchors; empty unless hovered.
    pub anchors: Vec<Anchor>,
    /// Context menu; empty unless hovered.
    pub menu: Vec<MenuItem>,
}

/// Builds card descriptions.
#[derive(Debug, Clone, Default)]
pub struct NodeRenderer {
    layout: LayoutConfig,
    card: CardConfig,
}

impl NodeRenderer {
    /// Create a renderer for the given card size and decoration settings.
    pub fn new(layout: LayoutConfig, card: CardConfig) -> Self {
        Self { layout, card }
    }

    /// Describe `person`'s card with its top-left corner at `origin`.
    pub fn render(
        &self,
        person: &Person,
        origin: Position,
        hovered: bool,
        dragging: bool,
    ) -> NodeCard {
        let rect = self.layout.card_rect(origin);
        let full_name = person.display_name();

        let portrait = match person.avatar_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Portrait::Photo { url: url.to_owned() },
            _ => Portrait::Initials {
                text: person.initials(),
            },
        };

        let (anchors, menu) = if hovered && !dragging {
            (
                self.anchors(&rect),
                MenuAction::ALL
                    .iter()
                    .map(|&action| MenuItem {
                        action,
                        label: action.label(),
                    })
                    .collect(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        NodeCard {
            id: person.id.clone(),
            rect,
            display_name: truncate_name(&full_name, self.card.name_char_budget),
            full_name,
            portrait,
            lifespan: person.lifespan(),
            hovered,
            dragging,
            anchors,
            menu,
        }
    }

    /// Anchor centers around a card: parent above, spouse right, child below,
    /// sibling left.
    fn anchors(&self, rect: &Rect) -> Vec<Anchor> {
        let offset = self.card.anchor_offset;
        let center = rect.center();

        QuickRelate::ALL
            .iter()
            .map(|&relation| {
                let position = match relation {
                    QuickRelate::Parent => Position::new(center.x, rect.min_y - offset),
                    QuickRelate::Spouse => Position::new(rect.max_x + offset, center.y),
                    QuickRelate::Child => Position::new(center.x, rect.max_y + offset),
                    QuickRelate::Sibling => Position::new(rect.min_x - offset, center.y),
                };
                Anchor { relation, position }
            })
            .collect()
    }
}

/// Cut `name` to `budget` characters, marking the cut with an ellipsis.
pub fn truncate_name(name: &str, budget: usize) -> String {
    if name.chars().count() <= budget {
        return name.to_owned();
    }
    let kept: String = name.chars().take(budget).collect();
    format!("{}…", kept.trim_end())
}

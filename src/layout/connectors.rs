//! Connector geometry.
//!
//! Builds the lines drawn between cards once final positions are known:
//!
//! - **Spouse**: one straight segment per unordered couple, from the right
//!   edge midpoint of the left partner to the left edge midpoint of the other,
//!   with a marker at the segment midpoint. Couples are deduplicated on a
//!   sorted id pair, so `a↔b` and `b↔a` draw once.
//! - **Divorced**: same geometry as a spouse connector without the marker; the
//!   renderer strokes it dashed.
//! - **Parent → child**: an elbow path. Down from the parent's bottom center
//!   to the vertical midpoint between parent bottom and child top, across to
//!   the child's center x, down into the child's top center.
//!
//! A connector whose endpoints are not both positioned is skipped.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::graph::RelationshipIndex;
use crate::model::{PersonId, Position, PositionMap};

/// Connector style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    /// Current partners.
    Spouse,
    /// Former partners.
    Divorced,
    /// Parent to child elbow.
    ParentChild,
}

/// A drawable connector polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    /// Style.
    pub kind: ConnectorKind,
    /// Start person (left partner or parent).
    pub from: PersonId,
    /// End person (right partner or child).
    pub to: PersonId,
    /// Polyline vertices in layout space.
    pub points: Vec<Position>,
    /// Badge position for spouse connectors.
    pub marker: Option<Position>,
}

impl Connector {
    /// SVG path data (`M x y L x y ...`) for the polyline.
    pub fn svg_path(&self) -> String {
        let mut path = String::with_capacity(self.points.len() * 16);
        for (i, point) in self.points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                path.push(' ');
            }
            let _ = write!(path, "{command} {} {}", point.x, point.y);
        }
        path
    }
}

/// Builds connectors for one set of final positions.
pub struct ConnectorBuilder<'a> {
    positions: &'a PositionMap,
    index: &'a RelationshipIndex,
    card_width: f32,
    card_height: f32,
}

impl<'a> ConnectorBuilder<'a> {
    /// Create a builder over final positions and the relationship index.
    pub fn new(
        positions: &'a PositionMap,
        index: &'a RelationshipIndex,
        config: &LayoutConfig,
    ) -> Self {
        Self {
            positions,
            index,
            card_width: config.card_width,
            card_height: config.card_height,
        }
    }

    /// Build every connector.
    ///
    /// `order` fixes which partner of a couple is met first. Output lists
    /// spouse, then divorced, then parent-child connectors.
    pub fn build(&self, order: &[PersonId]) -> Vec<Connector> {
        let mut connectors = Vec::new();
        self.partner_connectors(order, ConnectorKind::Spouse, &mut connectors);
        self.partner_connectors(order, ConnectorKind::Divorced, &mut connectors);
        self.parent_child_connectors(&mut connectors);
        connectors
    }

    fn partner_connectors(
        &self,
        order: &[PersonId],
        kind: ConnectorKind,
        out: &mut Vec<Connector>,
    ) {
        let mut seen: HashSet<(&PersonId, &PersonId)> = HashSet::new();

        for person in order {
            let partners = match kind {
                ConnectorKind::Divorced => self.index.former_spouses_of(person),
                _ => self.index.spouses_of(person),
            };

            for partner in partners {
                let key = if person <= partner {
                    (person, partner)
                } else {
                    (partner, person)
                };
                if !seen.insert(key) {
                    continue;
                }
                if let Some(connector) = self.partner_connector(person, partner, kind) {
                    out.push(connector);
                }
            }
        }
    }

    fn partner_connector(
        &self,
        first: &PersonId,
        second: &PersonId,
        kind: ConnectorKind,
    ) -> Option<Connector> {
        let a = *self.positions.get(first)?;
        let b = *self.positions.get(second)?;

        // Left partner's right edge to right partner's left edge
        let ((left_id, left), (right_id, right)) = if b.x < a.x {
            ((second, b), (first, a))
        } else {
            ((first, a), (second, b))
        };

        let start = Position::new(left.x + self.card_width, left.y + self.card_height / 2.0);
        let end = Position::new(right.x, right.y + self.card_height / 2.0);

        Some(Connector {
            kind,
            from: left_id.clone(),
            to: right_id.clone(),
            points: vec![start, end],
            marker: (kind == ConnectorKind::Spouse).then(|| start.midpoint(end)),
        })
    }

    fn parent_child_connectors(&self, out: &mut Vec<Connector>) {
        for (parent, child) in self.index.parent_edges() {
            let (Some(&p), Some(&c)) = (self.positions.get(parent), self.positions.get(child))
            else {
                continue;
            };

            let half_width = self.card_width / 2.0;
            let parent_bottom = Position::new(p.x + half_width, p.y + self.card_height);
            let child_top = Position::new(c.x + half_width, c.y);
            let mid_y = (parent_bottom.y + child_top.y) / 2.0;

            out.push(Connector {
                kind: ConnectorKind::ParentChild,
                from: parent.clone(),
                to: child.clone(),
                points: vec![
                    parent_bottom,
                    Position::new(parent_bottom.x, mid_y),
                    Position::new(child_top.x, mid_y),
                    child_top,
                ],
                marker: None,
            });
        }
    }
}

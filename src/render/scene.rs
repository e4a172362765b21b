//! FamilyTree - snapshot holder and render pass.
//!
//! Holds the latest people/relationships snapshot and manual positions, keeps
//! the layout pass and card index in sync with them, and turns the result plus
//! a `ViewState` into a `RenderPass` the host draws.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;

use crate::canvas::{
    CanvasController, MenuAction, QuickRelate, TreeCallbacks, ViewState, ViewTransform,
};
use crate::config::TreeConfig;
use crate::error::Result;
use crate::layout::{Connector, ConnectorBuilder, LayoutPass, LayoutWarnings, PositionSource};
use crate::model::{Person, PersonId, Position, PositionMap, Rect, Relationship};
use crate::spatial::SpatialIndex;

use super::node::{NodeCard, NodeRenderer};

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPass {
    /// Cards in draw order; a dragged card comes last.
    pub nodes: Vec<NodeCard>,
    /// Connector geometry.
    pub connectors: Vec<Connector>,
    /// Canvas transform.
    pub view: ViewTransform,
    /// Bounds of all cards, `None` when nothing is drawn.
    pub bounds: Option<Rect>,
    /// Where positions came from.
    pub position_source: PositionSource,
    /// Non-fatal anomalies from the layout pass.
    pub warnings: LayoutWarnings,
}

/// The tree engine for one family.
pub struct FamilyTree {
    config: TreeConfig,
    controller: CanvasController,
    renderer: NodeRenderer,

    people: Vec<Person>,
    relationships: Vec<Relationship>,

    /// Map from PersonId to index in `people`
    person_index: HashMap<PersonId, usize>,

    /// Caller-supplied overrides.
    manual: PositionMap,

    /// Layout of the current snapshot.
    pass: LayoutPass,

    /// Card rectangles for hit testing.
    cards: SpatialIndex,
}

impl FamilyTree {
    /// Create an empty tree with default configuration.
    pub fn new() -> Self {
        Self::build(TreeConfig::default())
    }

    /// Create an empty tree with a validated configuration.
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TreeConfig) -> Self {
        let pass = LayoutPass::run(&[], &[], &PositionMap::new(), &config);
        Self {
            controller: CanvasController::new(config.canvas.clone()),
            renderer: NodeRenderer::new(config.layout.clone(), config.card.clone()),
            config,
            people: Vec::new(),
            relationships: Vec::new(),
            person_index: HashMap::new(),
            manual: PositionMap::new(),
            pass,
            cards: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Replace people and relationships and relayout.
    pub fn set_snapshot(&mut self, people: Vec<Person>, relationships: Vec<Relationship>) {
        self.person_index = people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        self.people = people;
        self.relationships = relationships;
        self.relayout();
    }

    /// Replace the manual position map and relayout.
    pub fn set_manual_positions(&mut self, manual: PositionMap) {
        self.manual = manual;
        self.relayout();
    }

    /// Record one manual position (after the host persisted a move).
    pub fn apply_move(&mut self, id: PersonId, x: f32, y: f32) {
        self.manual.insert(id, Position::new(x, y));
        self.relayout();
    }

    /// Drop all manual positions.
    pub fn clear_manual_positions(&mut self) {
        self.set_manual_positions(PositionMap::new());
    }

    fn relayout(&mut self) {
        self.pass = LayoutPass::run(&self.people, &self.relationships, &self.manual, &self.config);

        let cards: Vec<(PersonId, Rect)> = self
            .pass
            .positions
            .order
            .iter()
            .filter_map(|id| {
                self.pass
                    .positions
                    .positions
                    .get(id)
                    .map(|&origin| (id.clone(), self.config.layout.card_rect(origin)))
            })
            .collect();
        self.cards.rebuild(&cards);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Configuration in use.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Canvas controller bound to this tree's configuration.
    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    /// Current layout pass.
    pub fn layout(&self) -> &LayoutPass {
        &self.pass
    }

    /// Manual positions in effect.
    pub fn manual_positions(&self) -> &PositionMap {
        &self.manual
    }

    /// Look up a person in the snapshot.
    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.person_index.get(id).and_then(|&i| self.people.get(i))
    }

    /// Final position of a person.
    pub fn position_of(&self, id: &PersonId) -> Option<Position> {
        self.pass.positions.positions.get(id).copied()
    }

    /// Generation of a person.
    pub fn generation_of(&self, id: &PersonId) -> Option<u32> {
        self.pass.generations.generation_of(id)
    }

    /// Bounds of all placed cards.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::enclosing(
            self.pass
                .positions
                .positions
                .values()
                .map(|&origin| self.config.layout.card_rect(origin)),
        )
    }

    /// People whose cards intersect a layout-space rectangle, in draw order.
    pub fn people_in_rect(&self, rect: &Rect) -> Vec<PersonId> {
        self.cards.in_rect(rect)
    }

    /// People visible in a `width` × `height` viewport under `view`.
    pub fn visible_people(&self, view: &ViewState, width: f32, height: f32) -> Vec<PersonId> {
        let top_left = view.screen_to_layout(Position::new(0.0, 0.0));
        let bottom_right = view.screen_to_layout(Position::new(width, height));
        self.cards.in_rect(&Rect {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: bottom_right.x,
            max_y: bottom_right.y,
        })
    }

    /// Person under a screen point.
    pub fn person_at(&self, view: &ViewState, screen: Position) -> Option<&PersonId> {
        let layout = view.screen_to_layout(screen);
        self.cards.hit(layout.x, layout.y)
    }

    /// Final positions packed as `[x0, y0, x1, y1, ...]` in draw order.
    pub fn positions_buffer(&self) -> Vec<f32> {
        let positions = &self.pass.positions;
        let mut buffer = Vec::with_capacity(positions.order.len() * 2);
        for id in &positions.order {
            if let Some(p) = positions.positions.get(id) {
                buffer.push(p.x);
                buffer.push(p.y);
            }
        }
        buffer
    }

    // =========================================================================
    // Render pass
    // =========================================================================

    /// Build the frame for `view`.
    ///
    /// While a node drag is under way the dragged card and its connectors are
    /// drawn at the preview position; nothing is committed until the drag
    /// ends.
    pub fn render(&self, view: &ViewState) -> RenderPass {
        let resolved = &self.pass.positions;
        let preview = view
            .drag_preview()
            .filter(|(id, _)| resolved.positions.contains_key(*id));

        let mut positions = Cow::Borrowed(&resolved.positions);
        let connectors = match preview {
            Some((id, origin)) => {
                positions.to_mut().insert(id.clone(), origin);
                ConnectorBuilder::new(&positions, &self.pass.index, &self.config.layout)
                    .build(&resolved.order)
            }
            None => self.pass.connectors.clone(),
        };

        let dragging = view.dragging_person_id();
        let mut nodes = Vec::with_capacity(resolved.order.len());
        let mut dragged = None;

        for id in &resolved.order {
            let (Some(person), Some(&origin)) = (self.person(id), positions.get(id)) else {
                continue;
            };
            let is_dragged = dragging == Some(id);
            let hovered = view.hovered.as_ref() == Some(id);
            let card = self.renderer.render(person, origin, hovered, is_dragged);
            if is_dragged {
                dragged = Some(card);
            } else {
                nodes.push(card);
            }
        }
        nodes.extend(dragged);

        RenderPass {
            bounds: Rect::enclosing(nodes.iter().map(|card| card.rect)),
            nodes,
            connectors,
            view: view.transform(),
            position_source: resolved.source,
            warnings: self.pass.warnings.clone(),
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Pointer pressed.
    pub fn pointer_down(&self, view: &mut ViewState, screen: Position) {
        self.controller
            .pointer_down(view, screen, &self.cards, &self.pass.positions.positions);
    }

    /// Pointer moved.
    pub fn pointer_move(&self, view: &mut ViewState, screen: Position) {
        self.controller.pointer_move(view, screen, &self.cards);
    }

    /// Pointer released.
    pub fn pointer_up(&self, view: &mut ViewState, callbacks: &mut dyn TreeCallbacks) {
        self.controller.pointer_up(view, callbacks);
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&self, view: &mut ViewState, callbacks: &mut dyn TreeCallbacks) {
        self.controller.pointer_leave(view, callbacks);
    }

    /// Fit the whole tree into a viewport.
    pub fn fit(&self, view: &mut ViewState, width: f32, height: f32) {
        self.controller.fit(view, self.bounds(), width, height);
    }

    /// Quick-relate anchor activated on a card. Unknown ids are ignored.
    pub fn activate_anchor(
        &self,
        id: &PersonId,
        relation: QuickRelate,
        callbacks: &mut dyn TreeCallbacks,
    ) {
        if self.person(id).is_some() {
            self.controller.activate_anchor(id, relation, callbacks);
        }
    }

    /// Context menu entry chosen on a card. Unknown ids are ignored.
    pub fn menu_action(
        &self,
        id: &PersonId,
        action: MenuAction,
        callbacks: &mut dyn TreeCallbacks,
    ) {
        if let Some(person) = self.person(id) {
            self.controller
                .menu_action(id, &person.display_name(), action, callbacks);
        }
    }
}

impl Default for FamilyTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CallbackEvent, RecordedCallbacks};
    use crate::config::PositionMode;
    use crate::layout::ConnectorKind;

    fn family() -> FamilyTree {
        let mut tree = FamilyTree::new();
        tree.set_snapshot(
            vec![
                Person::named("A", "Alice Smith"),
                Person::named("B", "Bob Smith"),
                Person::named("C", "Carol Smith"),
            ],
            vec![
                Relationship::spouse("r1", "A", "B"),
                Relationship::parent("r2", "A", "C"),
            ],
        );
        tree
    }

    fn id(s: &str) -> PersonId {
        PersonId::new(s)
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        let tree = FamilyTree::new();
        let frame = tree.render(&ViewState::default());
        assert!(frame.nodes.is_empty());
        assert!(frame.connectors.is_empty());
        assert_eq!(frame.bounds, None);
    }

    #[test]
    fn test_render_basic_family() {
        let tree = family();
        let frame = tree.render(&ViewState::default());

        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.connectors.len(), 2);
        assert_eq!(frame.position_source, PositionSource::Computed);
        assert!(frame.warnings.is_empty());
        assert_eq!(frame.view.zoom, 0.8);
    }

    #[test]
    fn test_hovered_card_has_affordances() {
        let tree = family();
        let view = ViewState {
            hovered: Some(id("B")),
            ..ViewState::default()
        };
        let frame = tree.render(&view);

        for card in &frame.nodes {
            assert_eq!(card.hovered, card.id == id("B"));
            assert_eq!(card.anchors.is_empty(), card.id != id("B"));
        }
    }

    #[test]
    fn test_drag_preview_moves_card_and_connectors() {
        let tree = family();
        let c_origin = tree.position_of(&id("C")).unwrap();
        let mut view = ViewState {
            zoom: 1.0,
            ..ViewState::default()
        };

        // Press inside C's card, then drag right by 100px
        let press = view.layout_to_screen(c_origin.offset(10.0, 10.0));
        tree.pointer_down(&mut view, press);
        tree.pointer_move(&mut view, press.offset(100.0, 0.0));

        let frame = tree.render(&view);
        let last = frame.nodes.last().unwrap();
        assert_eq!(last.id, id("C"));
        assert!(last.dragging);
        assert_eq!(last.rect.min_x, c_origin.x + 100.0);

        let elbow = frame
            .connectors
            .iter()
            .find(|c| c.kind == ConnectorKind::ParentChild)
            .unwrap();
        let child_top = elbow.points.last().unwrap();
        assert_eq!(child_top.x, c_origin.x + 100.0 + tree.config().layout.card_width / 2.0);

        // Committed layout is untouched until the host applies the move
        assert_eq!(tree.position_of(&id("C")), Some(c_origin));

        let mut callbacks = RecordedCallbacks::default();
        tree.pointer_up(&mut view, &mut callbacks);
        assert_eq!(
            callbacks.calls,
            vec![CallbackEvent::Move {
                id: id("C"),
                x: c_origin.x + 100.0,
                y: c_origin.y
            }]
        );
    }

    #[test]
    fn test_apply_move_switches_to_manual_wholesale() {
        let mut tree = family();
        tree.apply_move(id("C"), 5.0, 5.0);
        assert_eq!(tree.manual_positions().get(&id("C")), Some(&Position::new(5.0, 5.0)));

        let frame = tree.render(&ViewState::default());
        assert_eq!(frame.position_source, PositionSource::Manual);
        assert_eq!(frame.nodes.len(), 1);
        assert_eq!(frame.warnings.unplaced, vec![id("A"), id("B")]);
        assert!(frame.connectors.is_empty());

        tree.clear_manual_positions();
        assert!(tree.manual_positions().is_empty());
        assert_eq!(tree.render(&ViewState::default()).nodes.len(), 3);
    }

    #[test]
    fn test_overlay_mode_keeps_everyone() {
        let config = TreeConfig {
            position_mode: PositionMode::Overlay,
            ..TreeConfig::default()
        };
        let mut tree = FamilyTree::with_config(config).unwrap();
        tree.set_snapshot(
            vec![Person::named("A", "A"), Person::named("B", "B")],
            vec![Relationship::spouse("r1", "A", "B")],
        );
        tree.apply_move(id("B"), 1000.0, 0.0);

        let frame = tree.render(&ViewState::default());
        assert_eq!(frame.position_source, PositionSource::Mixed);
        assert_eq!(frame.nodes.len(), 2);
        assert_eq!(frame.connectors.len(), 1);
    }

    #[test]
    fn test_menu_action_passes_display_name() {
        let tree = family();
        let mut callbacks = RecordedCallbacks::default();

        tree.menu_action(&id("C"), MenuAction::RecordMemory, &mut callbacks);
        tree.menu_action(&id("ghost"), MenuAction::Delete, &mut callbacks);
        tree.activate_anchor(&id("A"), QuickRelate::Child, &mut callbacks);

        assert_eq!(
            callbacks.calls,
            vec![
                CallbackEvent::RecordMemory {
                    id: id("C"),
                    name: "Carol Smith".into()
                },
                CallbackEvent::AddRelative {
                    id: id("A"),
                    relation: QuickRelate::Child
                },
            ]
        );
    }

    #[test]
    fn test_fit_and_visibility() {
        let tree = family();
        let mut view = ViewState::default();
        tree.fit(&mut view, 1200.0, 900.0);

        let mut visible = tree.visible_people(&view, 1200.0, 900.0);
        visible.sort();
        assert_eq!(visible, vec![id("A"), id("B"), id("C")]);

        let center = tree.bounds().unwrap().center();
        let screen = view.layout_to_screen(center);
        assert!((screen.x - 600.0).abs() < 1e-3);
        assert!((screen.y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn test_positions_buffer_matches_order() {
        let tree = family();
        let buffer = tree.positions_buffer();
        assert_eq!(buffer.len(), 6);

        let a = tree.position_of(&id("A")).unwrap();
        assert_eq!(&buffer[..2], &[a.x, a.y]);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let mut config = TreeConfig::default();
        config.layout.row_height = -1.0;
        assert!(FamilyTree::with_config(config).is_err());
    }
}

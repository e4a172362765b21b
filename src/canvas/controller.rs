//! Canvas controller - pan, zoom, drag and hover handling.
//!
//! The controller is stateless apart from its configuration; every operation
//! takes the `ViewState` it acts on. Nothing here can fail: zoom is clamped,
//! stray pointer events are ignored.

use crate::config::CanvasConfig;
use crate::model::{PersonId, Position, PositionMap, Rect};
use crate::spatial::SpatialIndex;

use super::callbacks::{MenuAction, QuickRelate, TreeCallbacks};
use super::state::{NodeDrag, PanDrag, ViewState};

/// Interactive controller for one or more tree views.
#[derive(Debug, Clone, Default)]
pub struct CanvasController {
    config: CanvasConfig,
}

impl CanvasController {
    /// Create a controller with the given configuration.
    pub fn new(config: CanvasConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Fresh view state for this controller.
    pub fn new_state(&self) -> ViewState {
        ViewState::new(&self.config)
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Multiply zoom by the button step.
    pub fn zoom_in(&self, state: &mut ViewState) {
        state.zoom = self.config.clamp_zoom(state.zoom * self.config.zoom_step);
    }

    /// Divide zoom by the button step.
    pub fn zoom_out(&self, state: &mut ViewState) {
        state.zoom = self.config.clamp_zoom(state.zoom / self.config.zoom_step);
    }

    /// One wheel tick. Negative `delta_y` zooms in. The layout point under
    /// `anchor` (screen) stays put.
    pub fn wheel(&self, state: &mut ViewState, delta_y: f32, anchor: Position) {
        let factor = if delta_y > 0.0 {
            1.0 / self.config.wheel_step
        } else if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            return;
        };

        let current = self.config.clamp_zoom(state.zoom);
        let new_zoom = self.config.clamp_zoom(current * factor);
        let ratio = new_zoom / current;
        state.pan = Position::new(
            anchor.x - (anchor.x - state.pan.x) * ratio,
            anchor.y - (anchor.y - state.pan.y) * ratio,
        );
        state.zoom = new_zoom;
    }

    /// Default zoom, pan at origin, no gesture in progress.
    pub fn reset(&self, state: &mut ViewState) {
        let hovered = state.hovered.take();
        *state = self.new_state();
        state.hovered = hovered;
    }

    /// Zoom and pan so `bounds` fits a `width` × `height` viewport.
    ///
    /// Falls back to `reset` when there is nothing to fit.
    pub fn fit(&self, state: &mut ViewState, bounds: Option<Rect>, width: f32, height: f32) {
        let Some(bounds) = bounds else {
            self.reset(state);
            return;
        };

        let padding = self.config.fit_padding;
        let available_w = (width - 2.0 * padding).max(1.0);
        let available_h = (height - 2.0 * padding).max(1.0);
        let zoom_w = available_w / bounds.width().max(1.0);
        let zoom_h = available_h / bounds.height().max(1.0);
        let zoom = self.config.clamp_zoom(zoom_w.min(zoom_h));

        let center = bounds.center();
        state.zoom = zoom;
        state.pan = Position::new(width / 2.0 - center.x * zoom, height / 2.0 - center.y * zoom);
        state.pan_drag = None;
        state.node_drag = None;
    }

    // =========================================================================
    // Pointer gestures
    // =========================================================================

    /// Pointer pressed at `screen`. Starts a node drag when a card is hit,
    /// otherwise a background pan.
    pub fn pointer_down(
        &self,
        state: &mut ViewState,
        screen: Position,
        cards: &SpatialIndex,
        positions: &PositionMap,
    ) {
        let layout = state.screen_to_layout(screen);
        let hit = cards
            .hit(layout.x, layout.y)
            .and_then(|id| positions.get(id).map(|&origin| (id.clone(), origin)));

        match hit {
            Some((person_id, origin)) => {
                state.pan_drag = None;
                state.node_drag = Some(NodeDrag {
                    person_id,
                    pointer_start: screen,
                    node_start: origin,
                    current: origin,
                    moved: false,
                });
            }
            None => {
                state.node_drag = None;
                state.pan_drag = Some(PanDrag {
                    pointer_start: screen,
                    pan_start: state.pan,
                });
            }
        }
    }

    /// Pointer moved to `screen`. Updates the active gesture, or hover when
    /// idle.
    pub fn pointer_move(&self, state: &mut ViewState, screen: Position, cards: &SpatialIndex) {
        let zoom = self.config.clamp_zoom(state.zoom);
        if let Some(drag) = state.node_drag.as_mut() {
            let dx = screen.x - drag.pointer_start.x;
            let dy = screen.y - drag.pointer_start.y;
            if !drag.moved && dx.hypot(dy) >= self.config.drag_threshold {
                drag.moved = true;
            }
            if drag.moved {
                drag.current = drag.node_start.offset(dx / zoom, dy / zoom);
            }
            return;
        }

        if let Some(pan) = state.pan_drag {
            state.pan = Position::new(
                pan.pan_start.x + (screen.x - pan.pointer_start.x),
                pan.pan_start.y + (screen.y - pan.pointer_start.y),
            );
            return;
        }

        let layout = state.screen_to_layout(screen);
        let hovered = cards.hit(layout.x, layout.y).cloned();
        self.set_hover(state, hovered);
    }

    /// Pointer released. A moved node fires `move_person` with its final
    /// layout position; an unmoved press fires `select_person`.
    pub fn pointer_up(&self, state: &mut ViewState, callbacks: &mut dyn TreeCallbacks) {
        state.pan_drag = None;
        if let Some(drag) = state.node_drag.take() {
            if drag.moved {
                log::debug!("moved {} to ({}, {})", drag.person_id, drag.current.x, drag.current.y);
                callbacks.move_person(&drag.person_id, drag.current.x, drag.current.y);
            } else {
                callbacks.select_person(&drag.person_id);
            }
        }
    }

    /// Pointer left the canvas. Ends any gesture (a moved node is committed)
    /// and clears hover.
    pub fn pointer_leave(&self, state: &mut ViewState, callbacks: &mut dyn TreeCallbacks) {
        state.pan_drag = None;
        if let Some(drag) = state.node_drag.take() {
            if drag.moved {
                callbacks.move_person(&drag.person_id, drag.current.x, drag.current.y);
            }
        }
        state.hovered = None;
    }

    // =========================================================================
    // Hover affordances
    // =========================================================================

    /// Set or clear the hovered person.
    pub fn set_hover(&self, state: &mut ViewState, person: Option<PersonId>) {
        if state.hovered != person {
            state.hovered = person;
        }
    }

    /// A quick-relate anchor on `id`'s card was activated.
    pub fn activate_anchor(
        &self,
        id: &PersonId,
        relation: QuickRelate,
        callbacks: &mut dyn TreeCallbacks,
    ) {
        callbacks.add_relative(id, relation);
    }

    /// A context menu entry on `id`'s card was chosen.
    pub fn menu_action(
        &self,
        id: &PersonId,
        name: &str,
        action: MenuAction,
        callbacks: &mut dyn TreeCallbacks,
    ) {
        match action {
            MenuAction::Edit => callbacks.edit_person(id),
            MenuAction::RecordMemory => callbacks.record_memory_about(id, name),
            MenuAction::Delete => callbacks.delete_person(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::callbacks::{CallbackEvent, RecordedCallbacks};

    fn controller() -> CanvasController {
        CanvasController::default()
    }

    #[test]
    fn test_new_state_uses_configured_zoom() {
        let controller = CanvasController::new(CanvasConfig {
            default_zoom: 1.5,
            ..CanvasConfig::default()
        });
        assert_eq!(controller.config().default_zoom, 1.5);
        assert_eq!(controller.new_state().zoom, 1.5);
    }

    fn scene() -> (SpatialIndex, PositionMap) {
        let origin = Position::new(0.0, 0.0);
        let positions = PositionMap::from([(PersonId::new("a"), origin)]);
        let mut cards = SpatialIndex::new();
        cards.rebuild(&[(PersonId::new("a"), Rect::from_origin(origin, 100.0, 100.0))]);
        (cards, positions)
    }

    fn identity_state() -> ViewState {
        ViewState {
            zoom: 1.0,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_zoom_in_never_exceeds_max() {
        let controller = controller();
        for start in [0.3, 0.8, 2.9, 3.0] {
            let mut state = ViewState { zoom: start, ..ViewState::default() };
            for _ in 0..50 {
                controller.zoom_in(&mut state);
                assert!(state.zoom <= 3.0);
            }
            assert_eq!(state.zoom, 3.0);
        }
    }

    #[test]
    fn test_zoom_out_never_below_min() {
        let controller = controller();
        let mut state = ViewState { zoom: 2.5, ..ViewState::default() };
        for _ in 0..50 {
            controller.zoom_out(&mut state);
            assert!(state.zoom >= 0.3);
        }
        assert_eq!(state.zoom, 0.3);
    }

    #[test]
    fn test_zoom_step_factor() {
        let controller = controller();
        let mut state = identity_state();
        controller.zoom_in(&mut state);
        assert!((state.zoom - 1.2).abs() < 1e-6);
        controller.zoom_out(&mut state);
        assert!((state.zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_keeps_anchor_fixed() {
        let controller = controller();
        let mut state = identity_state();
        let anchor = Position::new(200.0, 100.0);
        let before = state.screen_to_layout(anchor);

        controller.wheel(&mut state, -1.0, anchor);
        assert!((state.zoom - 1.1).abs() < 1e-6);

        let after = state.screen_to_layout(anchor);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);

        controller.wheel(&mut state, 0.0, anchor);
        assert!((state.zoom - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_clamped() {
        let controller = controller();
        let mut state = identity_state();
        for _ in 0..100 {
            controller.wheel(&mut state, 1.0, Position::default());
        }
        assert_eq!(state.zoom, 0.3);
    }

    #[test]
    fn test_wheel_from_out_of_range_zoom() {
        let controller = controller();
        let mut state = ViewState {
            zoom: 0.0,
            ..ViewState::default()
        };

        controller.wheel(&mut state, -1.0, Position::new(10.0, 10.0));

        assert!((state.zoom - 0.33).abs() < 1e-6);
        assert!(state.pan.x.is_finite());
        assert!(state.pan.y.is_finite());
    }

    #[test]
    fn test_reset() {
        let controller = controller();
        let mut state = ViewState {
            zoom: 2.0,
            pan: Position::new(40.0, 40.0),
            ..ViewState::default()
        };
        controller.reset(&mut state);
        assert_eq!(state.zoom, 0.8);
        assert_eq!(state.pan, Position::default());
    }

    #[test]
    fn test_fit_centers_bounds() {
        let controller = controller();
        let mut state = ViewState::default();
        let bounds = Rect::from_origin(Position::new(-100.0, 0.0), 200.0, 100.0);

        controller.fit(&mut state, Some(bounds), 480.0, 280.0);

        // Available 400 x 200, so zoom = min(2, 2) = 2
        assert_eq!(state.zoom, 2.0);
        let center = state.layout_to_screen(bounds.center());
        assert_eq!(center, Position::new(240.0, 140.0));

        controller.fit(&mut state, None, 480.0, 280.0);
        assert_eq!(state.zoom, 0.8);
    }

    #[test]
    fn test_background_pan() {
        let controller = controller();
        let (cards, positions) = scene();
        let mut state = identity_state();
        let mut callbacks = RecordedCallbacks::default();

        controller.pointer_down(&mut state, Position::new(500.0, 500.0), &cards, &positions);
        assert!(state.is_panning());
        assert!(state.dragging_person_id().is_none());

        controller.pointer_move(&mut state, Position::new(530.0, 480.0), &cards);
        assert_eq!(state.pan, Position::new(30.0, -20.0));

        controller.pointer_up(&mut state, &mut callbacks);
        assert!(!state.is_panning());
        assert!(callbacks.calls.is_empty());

        // Moving after release no longer pans
        controller.pointer_move(&mut state, Position::new(900.0, 900.0), &cards);
        assert_eq!(state.pan, Position::new(30.0, -20.0));
    }

    #[test]
    fn test_node_drag_fires_move() {
        let controller = controller();
        let (cards, positions) = scene();
        let mut state = ViewState {
            zoom: 2.0,
            ..ViewState::default()
        };
        let mut callbacks = RecordedCallbacks::default();

        // Screen (20, 20) is layout (10, 10), inside card "a"
        controller.pointer_down(&mut state, Position::new(20.0, 20.0), &cards, &positions);
        assert_eq!(state.dragging_person_id(), Some(&PersonId::new("a")));
        assert!(!state.is_panning());

        controller.pointer_move(&mut state, Position::new(120.0, 60.0), &cards);
        assert_eq!(state.drag_preview().map(|(_, p)| p), Some(Position::new(50.0, 20.0)));
        // Node drags never pan
        assert_eq!(state.pan, Position::default());

        controller.pointer_up(&mut state, &mut callbacks);
        assert_eq!(
            callbacks.calls,
            vec![CallbackEvent::Move {
                id: PersonId::new("a"),
                x: 50.0,
                y: 20.0
            }]
        );
        assert!(state.dragging_person_id().is_none());
    }

    #[test]
    fn test_click_without_movement_selects() {
        let controller = controller();
        let (cards, positions) = scene();
        let mut state = identity_state();
        let mut callbacks = RecordedCallbacks::default();

        controller.pointer_down(&mut state, Position::new(10.0, 10.0), &cards, &positions);
        controller.pointer_move(&mut state, Position::new(11.0, 11.0), &cards);
        controller.pointer_up(&mut state, &mut callbacks);

        assert_eq!(callbacks.calls, vec![CallbackEvent::Select { id: PersonId::new("a") }]);
    }

    #[test]
    fn test_pointer_leave_ends_gestures() {
        let controller = controller();
        let (cards, positions) = scene();
        let mut state = identity_state();
        let mut callbacks = RecordedCallbacks::default();

        controller.pointer_down(&mut state, Position::new(500.0, 500.0), &cards, &positions);
        state.hovered = Some(PersonId::new("a"));
        controller.pointer_leave(&mut state, &mut callbacks);

        assert!(!state.is_panning());
        assert!(state.hovered.is_none());
        assert!(callbacks.calls.is_empty());
    }

    #[test]
    fn test_pointer_leave_commits_moved_drag() {
        let controller = controller();
        let (cards, positions) = scene();
        let mut state = identity_state();
        let mut callbacks = RecordedCallbacks::default();

        controller.pointer_down(&mut state, Position::new(10.0, 10.0), &cards, &positions);
        controller.pointer_move(&mut state, Position::new(40.0, 30.0), &cards);
        controller.pointer_leave(&mut state, &mut callbacks);

        assert_eq!(
            callbacks.calls,
            vec![CallbackEvent::Move {
                id: PersonId::new("a"),
                x: 30.0,
                y: 20.0
            }]
        );
        assert!(state.dragging_person_id().is_none());
    }

    #[test]
    fn test_hover_follows_pointer_when_idle() {
        let controller = controller();
        let (cards, _) = scene();
        let mut state = identity_state();

        controller.pointer_move(&mut state, Position::new(50.0, 50.0), &cards);
        assert_eq!(state.hovered, Some(PersonId::new("a")));

        controller.pointer_move(&mut state, Position::new(300.0, 50.0), &cards);
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn test_affordances_dispatch() {
        let controller = controller();
        let id = PersonId::new("a");
        let mut callbacks = RecordedCallbacks::default();

        controller.activate_anchor(&id, QuickRelate::Spouse, &mut callbacks);
        controller.menu_action(&id, "Ada", MenuAction::Edit, &mut callbacks);
        controller.menu_action(&id, "Ada", MenuAction::RecordMemory, &mut callbacks);
        controller.menu_action(&id, "Ada", MenuAction::Delete, &mut callbacks);

        assert_eq!(
            callbacks.calls,
            vec![
                CallbackEvent::AddRelative {
                    id: id.clone(),
                    relation: QuickRelate::Spouse
                },
                CallbackEvent::Edit { id: id.clone() },
                CallbackEvent::RecordMemory {
                    id: id.clone(),
                    name: "Ada".into()
                },
                CallbackEvent::Delete { id },
            ]
        );
    }
}

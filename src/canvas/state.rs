//! View state owned by the host, one per tree view.
//!
//! Screen coordinates relate to layout coordinates through
//! `screen = layout * zoom + pan`.

use serde::Serialize;

use crate::config::CanvasConfig;
use crate::model::{PersonId, Position};

/// Canvas background drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    /// Pointer position when the drag started (screen).
    pub pointer_start: Position,
    /// Pan offset when the drag started.
    pub pan_start: Position,
}

/// Node drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDrag {
    /// Person being dragged.
    pub person_id: PersonId,
    /// Pointer position when the drag started (screen).
    pub pointer_start: Position,
    /// Card origin when the drag started (layout).
    pub node_start: Position,
    /// Current card origin (layout).
    pub current: Position,
    /// Whether the pointer has travelled past the drag threshold.
    pub moved: bool,
}

/// Pan, zoom, drag and hover state for one tree view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Zoom factor.
    pub zoom: f32,
    /// Pan offset in screen pixels.
    pub pan: Position,
    /// Background pan, if active.
    pub pan_drag: Option<PanDrag>,
    /// Node drag, if active.
    pub node_drag: Option<NodeDrag>,
    /// Hovered person.
    pub hovered: Option<PersonId>,
}

impl ViewState {
    /// Fresh state at the configured default zoom.
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            zoom: config.clamp_zoom(config.default_zoom),
            pan: Position::default(),
            pan_drag: None,
            node_drag: None,
            hovered: None,
        }
    }

    /// Whether the canvas background is being dragged.
    pub fn is_panning(&self) -> bool {
        self.pan_drag.is_some()
    }

    /// Person currently being dragged.
    pub fn dragging_person_id(&self) -> Option<&PersonId> {
        self.node_drag.as_ref().map(|drag| &drag.person_id)
    }

    /// Preview origin of the dragged card, once it has actually moved.
    pub fn drag_preview(&self) -> Option<(&PersonId, Position)> {
        self.node_drag
            .as_ref()
            .filter(|drag| drag.moved)
            .map(|drag| (&drag.person_id, drag.current))
    }

    /// Screen → layout.
    pub fn screen_to_layout(&self, screen: Position) -> Position {
        Position::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Layout → screen.
    pub fn layout_to_screen(&self, layout: Position) -> Position {
        Position::new(
            layout.x * self.zoom + self.pan.x,
            layout.y * self.zoom + self.pan.y,
        )
    }

    /// Serializable transform for drawing.
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan_x: self.pan.x,
            pan_y: self.pan.y,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

/// Transform applied to the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    /// Zoom factor.
    pub zoom: f32,
    /// Horizontal pan in screen pixels.
    pub pan_x: f32,
    /// Vertical pan in screen pixels.
    pub pan_y: f32,
}

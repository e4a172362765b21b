//! Configuration for layout, canvas interaction and card rendering.
//!
//! Every struct deserializes from camelCase JSON with all fields optional, so
//! the host page only passes what it wants to change.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::model::{Position, Rect};

/// Fixed spacing constants for the generational layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Card width.
    pub card_width: f32,
    /// Card height.
    pub card_height: f32,
    /// Vertical distance between generation rows.
    pub row_height: f32,
    /// Horizontal gap between neighbouring cards.
    pub gutter: f32,
    /// Y of generation 0.
    pub top_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 200.0,
            card_height: 240.0,
            row_height: 320.0,
            gutter: 60.0,
            top_margin: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Card rectangle for a top-left corner.
    pub fn card_rect(&self, origin: Position) -> Rect {
        Rect::from_origin(origin, self.card_width, self.card_height)
    }
}

/// Zoom limits and gesture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Zoom after a reset.
    pub default_zoom: f32,
    /// Lower zoom clamp.
    pub min_zoom: f32,
    /// Upper zoom clamp.
    pub max_zoom: f32,
    /// Factor for zoom-in / zoom-out buttons.
    pub zoom_step: f32,
    /// Factor per wheel tick.
    pub wheel_step: f32,
    /// Screen pixels a node must travel before a press becomes a drag.
    pub drag_threshold: f32,
    /// Screen pixels kept free around the tree when fitting.
    pub fit_padding: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_zoom: 0.8,
            min_zoom: 0.3,
            max_zoom: 3.0,
            zoom_step: 1.2,
            wheel_step: 1.1,
            drag_threshold: 4.0,
            fit_padding: 40.0,
        }
    }
}

impl CanvasConfig {
    /// Clamp a zoom factor into range. NaN falls back to the default zoom.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return self.default_zoom.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Card decoration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardConfig {
    /// Characters of the display name shown before truncating.
    pub name_char_budget: usize,
    /// Distance of quick-relate anchors from the card edge.
    pub anchor_offset: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name_char_budget: 18,
            anchor_offset: 16.0,
        }
    }
}

/// How manual overrides combine with the computed layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionMode {
    /// Any manual position switches the whole tree to the manual map.
    /// People without a manual position are not drawn.
    #[default]
    Wholesale,
    /// Manual positions replace computed ones per person.
    Overlay,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Layout spacing.
    pub layout: LayoutConfig,
    /// Canvas interaction.
    pub canvas: CanvasConfig,
    /// Card decoration.
    pub card: CardConfig,
    /// Manual override policy.
    pub position_mode: PositionMode,
}

impl TreeConfig {
    /// Check the values the layout depends on.
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let sizes = [
            ("cardWidth", layout.card_width),
            ("cardHeight", layout.card_height),
            ("rowHeight", layout.row_height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(TreeError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(layout.gutter.is_finite() && layout.gutter >= 0.0) {
            return Err(TreeError::InvalidConfig(format!(
                "gutter must be non-negative, got {}",
                layout.gutter
            )));
        }

        let canvas = &self.canvas;
        if !(canvas.min_zoom > 0.0 && canvas.min_zoom <= canvas.max_zoom) {
            return Err(TreeError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty",
                canvas.min_zoom, canvas.max_zoom
            )));
        }
        if canvas.zoom_step <= 1.0 || canvas.wheel_step <= 1.0 {
            return Err(TreeError::InvalidConfig("zoom steps must exceed 1".into()));
        }
        Ok(())
    }
}

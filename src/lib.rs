//! Family Tree - WASM Module
//!
//! Generational layout and interactive rendering for family trees. People and
//! relationships go in; card positions, connector geometry and per-card draw
//! descriptions come out. Compiled to WebAssembly and exposed to JavaScript via
//! wasm-bindgen; every stage is also usable natively.
//!
//! # Architecture
//!
//! - `model`: people, relationships, positions
//! - `graph`: relationship index (spouse/children/parents adjacency)
//! - `layout`: generation assignment, layered positions, manual overrides,
//!   connectors
//! - `spatial`: R-tree of card rectangles for hit testing
//! - `canvas`: pan, zoom, drag and hover handling
//! - `render`: card descriptions and the per-frame render pass

use js_sys::Float32Array;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod render;
pub mod spatial;

use canvas::{MenuAction, QuickRelate, RecordedCallbacks, ViewState};
use config::TreeConfig;
use error::TreeError;
use model::{Person, PersonId, Position, PositionMap, Rect, Relationship};
use render::FamilyTree;

/// Initialize the WASM module: console logging and panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("family tree module initialized");
}

fn js_error(err: TreeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| js_error(TreeError::Serialization(e.to_string())))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| js_error(TreeError::Serialization(e.to_string())))
}

/// Check a relationship list before it is written to the data store.
///
/// Rejects self-relationships, duplicates and unknown endpoints.
#[wasm_bindgen(js_name = validateRelationships)]
pub fn validate_relationships(people: JsValue, relationships: JsValue) -> Result<(), JsValue> {
    let people: Vec<Person> = from_js(people)?;
    let relationships: Vec<Relationship> = from_js(relationships)?;
    model::validate_relationships(&people, &relationships).map_err(js_error)
}

/// Main entry point for one tree view.
///
/// Wraps a `FamilyTree` and the `ViewState` of the canvas showing it.
/// Gesture methods return the host callbacks they triggered as an array of
/// `{ type, id, ... }` events.
#[wasm_bindgen]
pub struct FamilyTreeWasm {
    tree: FamilyTree,
    view: ViewState,
}

#[wasm_bindgen]
impl FamilyTreeWasm {
    /// Create an empty tree with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let tree = FamilyTree::new();
        let view = tree.controller().new_state();
        Self { tree, view }
    }

    /// Create an empty tree from a (partial) configuration object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<FamilyTreeWasm, JsValue> {
        let config: TreeConfig = from_js(config)?;
        let tree = FamilyTree::with_config(config).map_err(js_error)?;
        let view = tree.controller().new_state();
        Ok(Self { tree, view })
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Replace people and relationships. Triggers a relayout.
    #[wasm_bindgen(js_name = setSnapshot)]
    pub fn set_snapshot(&mut self, people: JsValue, relationships: JsValue) -> Result<(), JsValue> {
        let people: Vec<Person> = from_js(people)?;
        let relationships: Vec<Relationship> = from_js(relationships)?;
        self.tree.set_snapshot(people, relationships);
        Ok(())
    }

    /// Replace manual positions (`{ [personId]: { x, y } }`). Triggers a
    /// relayout.
    #[wasm_bindgen(js_name = setManualPositions)]
    pub fn set_manual_positions(&mut self, positions: JsValue) -> Result<(), JsValue> {
        let positions: PositionMap = from_js(positions)?;
        self.tree.set_manual_positions(positions);
        Ok(())
    }

    /// Record one persisted manual position.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, person_id: &str, x: f32, y: f32) {
        self.tree.apply_move(PersonId::new(person_id), x, y);
    }

    /// Drop all manual positions.
    #[wasm_bindgen(js_name = clearManualPositions)]
    pub fn clear_manual_positions(&mut self) {
        self.tree.clear_manual_positions();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the current frame: cards, connectors, transform, bounds and
    /// warnings.
    pub fn render(&self) -> Result<JsValue, JsValue> {
        to_js(&self.tree.render(&self.view))
    }

    /// Warnings from the last layout pass.
    #[wasm_bindgen(js_name = getWarnings)]
    pub fn get_warnings(&self) -> Result<JsValue, JsValue> {
        to_js(&self.tree.layout().warnings)
    }

    /// Final card origins as `[x0, y0, x1, y1, ...]` in draw order.
    #[wasm_bindgen(js_name = getPositionsBuffer)]
    pub fn get_positions_buffer(&self) -> Float32Array {
        Float32Array::from(self.tree.positions_buffer().as_slice())
    }

    /// Generation of a person.
    #[wasm_bindgen(js_name = generationOf)]
    pub fn generation_of(&self, person_id: &str) -> Option<u32> {
        self.tree.generation_of(&PersonId::new(person_id))
    }

    /// Card bounds as `[minX, minY, maxX, maxY]`.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.tree
            .bounds()
            .map(|b| vec![b.min_x, b.min_y, b.max_x, b.max_y])
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Person under a screen point.
    #[wasm_bindgen(js_name = personAt)]
    pub fn person_at(&self, x: f32, y: f32) -> Option<String> {
        self.tree
            .person_at(&self.view, Position::new(x, y))
            .map(|id| id.to_string())
    }

    /// People whose cards intersect a layout-space rectangle.
    #[wasm_bindgen(js_name = peopleInRect)]
    pub fn people_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<String> {
        let rect = Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        };
        self.tree
            .people_in_rect(&rect)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    /// People visible in a viewport of the given size.
    #[wasm_bindgen(js_name = visiblePeople)]
    pub fn visible_people(&self, width: f32, height: f32) -> Vec<String> {
        self.tree
            .visible_people(&self.view, width, height)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    // =========================================================================
    // View Controls
    // =========================================================================

    /// Zoom in one step.
    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.tree.controller().zoom_in(&mut self.view);
    }

    /// Zoom out one step.
    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.tree.controller().zoom_out(&mut self.view);
    }

    /// Wheel zoom around a screen point.
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) {
        self.tree
            .controller()
            .wheel(&mut self.view, delta_y, Position::new(x, y));
    }

    /// Default zoom, pan at origin.
    pub fn reset(&mut self) {
        self.tree.controller().reset(&mut self.view);
    }

    /// Fit the tree into a viewport of the given size.
    pub fn fit(&mut self, width: f32, height: f32) {
        self.tree.fit(&mut self.view, width, height);
    }

    /// Current zoom.
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f32 {
        self.view.zoom
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Pointer pressed at a screen point.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.tree.pointer_down(&mut self.view, Position::new(x, y));
    }

    /// Pointer moved to a screen point.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.tree.pointer_move(&mut self.view, Position::new(x, y));
    }

    /// Pointer released. Returns `move` or `select` events.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<JsValue, JsValue> {
        let mut callbacks = RecordedCallbacks::default();
        self.tree.pointer_up(&mut self.view, &mut callbacks);
        to_js(&callbacks.calls)
    }

    /// Pointer left the canvas. Returns a `move` event if a drag was under way.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<JsValue, JsValue> {
        let mut callbacks = RecordedCallbacks::default();
        self.tree.pointer_leave(&mut self.view, &mut callbacks);
        to_js(&callbacks.calls)
    }

    /// Quick-relate anchor clicked (`"parent" | "child" | "spouse" | "sibling"`).
    #[wasm_bindgen(js_name = activateAnchor)]
    pub fn activate_anchor(&self, person_id: &str, relation: JsValue) -> Result<JsValue, JsValue> {
        let relation: QuickRelate = from_js(relation)?;
        let mut callbacks = RecordedCallbacks::default();
        self.tree
            .activate_anchor(&PersonId::new(person_id), relation, &mut callbacks);
        to_js(&callbacks.calls)
    }

    /// Context menu entry chosen (`"edit" | "recordMemory" | "delete"`).
    #[wasm_bindgen(js_name = menuAction)]
    pub fn menu_action(&self, person_id: &str, action: JsValue) -> Result<JsValue, JsValue> {
        let action: MenuAction = from_js(action)?;
        let mut callbacks = RecordedCallbacks::default();
        self.tree
            .menu_action(&PersonId::new(person_id), action, &mut callbacks);
        to_js(&callbacks.calls)
    }
}

impl Default for FamilyTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}

//! Interactive canvas: view state, gesture handling and host callbacks.

mod callbacks;
mod controller;
mod state;

pub use callbacks::{CallbackEvent, MenuAction, QuickRelate, RecordedCallbacks, TreeCallbacks};
pub use controller::CanvasController;
pub use state::{NodeDrag, PanDrag, ViewState, ViewTransform};

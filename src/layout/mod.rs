//! Family tree layout.
//!
//! CPU-side pipeline that turns people and relationships into card positions
//! and connector geometry. Every stage is a pure function of its input and is
//! rerun from scratch whenever the snapshot or the manual positions change.

pub mod connectors;
pub mod generation;
pub mod layered;
pub mod pass;
pub mod positions;

pub use connectors::{Connector, ConnectorBuilder, ConnectorKind};
pub use generation::GenerationAssignment;
pub use layered::{LayeredLayout, LayeredResult};
pub use pass::{LayoutPass, LayoutWarnings};
pub use positions::{resolve_positions, PositionSource, ResolvedPositions};

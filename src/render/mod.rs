//! Card rendering and the per-frame render pass.

pub mod node;
pub mod scene;

pub use node::{truncate_name, Anchor, MenuItem, NodeCard, NodeRenderer, Portrait};
pub use scene::{FamilyTree, RenderPass};

//! Scene kernel: the node tree every other cadence system reads and writes.
//!
//! # Invariants
//! - Every node appears in at most one parent's children list.
//! - A parent's name index only ever points at its own current children.
//! - Structural mutations either fully apply or leave the tree unchanged.
//! - Snapshot fields are written by the pre-simulation pass only.

pub mod node;
pub mod simulate;
pub mod tree;

pub use node::{
    Behavior, Camera, Node, NodeClass, NodeKind, Renderable, RenderedEvent, SceneData,
    SimulatedEvent, Spatial, TickContext,
};
pub use simulate::ScenePass;
pub use tree::{SceneTree, TreeError};

pub fn crate_info() -> &'static str {
    "cadence-kernel v0.1.0"
}

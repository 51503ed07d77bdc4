//! Rendering adapter: renderer-agnostic draw requests built from the scene tree.
//!
//! # Invariants
//! - Rendering never mutates the tree; it reads current state and pre-tick snapshots.
//! - Positions handed to a renderer are interpolated with `lerp(prev, cur, alpha)`.
//!
//! Backends implement [`Renderer`]. GPU submission lives outside this crate;
//! a debug text renderer and a recording renderer are provided for tools and tests.

mod frame;
mod renderer;

pub use frame::{EntityDraw, RenderView, collect_scene, scene_view};
pub use renderer::{
    DebugTextRenderer, DrawRequest, FrameInfo, RecordingRenderer, RenderError, RenderKind,
    Renderer, TextureHandle,
};

pub fn crate_info() -> &'static str {
    "cadence-render v0.1.0"
}

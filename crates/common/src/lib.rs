//! Shared value types for the cadence engine: node identity, colours and
//! sprite descriptions.
//!
//! # Invariants
//! - A fresh `NodeId` is a random v4 UUID and never equals an earlier one.
//! - `lerp` and `lerp_vec2` are unclamped: an alpha outside `[0, 1]` extrapolates.
//! - `Sprite::default()` draws a single visible red rectangle.

mod types;

pub use glam::Vec2;
pub use types::{Color, NodeId, Shape, Sprite, TextureLayer, lerp, lerp_vec2};

pub fn crate_info() -> &'static str {
    "cadence-common v0.1.0"
}

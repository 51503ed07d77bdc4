use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in the scene tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// An RGBA colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (the leading `#` is optional). Alpha is always opaque.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Channels scaled to `0.0..=1.0`, in RGBA order.
    pub fn to_normalized(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Primitive shapes a [`TextureLayer::Shape`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Rectangle,
    Ellipse,
}

/// One layer of a sprite. Layers are drawn in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextureLayer {
    /// An image referenced by URL or path, tinted by `tint`.
    Image { source: String, tint: Color },
    /// A flat-coloured primitive.
    Shape { shape: Shape, color: Color },
}

impl TextureLayer {
    pub fn image(source: impl Into<String>) -> Self {
        Self::Image {
            source: source.into(),
            tint: Color::WHITE,
        }
    }

    pub fn rectangle(color: Color) -> Self {
        Self::Shape {
            shape: Shape::Rectangle,
            color,
        }
    }
}

/// Describes how a renderable node is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub layers: Vec<TextureLayer>,
    pub visible: bool,
    /// Draw order within a scene; lower values are drawn first.
    pub z_index: i32,
}

impl Sprite {
    pub fn new(layers: Vec<TextureLayer>) -> Self {
        Self {
            layers,
            visible: true,
            z_index: 0,
        }
    }

    pub fn single(layer: TextureLayer) -> Self {
        Self::new(vec![layer])
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::single(TextureLayer::rectangle(Color::RED))
    }
}

/// Linear interpolation: `prev + (current - prev) * alpha`.
pub fn lerp(prev: f32, current: f32, alpha: f32) -> f32 {
    prev + (current - prev) * alpha
}

/// Component-wise [`lerp`] for vectors.
pub fn lerp_vec2(prev: Vec2, current: Vec2, alpha: f32) -> Vec2 {
    prev + (current - prev) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_uniqueness() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::GREEN));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn color_normalized() {
        let c = Color::rgba(255, 0, 51, 255).to_normalized();
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.2).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn default_sprite_is_red_rectangle() {
        let s = Sprite::default();
        assert!(s.visible);
        assert_eq!(s.z_index, 0);
        assert_eq!(s.layers, vec![TextureLayer::rectangle(Color::RED)]);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let prev = Vec2::new(0.0, 0.0);
        let cur = Vec2::new(10.0, 0.0);
        assert_eq!(lerp_vec2(prev, cur, 0.0), Vec2::new(0.0, 0.0));
        assert_eq!(lerp_vec2(prev, cur, 0.5), Vec2::new(5.0, 0.0));
        assert_eq!(lerp_vec2(prev, cur, 1.0), Vec2::new(10.0, 0.0));
        assert_eq!(lerp(1.0, 3.0, 0.25), 1.5);
    }
}

use cadence_common::{Color, NodeId};
use glam::Vec2;
use std::fmt::Write as _;

/// How a draw request fills its quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    /// Sample `texture`, tinted by `color`.
    Image,
    /// Fill with `color`.
    Solid,
}

/// Opaque reference to a texture the backend resolves and caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub String);

/// One quad to draw. Positions and sizes are in camera-relative screen units
/// with the origin at the screen centre.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub node: NodeId,
    pub color: Color,
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub kind: RenderKind,
    pub texture: Option<TextureHandle>,
}

impl DrawRequest {
    /// Map position and size into clip space for a unit quad spanning `[-1, 1]`.
    /// Returns `(centre, half_extent)`.
    pub fn to_clip_space(&self, screen_size: Vec2) -> (Vec2, Vec2) {
        let screen = screen_size.max(Vec2::ONE);
        (self.position / (screen * 0.5), self.size / screen)
    }
}

/// Per-frame values passed to [`Renderer::begin_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame: u64,
    pub alpha: f32,
    pub background: Color,
    pub screen_size: Vec2,
}

/// Errors a backend may raise. Any of them ends the game session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("render backend failure: {0}")]
    Backend(String),
    #[error("render surface lost")]
    SurfaceLost,
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The renderer receives finished draw requests; it never sees the tree.
pub trait Renderer {
    fn begin_frame(&mut self, _frame: &FrameInfo) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw(&mut self, request: &DrawRequest) -> Result<(), RenderError>;

    fn end_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Produces a human-readable line per draw request. Useful for the CLI,
/// logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    output: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Return everything written so far and clear the buffer.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Renderer for DebugTextRenderer {
    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), RenderError> {
        let _ = writeln!(
            self.output,
            "=== Frame {} (alpha={:.2}, screen={:.0}x{:.0}) ===",
            frame.frame, frame.alpha, frame.screen_size.x, frame.screen_size.y
        );
        Ok(())
    }

    fn draw(&mut self, request: &DrawRequest) -> Result<(), RenderError> {
        let kind = match request.kind {
            RenderKind::Image => "image",
            RenderKind::Solid => "solid",
        };
        let _ = writeln!(
            self.output,
            "  [{}] {kind} pos=({:.2}, {:.2}) size=({:.2}, {:.2}) rot={:.2}",
            request.node.short(),
            request.position.x,
            request.position.y,
            request.size.x,
            request.size.y,
            request.rotation,
        );
        Ok(())
    }
}

/// Keeps every request, grouped per frame. Can be told to fail, to exercise
/// fatal render error handling.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Vec<DrawRequest>>,
    /// Fail the draw call once this many requests have succeeded in total.
    pub fail_after: Option<usize>,
    drawn: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(draws: usize) -> Self {
        Self {
            fail_after: Some(draws),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> &[DrawRequest] {
        self.frames.last().map_or(&[], Vec::as_slice)
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _frame: &FrameInfo) -> Result<(), RenderError> {
        self.frames.push(Vec::new());
        Ok(())
    }

    fn draw(&mut self, request: &DrawRequest) -> Result<(), RenderError> {
        if self.fail_after.is_some_and(|limit| self.drawn >= limit) {
            return Err(RenderError::Backend("recording renderer told to fail".into()));
        }
        self.drawn += 1;
        match self.frames.last_mut() {
            Some(frame) => frame.push(request.clone()),
            None => self.frames.push(vec![request.clone()]),
        }
        Ok(())
    }
}

use cadence_common::{NodeId, Shape, TextureLayer, lerp, lerp_vec2};
use cadence_kernel::{Renderable, SceneTree, TreeError};
use glam::Vec2;

use crate::renderer::{DrawRequest, RenderKind, TextureHandle};

/// Interpolated camera for one scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl RenderView {
    /// World position to camera-relative screen units.
    pub fn project(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom
    }
}

/// All draw requests for one renderable node, in texture-layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDraw {
    pub node: NodeId,
    pub z_index: i32,
    /// Interpolated world position.
    pub position: Vec2,
    pub requests: Vec<DrawRequest>,
}

/// Interpolated view of `scene`'s camera, or the identity view when the scene
/// has none.
pub fn scene_view(tree: &SceneTree, scene: NodeId, alpha: f32) -> Result<RenderView, TreeError> {
    let data = tree
        .get(scene)
        .and_then(|n| n.scene())
        .ok_or(TreeError::NodeNotFound(scene))?;
    let camera = data
        .camera
        .and_then(|id| tree.get(id))
        .and_then(|n| n.camera());
    Ok(match camera {
        Some(cam) => RenderView {
            position: lerp_vec2(cam.previous_position, cam.spatial.position, alpha),
            zoom: lerp(cam.previous_zoom, cam.zoom, alpha),
        },
        None => RenderView::default(),
    })
}

/// Collect the visible renderables under `scene`, sorted by ascending
/// `z_index`. Ties keep tree pre-order.
pub fn collect_scene(
    tree: &SceneTree,
    scene: NodeId,
    alpha: f32,
) -> Result<Vec<EntityDraw>, TreeError> {
    let view = scene_view(tree, scene, alpha)?;
    let mut draws: Vec<EntityDraw> = tree
        .descendants(scene)?
        .into_iter()
        .filter_map(|id| {
            let r = tree.get(id)?.renderable()?;
            r.sprite.visible.then(|| entity_draw(id, r, &view, alpha))
        })
        .collect();
    draws.sort_by_key(|d| d.z_index);
    Ok(draws)
}

fn entity_draw(node: NodeId, r: &Renderable, view: &RenderView, alpha: f32) -> EntityDraw {
    let world = lerp_vec2(r.previous_position, r.spatial.position, alpha);
    let position = view.project(world);
    let size = r.size * view.zoom;

    let mut requests = Vec::with_capacity(r.sprite.layers.len());
    for layer in &r.sprite.layers {
        let (kind, color, texture) = match layer {
            TextureLayer::Image { source, tint } => (
                RenderKind::Image,
                *tint,
                Some(TextureHandle(source.clone())),
            ),
            TextureLayer::Shape {
                shape: Shape::Rectangle,
                color,
            } => (RenderKind::Solid, *color, None),
            TextureLayer::Shape { shape, .. } => {
                tracing::warn!(node = %node, ?shape, "shape not implemented, layer skipped");
                continue;
            }
        };
        requests.push(DrawRequest {
            node,
            color,
            position,
            size,
            rotation: r.rotation,
            kind,
            texture,
        });
    }

    EntityDraw {
        node,
        z_index: r.sprite.z_index,
        position: world,
        requests,
    }
}

use cadence_common::{NodeId, Sprite};
use cadence_hook::Hook;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Stable class tag of a node. Also the default node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Node,
    Spatial,
    Renderable,
    Camera,
    Scene,
    World,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Spatial => "Spatial",
            Self::Renderable => "Renderable",
            Self::Camera => "Camera",
            Self::Scene => "Scene",
            Self::World => "World",
        }
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and velocity in 2D, integrated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spatial {
    pub position: Vec2,
    /// Units per second when the node uses delta time, otherwise units per tick.
    pub velocity: Vec2,
}

impl Spatial {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

/// A spatial node that is drawn.
///
/// Drawing interpolates from `previous_position` to the current position, and
/// only the pre-simulation pass refreshes the snapshot. Place a node with
/// [`Renderable::at`] or move it with [`Renderable::teleport`]; writing
/// `spatial.position` directly makes it glide from the old snapshot until the
/// next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub spatial: Spatial,
    pub size: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub sprite: Sprite,
    /// Position captured before the most recent integration.
    pub previous_position: Vec2,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            spatial: Spatial::default(),
            size: Vec2::splat(100.0),
            rotation: 0.0,
            sprite: Sprite::default(),
            previous_position: Vec2::ZERO,
        }
    }
}

impl Renderable {
    /// A default renderable placed at `position`, with the snapshot in sync.
    pub fn at(position: Vec2) -> Self {
        Self {
            spatial: Spatial::at(position),
            previous_position: position,
            ..Self::default()
        }
    }

    /// Jump to `position` without interpolating from the old one.
    pub fn teleport(&mut self, position: Vec2) {
        self.spatial.position = position;
        self.previous_position = position;
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

/// The view a scene is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub spatial: Spatial,
    pub zoom: f32,
    pub previous_position: Vec2,
    pub previous_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            spatial: Spatial::default(),
            zoom: 1.0,
            previous_position: Vec2::ZERO,
            previous_zoom: 1.0,
        }
    }
}

/// A scene container: a render layer with an optional camera.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneData {
    /// Render order; lower layers are drawn first. Does not affect simulation order.
    pub layer: i32,
    pub visible: bool,
    pub camera: Option<NodeId>,
}

impl SceneData {
    pub fn new(layer: i32) -> Self {
        Self {
            layer,
            visible: true,
            camera: None,
        }
    }
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Plain,
    Spatial(Spatial),
    Renderable(Renderable),
    Camera(Camera),
    Scene(SceneData),
    World,
}

impl NodeKind {
    pub fn class(&self) -> NodeClass {
        match self {
            Self::Plain => NodeClass::Node,
            Self::Spatial(_) => NodeClass::Spatial,
            Self::Renderable(_) => NodeClass::Renderable,
            Self::Camera(_) => NodeClass::Camera,
            Self::Scene(_) => NodeClass::Scene,
            Self::World => NodeClass::World,
        }
    }

    pub fn spatial(&self) -> Option<&Spatial> {
        match self {
            Self::Spatial(s) => Some(s),
            Self::Renderable(r) => Some(&r.spatial),
            Self::Camera(c) => Some(&c.spatial),
            _ => None,
        }
    }

    pub fn spatial_mut(&mut self) -> Option<&mut Spatial> {
        match self {
            Self::Spatial(s) => Some(s),
            Self::Renderable(r) => Some(&mut r.spatial),
            Self::Camera(c) => Some(&mut c.spatial),
            _ => None,
        }
    }
}

/// Per-tick values handed to behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    /// Seconds since the previous tick started.
    pub delta_time: f64,
    pub simulation_speed: f64,
    pub scene: NodeId,
}

impl TickContext {
    /// Whether `delta_time` can be applied to positions this tick.
    pub fn delta_is_usable(&self) -> bool {
        self.delta_time.is_finite() && self.delta_time >= 0.0
    }
}

/// User simulation code attached to a node. Runs before velocity integration.
pub trait Behavior: Send {
    fn simulate(&mut self, node: &mut Node, ctx: &TickContext);
}

impl<F> Behavior for F
where
    F: FnMut(&mut Node, &TickContext) + Send,
{
    fn simulate(&mut self, node: &mut Node, ctx: &TickContext) {
        self(node, ctx)
    }
}

/// Fired on a node after it was simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedEvent {
    pub node: NodeId,
    pub scene: NodeId,
    pub tick: u64,
    pub delta_time: f64,
}

/// Fired on a renderable after its draw requests were submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedEvent {
    pub node: NodeId,
    pub scene: NodeId,
    pub frame: u64,
    pub alpha: f32,
    /// Interpolated world position the node was drawn at.
    pub position: Vec2,
}

/// An addressable element of the scene tree.
///
/// Structural fields (name, parent, children, name index) are private and only
/// change through [`crate::SceneTree`] so the tree invariants hold.
pub struct Node {
    id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// First child (in children order) carrying each name.
    pub(crate) names: std::collections::HashMap<String, NodeId>,
    /// Simulation order within a scene; ties keep tree order.
    pub sim_order: i32,
    pub simulation_uses_delta_time: bool,
    pub simulation_uses_simulation_speed: bool,
    pub kind: NodeKind,
    behavior: Option<Box<dyn Behavior>>,
    user_data: Option<Box<dyn Any + Send>>,
    pub simulated: Hook<SimulatedEvent>,
    pub rendered: Hook<RenderedEvent>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: kind.class().as_str().to_string(),
            parent: None,
            children: Vec::new(),
            names: std::collections::HashMap::new(),
            sim_order: 0,
            simulation_uses_delta_time: true,
            simulation_uses_simulation_speed: true,
            kind,
            behavior: None,
            user_data: None,
            simulated: Hook::new(),
            rendered: Hook::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn class(&self) -> NodeClass {
        self.kind.class()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in stored order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The child currently addressed by `name`, if any.
    pub fn child_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn spatial(&self) -> Option<&Spatial> {
        self.kind.spatial()
    }

    pub fn spatial_mut(&mut self) -> Option<&mut Spatial> {
        self.kind.spatial_mut()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.spatial().map(|s| s.position)
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        match &self.kind {
            NodeKind::Renderable(r) => Some(r),
            _ => None,
        }
    }

    pub fn renderable_mut(&mut self) -> Option<&mut Renderable> {
        match &mut self.kind {
            NodeKind::Renderable(r) => Some(r),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn scene(&self) -> Option<&SceneData> {
        match &self.kind {
            NodeKind::Scene(s) => Some(s),
            _ => None,
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneData> {
        match &mut self.kind {
            NodeKind::Scene(s) => Some(s),
            _ => None,
        }
    }

    pub fn set_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    pub fn clear_behavior(&mut self) {
        self.behavior = None;
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn set_user_data<T: Any + Send>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    pub fn user_data<T: Any + Send>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref::<T>()
    }

    pub fn user_data_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut::<T>()
    }

    /// Capture the state interpolation blends from. Runs once per tick, before
    /// any node in the scene is integrated.
    pub fn pre_simulate(&mut self) {
        match &mut self.kind {
            NodeKind::Renderable(r) => r.previous_position = r.spatial.position,
            NodeKind::Camera(c) => {
                c.previous_position = c.spatial.position;
                c.previous_zoom = c.zoom;
            }
            _ => {}
        }
    }

    /// Run the attached behavior, if any. A behavior that installs a
    /// replacement keeps the replacement.
    pub fn run_behavior(&mut self, ctx: &TickContext) {
        let Some(mut behavior) = self.behavior.take() else {
            return;
        };
        behavior.simulate(self, ctx);
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
    }

    /// Apply velocity to position. Returns false when nothing was applied.
    pub fn integrate(&mut self, ctx: &TickContext) -> bool {
        let uses_delta = self.simulation_uses_delta_time;
        let uses_speed = self.simulation_uses_simulation_speed;
        let Some(spatial) = self.kind.spatial_mut() else {
            return false;
        };
        if !ctx.delta_is_usable() {
            return false;
        }

        let mut scale = 1.0_f64;
        if uses_delta {
            scale *= ctx.delta_time;
        }
        if uses_speed {
            if !ctx.simulation_speed.is_finite() {
                return false;
            }
            scale *= ctx.simulation_speed;
        }
        spatial.position += spatial.velocity * scale as f32;
        true
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("class", &self.class())
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("sim_order", &self.sim_order)
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(delta_time: f64, simulation_speed: f64) -> TickContext {
        TickContext {
            tick: 1,
            delta_time,
            simulation_speed,
            scene: NodeId::new(),
        }
    }

    fn moving(velocity: Vec2) -> Node {
        let mut node = Node::new(NodeKind::Spatial(Spatial::default()));
        node.spatial_mut().unwrap().velocity = velocity;
        node
    }

    #[test]
    fn default_name_is_class_name() {
        assert_eq!(Node::new(NodeKind::Plain).name(), "Node");
        assert_eq!(
            Node::new(NodeKind::Renderable(Renderable::default())).name(),
            "Renderable"
        );
        assert_eq!(Node::new(NodeKind::Scene(SceneData::new(0))).name(), "Scene");
    }

    #[test]
    fn integrate_scales_by_delta_and_speed() {
        let mut node = moving(Vec2::new(100.0, 0.0));
        assert!(node.integrate(&ctx(0.5, 1.0)));
        assert_eq!(node.position(), Some(Vec2::new(50.0, 0.0)));

        node.integrate(&ctx(0.5, 2.0));
        assert_eq!(node.position(), Some(Vec2::new(150.0, 0.0)));
    }

    #[test]
    fn zero_simulation_speed_freezes_position() {
        let mut node = moving(Vec2::new(100.0, 0.0));
        for dt in [0.016, 0.5, 3.0] {
            node.integrate(&ctx(dt, 0.0));
        }
        assert_eq!(node.position(), Some(Vec2::ZERO));
    }

    #[test]
    fn flags_disable_scaling() {
        let mut node = moving(Vec2::new(10.0, 4.0));
        node.simulation_uses_delta_time = false;
        node.simulation_uses_simulation_speed = false;
        node.integrate(&ctx(0.25, 0.0));
        assert_eq!(node.position(), Some(Vec2::new(10.0, 4.0)));
    }

    #[test]
    fn bad_delta_time_skips_integration() {
        let mut node = moving(Vec2::new(10.0, 0.0));
        assert!(!node.integrate(&ctx(f64::NAN, 1.0)));
        assert!(!node.integrate(&ctx(-0.1, 1.0)));
        assert!(!node.integrate(&ctx(f64::INFINITY, 1.0)));
        assert_eq!(node.position(), Some(Vec2::ZERO));
    }

    #[test]
    fn plain_nodes_do_not_integrate() {
        let mut node = Node::new(NodeKind::Plain);
        assert!(!node.integrate(&ctx(1.0, 1.0)));
    }

    #[test]
    fn pre_simulate_snapshots_renderable_and_camera() {
        let mut r = Node::new(NodeKind::Renderable(Renderable::at(Vec2::new(1.0, 2.0))));
        r.renderable_mut().unwrap().spatial.position = Vec2::new(5.0, 5.0);
        r.pre_simulate();
        assert_eq!(r.renderable().unwrap().previous_position, Vec2::new(5.0, 5.0));

        let mut c = Node::new(NodeKind::Camera(Camera::default()));
        {
            let cam = c.camera_mut().unwrap();
            cam.spatial.position = Vec2::new(3.0, 0.0);
            cam.zoom = 2.0;
        }
        c.pre_simulate();
        let cam = c.camera().unwrap();
        assert_eq!(cam.previous_position, Vec2::new(3.0, 0.0));
        assert_eq!(cam.previous_zoom, 2.0);
    }

    #[test]
    fn behavior_runs_and_is_kept() {
        let mut node = moving(Vec2::ZERO);
        node.set_behavior(|n: &mut Node, _ctx: &TickContext| {
            n.spatial_mut().unwrap().velocity.y -= 10.0;
        });
        node.run_behavior(&ctx(0.1, 1.0));
        node.run_behavior(&ctx(0.1, 1.0));
        assert!(node.has_behavior());
        assert_eq!(node.spatial().unwrap().velocity, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn behavior_can_replace_itself() {
        let mut node = Node::new(NodeKind::Plain);
        node.set_behavior(|n: &mut Node, _ctx: &TickContext| {
            n.sim_order += 1;
            n.set_behavior(|n: &mut Node, _ctx: &TickContext| n.sim_order += 100);
        });
        node.run_behavior(&ctx(0.1, 1.0));
        node.run_behavior(&ctx(0.1, 1.0));
        assert_eq!(node.sim_order, 101);
    }

    #[test]
    fn user_data_is_typed() {
        let mut node = Node::new(NodeKind::Plain);
        node.set_user_data(42_u32);
        assert_eq!(node.user_data::<u32>(), Some(&42));
        assert!(node.user_data::<String>().is_none());
        *node.user_data_mut::<u32>().unwrap() += 1;
        assert_eq!(node.user_data::<u32>(), Some(&43));
    }
}

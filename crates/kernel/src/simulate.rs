use cadence_common::NodeId;

use crate::node::{SimulatedEvent, TickContext};
use crate::tree::{SceneTree, TreeError};

/// Counters from one scene's simulation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenePass {
    /// Nodes whose behavior and hooks ran.
    pub simulated: usize,
    /// Nodes whose position was advanced by velocity.
    pub integrated: usize,
    /// Hook callbacks that panicked.
    pub hook_failures: usize,
}

impl SceneTree {
    /// Simulate every descendant of `scene` for one tick.
    ///
    /// All snapshots are taken first so interpolation sees a consistent
    /// pre-tick state, then each node runs its behavior, integrates, and fires
    /// its `simulated` hook, in [`SceneTree::simulation_order`].
    pub fn simulate_scene(
        &mut self,
        scene: NodeId,
        tick: u64,
        delta_time: f64,
        simulation_speed: f64,
    ) -> Result<ScenePass, TreeError> {
        let order = self.snapshot_scene(scene)?;
        let ctx = TickContext {
            tick,
            delta_time,
            simulation_speed,
            scene,
        };
        Ok(self.advance_nodes(&order, &ctx))
    }

    /// Snapshot pass: record pre-tick state for every descendant of `scene`.
    /// Returns the simulation order for [`SceneTree::advance_nodes`].
    pub fn snapshot_scene(&mut self, scene: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let order = self.simulation_order(scene)?;
        for id in &order {
            if let Some(node) = self.get_mut(*id) {
                node.pre_simulate();
            }
        }
        Ok(order)
    }

    /// Integration pass over `order`. Ids no longer in the tree are skipped.
    pub fn advance_nodes(&mut self, order: &[NodeId], ctx: &TickContext) -> ScenePass {
        let mut pass = ScenePass::default();
        for &id in order {
            let Some(node) = self.get_mut(id) else {
                continue;
            };
            node.run_behavior(ctx);
            if node.integrate(ctx) {
                pass.integrated += 1;
            }
            let hook = node.simulated.clone();
            let report = hook.fire(&SimulatedEvent {
                node: id,
                scene: ctx.scene,
                tick: ctx.tick,
                delta_time: ctx.delta_time,
            });
            pass.simulated += 1;
            pass.hook_failures += report.failed;
        }

        tracing::trace!(
            scene = %ctx.scene,
            simulated = pass.simulated,
            integrated = pass.integrated,
            "scene simulated"
        );
        pass
    }
}

impl std::ops::AddAssign for ScenePass {
    fn add_assign(&mut self, other: Self) {
        self.simulated += other.simulated;
        self.integrated += other.integrated;
        self.hook_failures += other.hook_failures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Camera, Node, NodeKind, Renderable, Spatial};
    use glam::Vec2;
    use std::sync::{Arc, Mutex};

    #[test]
    fn one_tick_moves_by_velocity_times_delta() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let id = tree
            .spawn(NodeKind::Renderable(Renderable::default()), scene)
            .unwrap();
        tree.get_mut(id).unwrap().spatial_mut().unwrap().velocity = Vec2::new(100.0, 0.0);

        let pass = tree.simulate_scene(scene, 1, 0.5, 1.0).unwrap();
        assert_eq!(pass.simulated, 1);
        assert_eq!(pass.integrated, 1);

        let r = tree.get(id).unwrap().renderable().unwrap();
        assert_eq!(r.previous_position, Vec2::ZERO);
        assert_eq!(r.spatial.position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn snapshots_are_taken_before_any_integration() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, true).unwrap();
        let camera = tree.get(scene).unwrap().scene().unwrap().camera.unwrap();
        {
            let cam = tree.get_mut(camera).unwrap().camera_mut().unwrap();
            cam.spatial.velocity = Vec2::new(0.0, 10.0);
        }

        tree.simulate_scene(scene, 1, 1.0, 1.0).unwrap();
        tree.simulate_scene(scene, 2, 1.0, 1.0).unwrap();

        let cam: &Camera = tree.get(camera).unwrap().camera().unwrap();
        assert_eq!(cam.previous_position, Vec2::new(0.0, 10.0));
        assert_eq!(cam.spatial.position, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn nodes_run_in_sim_order_and_fire_hooks() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut ids = Vec::new();
        for order in [2, 0, 1] {
            let id = tree
                .spawn(NodeKind::Spatial(Spatial::default()), scene)
                .unwrap();
            let node = tree.get_mut(id).unwrap();
            node.sim_order = order;
            let seen = Arc::clone(&seen);
            node.simulated.connect(move |e: &SimulatedEvent| {
                seen.lock().unwrap().push(e.node);
            });
            ids.push(id);
        }

        tree.simulate_scene(scene, 1, 0.1, 1.0).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn behavior_runs_before_integration() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let id = tree
            .spawn(NodeKind::Spatial(Spatial::default()), scene)
            .unwrap();
        tree.get_mut(id)
            .unwrap()
            .set_behavior(|n: &mut Node, _ctx: &TickContext| {
                n.spatial_mut().unwrap().velocity = Vec2::new(4.0, 0.0);
            });

        tree.simulate_scene(scene, 1, 0.5, 1.0).unwrap();
        assert_eq!(tree.get(id).unwrap().position(), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn panicking_hook_is_counted_not_fatal() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let bad = tree.spawn(NodeKind::Plain, scene).unwrap();
        let good = tree
            .spawn(NodeKind::Spatial(Spatial::default()), scene)
            .unwrap();
        tree.get(bad).unwrap().simulated.connect(|_| panic!("bad hook"));
        tree.get_mut(good).unwrap().spatial_mut().unwrap().velocity = Vec2::ONE;

        let pass = tree.simulate_scene(scene, 1, 1.0, 1.0).unwrap();
        assert_eq!(pass.hook_failures, 1);
        assert_eq!(pass.simulated, 2);
        assert_eq!(tree.get(good).unwrap().position(), Some(Vec2::ONE));
    }

    #[test]
    fn nan_delta_leaves_positions_alone() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let id = tree
            .spawn(NodeKind::Spatial(Spatial::default()), scene)
            .unwrap();
        tree.get_mut(id).unwrap().spatial_mut().unwrap().velocity = Vec2::ONE;

        let pass = tree.simulate_scene(scene, 1, f64::NAN, 1.0).unwrap();
        assert_eq!(pass.integrated, 0);
        assert_eq!(pass.simulated, 1);
        assert_eq!(tree.get(id).unwrap().position(), Some(Vec2::ZERO));
    }
}

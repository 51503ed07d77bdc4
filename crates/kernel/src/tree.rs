use cadence_common::NodeId;
use std::collections::BTreeMap;

use crate::node::{Camera, Node, NodeKind, SceneData};

/// Errors from structural tree operations. The tree is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("cannot parent {node} under {parent}: {parent} is the node itself or one of its descendants")]
    Cycle { node: NodeId, parent: NodeId },
    #[error("the world root cannot be reparented or destroyed")]
    RootImmovable,
    #[error("{parent} already has a child named {name:?}")]
    NameCollision { parent: NodeId, name: String },
    #[error("no child named {segment:?} while resolving {path:?}")]
    ChildNotFound { path: String, segment: String },
    #[error("invalid node name {0:?}: names must be non-empty and must not contain '.'")]
    InvalidName(String),
}

/// `get_child` splits paths on '.', so a dotted name could never be resolved.
fn check_name(name: &str) -> Result<(), TreeError> {
    if name.is_empty() || name.contains('.') {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Arena owning every node. Children are owned through their parent's
/// children list; parents are referenced by id only.
///
/// Uses BTreeMap so whole-tree iteration is deterministic.
#[derive(Debug)]
pub struct SceneTree {
    nodes: BTreeMap<NodeId, Node>,
    root: NodeId,
}

impl SceneTree {
    /// Create a tree holding only the world root.
    pub fn new() -> Self {
        let root = Node::new(NodeKind::World);
        let id = root.id();
        let mut nodes = BTreeMap::new();
        nodes.insert(id, root);
        Self { nodes, root: id }
    }

    /// The world node. It always exists and has no parent.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true in practice, since the root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a node by id, whether or not it is attached.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node's data. Structure changes still go through
    /// the tree methods, since `Node` keeps its parent and children private.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Create a standalone node with no parent.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        let id = node.id();
        tracing::trace!(%id, class = %node.class(), "node created");
        self.nodes.insert(id, node);
        id
    }

    /// Create a node and attach it under `parent`.
    pub fn spawn(&mut self, kind: NodeKind, parent: NodeId) -> Result<NodeId, TreeError> {
        self.node(parent)?;
        let id = self.create(kind);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Create a named node and attach it under `parent`. Fails without creating
    /// anything when the name is invalid or already taken there.
    pub fn spawn_named(
        &mut self,
        kind: NodeKind,
        name: &str,
        parent: NodeId,
    ) -> Result<NodeId, TreeError> {
        check_name(name)?;
        let holder = self.node(parent)?.child_by_name(name);
        if holder.is_some() {
            return Err(TreeError::NameCollision {
                parent,
                name: name.to_string(),
            });
        }
        let id = self.create(kind);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name.to_string();
        }
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Add a scene container under the world root, optionally with a camera
    /// child that the scene renders from.
    pub fn add_scene(&mut self, name: &str, layer: i32, with_camera: bool) -> Result<NodeId, TreeError> {
        let root = self.root;
        let scene = self.spawn_named(NodeKind::Scene(SceneData::new(layer)), name, root)?;
        if with_camera {
            let camera = self.spawn(NodeKind::Camera(Camera::default()), scene)?;
            if let Some(data) = self.nodes.get_mut(&scene).and_then(Node::scene_mut) {
                data.camera = Some(camera);
            }
        }
        Ok(scene)
    }

    /// Move `id` under `new_parent`, or detach it when `None`.
    ///
    /// The node is appended to the end of the new parent's children. Checks run
    /// before any mutation, so on error the tree is untouched.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmovable);
        }
        self.node(id)?;
        if let Some(parent) = new_parent {
            self.node(parent)?;
            if parent == id || self.is_ancestor(id, parent) {
                return Err(TreeError::Cycle { node: id, parent });
            }
        }

        let old_parent = self.detach(id);
        if let Some(parent) = new_parent {
            self.attach(id, parent);
        }
        tracing::debug!(
            node = %id,
            from = ?old_parent.map(|p| p.short()),
            to = ?new_parent.map(|p| p.short()),
            "reparented"
        );
        Ok(())
    }

    /// Change a node's name, moving its name binding on the parent.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), TreeError> {
        check_name(new_name)?;
        let node = self.node(id)?;
        if node.name == new_name {
            return Ok(());
        }
        let parent = node.parent;
        if let Some(parent) = parent {
            if let Some(holder) = self.node(parent)?.child_by_name(new_name) {
                if holder != id {
                    return Err(TreeError::NameCollision {
                        parent,
                        name: new_name.to_string(),
                    });
                }
            }
        }

        let old_name = std::mem::replace(
            &mut self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))?.name,
            new_name.to_string(),
        );
        if let Some(parent) = parent {
            self.unbind(parent, &old_name, id);
            self.bind(parent, new_name, id);
        }
        tracing::debug!(node = %id, from = %old_name, to = %new_name, "renamed");
        Ok(())
    }

    /// Resolve a dot-separated path of child names relative to `from`.
    pub fn get_child(&self, from: NodeId, path: &str) -> Result<NodeId, TreeError> {
        let mut current = from;
        for segment in path.split('.') {
            current = self
                .node(current)?
                .child_by_name(segment)
                .ok_or_else(|| TreeError::ChildNotFound {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })?;
        }
        Ok(current)
    }

    /// Direct children in stored order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(self.node(id)?.children())
    }

    /// `None` for the root and for detached nodes.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent())
    }

    /// All descendants in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let start = self.node(id)?;
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = start.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Parent chain, nearest first, ending at the top of the node's tree.
    pub fn ancestry(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut out = Vec::new();
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes.get(&parent).and_then(|n| n.parent);
        }
        Ok(out)
    }

    /// Whether `ancestor` appears on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(&parent).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the node is reachable from the world root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Detach `id` and drop it together with its whole subtree. Returns how many
    /// nodes were removed.
    pub fn destroy(&mut self, id: NodeId) -> Result<usize, TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmovable);
        }
        let mut doomed = self.descendants(id)?;
        self.detach(id);
        doomed.insert(0, id);
        for node in &doomed {
            self.nodes.remove(node);
        }
        tracing::debug!(node = %id, removed = doomed.len(), "destroyed subtree");
        Ok(doomed.len())
    }

    /// Scene containers directly under the world root, by ascending layer.
    /// Equal layers keep children order.
    pub fn scenes(&self) -> Vec<NodeId> {
        let Some(root) = self.nodes.get(&self.root) else {
            return Vec::new();
        };
        let mut scenes: Vec<(i32, NodeId)> = root
            .children
            .iter()
            .filter_map(|id| {
                let data = self.nodes.get(id)?.scene()?;
                Some((data.layer, *id))
            })
            .collect();
        scenes.sort_by_key(|(layer, _)| *layer);
        scenes.into_iter().map(|(_, id)| id).collect()
    }

    /// Descendants of `scene` by ascending `sim_order`. The sort is stable, so
    /// equal orders keep pre-order position.
    pub fn simulation_order(&self, scene: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut order = self.descendants(scene)?;
        order.sort_by_key(|id| self.nodes.get(id).map_or(0, |n| n.sim_order));
        Ok(order)
    }

    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get_mut(&id)?;
        let parent = node.parent.take()?;
        let name = node.name.clone();
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        self.unbind(parent, &name, id);
        Some(parent)
    }

    fn attach(&mut self, id: NodeId, parent: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.parent = Some(parent);
        let name = node.name.clone();
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        self.bind(parent, &name, id);
    }

    /// Install `name -> id` unless another child already holds the name.
    fn bind(&mut self, parent: NodeId, name: &str, id: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.names.entry(name.to_string()).or_insert(id);
        }
    }

    /// Drop `id`'s binding for `name` and hand it to the next child with that name.
    fn unbind(&mut self, parent: NodeId, name: &str, id: NodeId) {
        let Some(p) = self.nodes.get(&parent) else {
            return;
        };
        if p.names.get(name) != Some(&id) {
            return;
        }
        let successor = p
            .children
            .iter()
            .copied()
            .find(|c| *c != id && self.nodes.get(c).is_some_and(|n| n.name == name));
        if let Some(p) = self.nodes.get_mut(&parent) {
            match successor {
                Some(next) => {
                    p.names.insert(name.to_string(), next);
                }
                None => {
                    p.names.remove(name);
                }
            }
        }
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Renderable, Spatial};

    fn plain(tree: &mut SceneTree, name: &str, parent: NodeId) -> NodeId {
        tree.spawn_named(NodeKind::Plain, name, parent).unwrap()
    }

    /// Every node is listed by its parent exactly once, no node is listed
    /// twice, and every name binding points at a current child with that name.
    fn assert_consistent(tree: &SceneTree) {
        let mut listed = std::collections::HashMap::new();
        for (id, node) in &tree.nodes {
            for child in &node.children {
                *listed.entry(*child).or_insert(0) += 1;
                assert_eq!(tree.get(*child).unwrap().parent(), Some(*id));
            }
            for (name, bound) in &node.names {
                assert!(node.children.contains(bound));
                assert_eq!(tree.get(*bound).unwrap().name(), name);
            }
        }
        for (id, node) in &tree.nodes {
            let count = listed.get(id).copied().unwrap_or(0);
            match node.parent() {
                Some(_) => assert_eq!(count, 1, "{id} listed {count} times"),
                None => assert_eq!(count, 0),
            }
        }
    }

    /// Splitmix64 step, used to drive reproducible random mutation sequences.
    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    #[test]
    fn tree_starts_with_world_root() {
        let tree = SceneTree::new();
        assert_eq!(tree.len(), 1);
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.name(), "World");
        assert!(root.parent().is_none());
    }

    #[test]
    fn created_nodes_are_standalone() {
        let mut tree = SceneTree::new();
        let id = tree.create(NodeKind::Plain);
        assert!(tree.parent(id).unwrap().is_none());
        assert!(!tree.is_attached(id));
        assert!(tree.children(tree.root()).unwrap().is_empty());
    }

    #[test]
    fn set_parent_moves_between_parents() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", root);
        let child = plain(&mut tree, "child", a);

        tree.set_parent(child, Some(b)).unwrap();
        assert_eq!(tree.parent(child).unwrap(), Some(b));
        assert!(tree.children(a).unwrap().is_empty());
        assert_eq!(tree.children(b).unwrap(), &[child]);
        assert!(tree.get(a).unwrap().child_by_name("child").is_none());
        assert_eq!(tree.get(b).unwrap().child_by_name("child"), Some(child));
        assert_consistent(&tree);
    }

    #[test]
    fn set_parent_none_detaches() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        tree.set_parent(a, None).unwrap();
        assert!(tree.contains(a));
        assert!(tree.parent(a).unwrap().is_none());
        assert!(tree.get_child(root, "a").is_err());
        assert_consistent(&tree);
    }

    #[test]
    fn cycle_is_rejected_and_tree_unchanged() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", a);
        let c = plain(&mut tree, "c", b);

        let before: Vec<NodeId> = tree.descendants(root).unwrap();
        assert_eq!(
            tree.set_parent(a, Some(c)),
            Err(TreeError::Cycle { node: a, parent: c })
        );
        assert_eq!(
            tree.set_parent(a, Some(a)),
            Err(TreeError::Cycle { node: a, parent: a })
        );
        assert_eq!(tree.descendants(root).unwrap(), before);
        assert_eq!(tree.parent(a).unwrap(), Some(root));
        assert_consistent(&tree);
    }

    #[test]
    fn root_cannot_move_or_die() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        assert_eq!(tree.set_parent(root, Some(a)), Err(TreeError::RootImmovable));
        assert_eq!(tree.set_parent(root, None), Err(TreeError::RootImmovable));
        assert_eq!(tree.destroy(root), Err(TreeError::RootImmovable));
    }

    #[test]
    fn missing_nodes_are_reported() {
        let mut tree = SceneTree::new();
        let ghost = NodeId::new();
        assert_eq!(tree.set_parent(ghost, None), Err(TreeError::NodeNotFound(ghost)));
        let a = tree.create(NodeKind::Plain);
        assert_eq!(
            tree.set_parent(a, Some(ghost)),
            Err(TreeError::NodeNotFound(ghost))
        );
        assert!(tree.descendants(ghost).is_err());
    }

    #[test]
    fn rename_moves_binding_and_keeps_order() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", root);
        let c = plain(&mut tree, "c", root);

        tree.rename(b, "bee").unwrap();
        assert_eq!(tree.children(root).unwrap(), &[a, b, c]);
        assert_eq!(tree.get_child(root, "bee"), Ok(b));
        assert!(tree.get_child(root, "b").is_err());
        assert_consistent(&tree);
    }

    #[test]
    fn rename_collision_is_rejected() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        plain(&mut tree, "b", root);
        assert!(matches!(
            tree.rename(a, "b"),
            Err(TreeError::NameCollision { .. })
        ));
        assert_eq!(tree.get(a).unwrap().name(), "a");
        assert_eq!(tree.get_child(root, "a"), Ok(a));
        // Renaming to its own name is fine.
        tree.rename(a, "a").unwrap();
    }

    #[test]
    fn detached_nodes_rename_freely() {
        let mut tree = SceneTree::new();
        let a = tree.create(NodeKind::Plain);
        tree.rename(a, "loose").unwrap();
        assert_eq!(tree.get(a).unwrap().name(), "loose");
    }

    #[test]
    fn dotted_and_empty_names_are_rejected() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let before = tree.len();
        for name in ["a.b", "", "."] {
            assert_eq!(
                tree.spawn_named(NodeKind::Plain, name, root),
                Err(TreeError::InvalidName(name.to_string()))
            );
        }
        assert_eq!(tree.len(), before);

        let a = plain(&mut tree, "a", root);
        assert_eq!(
            tree.rename(a, "x.y"),
            Err(TreeError::InvalidName("x.y".to_string()))
        );
        assert_eq!(tree.get(a).unwrap().name(), "a");
        assert_eq!(tree.get_child(root, "a"), Ok(a));
    }

    #[test]
    fn duplicate_names_keep_first_binding_then_hand_over() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let first = tree.spawn(NodeKind::Plain, root).unwrap();
        let second = tree.spawn(NodeKind::Plain, root).unwrap();
        assert_eq!(tree.get_child(root, "Node"), Ok(first));

        tree.set_parent(first, None).unwrap();
        assert_eq!(tree.get_child(root, "Node"), Ok(second));
        assert_consistent(&tree);

        tree.rename(second, "other").unwrap();
        assert!(tree.get_child(root, "Node").is_err());
        assert_consistent(&tree);
    }

    #[test]
    fn get_child_follows_dotted_path() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", a);
        let c = plain(&mut tree, "c", b);

        assert_eq!(tree.get_child(root, "a.b.c"), Ok(c));
        assert_eq!(tree.get_child(a, "b"), Ok(b));
        assert_eq!(
            tree.get_child(root, "a.x.c"),
            Err(TreeError::ChildNotFound {
                path: "a.x.c".into(),
                segment: "x".into()
            })
        );
        assert!(tree.get_child(root, "a.b.c.d").is_err());
        assert!(tree.get_child(root, "").is_err());
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let a1 = plain(&mut tree, "a1", a);
        let a2 = plain(&mut tree, "a2", a);
        let a1x = plain(&mut tree, "a1x", a1);
        let b = plain(&mut tree, "b", root);

        assert_eq!(tree.descendants(root).unwrap(), vec![a, a1, a1x, a2, b]);
        assert_eq!(tree.descendants(a1x).unwrap(), Vec::<NodeId>::new());
    }

    fn build_full(tree: &mut SceneTree, parent: NodeId, depth: u32, branching: u32) {
        if depth == 0 {
            return;
        }
        for _ in 0..branching {
            let child = tree.spawn(NodeKind::Plain, parent).unwrap();
            build_full(tree, child, depth - 1, branching);
        }
    }

    #[test]
    fn descendant_count_matches_geometric_series() {
        for (depth, branching) in [(0, 3), (1, 1), (3, 1), (3, 2), (4, 3), (2, 5)] {
            let mut tree = SceneTree::new();
            let root = tree.root();
            build_full(&mut tree, root, depth, branching);
            let expected: u64 = (1..=depth).map(|d| (branching as u64).pow(d)).sum();
            if branching > 1 {
                let closed = ((branching as u64).pow(depth + 1) - branching as u64)
                    / (branching as u64 - 1);
                assert_eq!(expected, closed);
            }
            assert_eq!(tree.descendants(root).unwrap().len() as u64, expected);
        }
    }

    #[test]
    fn deep_chains_do_not_overflow() {
        let mut tree = SceneTree::new();
        let mut parent = tree.root();
        for _ in 0..5_000 {
            parent = tree.spawn(NodeKind::Plain, parent).unwrap();
        }
        assert_eq!(tree.descendants(tree.root()).unwrap().len(), 5_000);
        assert_eq!(tree.ancestry(parent).unwrap().len(), 5_000);
    }

    #[test]
    fn ancestry_is_nearest_first() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", a);
        let c = plain(&mut tree, "c", b);
        assert_eq!(tree.ancestry(c).unwrap(), vec![b, a, root]);
        assert!(tree.ancestry(root).unwrap().is_empty());
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = plain(&mut tree, "a", root);
        let b = plain(&mut tree, "b", a);
        plain(&mut tree, "c", b);
        let keep = plain(&mut tree, "keep", root);

        assert_eq!(tree.destroy(a), Ok(3));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(root).unwrap(), &[keep]);
        assert!(!tree.contains(b));
        assert_consistent(&tree);
    }

    #[test]
    fn random_reparenting_keeps_tree_consistent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let mut ids = vec![root];
        for _ in 0..40 {
            ids.push(tree.create(NodeKind::Plain));
        }

        let mut rng = 0xdead_beef_u64;
        for step in 0..2_000 {
            let node = ids[1 + (splitmix64(&mut rng) as usize % (ids.len() - 1))];
            let roll = splitmix64(&mut rng) as usize;
            let target = if roll % 7 == 0 {
                None
            } else {
                Some(ids[roll % ids.len()])
            };

            let before = tree.parent(node).unwrap();
            match tree.set_parent(node, target) {
                Ok(()) => assert_eq!(tree.parent(node).unwrap(), target),
                Err(TreeError::Cycle { .. }) => assert_eq!(tree.parent(node).unwrap(), before),
                Err(e) => panic!("unexpected error at step {step}: {e}"),
            }
            if step % 97 == 0 {
                let name = format!("n{}", splitmix64(&mut rng) % 5);
                let _ = tree.rename(node, &name);
            }
            assert_consistent(&tree);
        }
    }

    #[test]
    fn scenes_sorted_by_layer() {
        let mut tree = SceneTree::new();
        let five = tree.add_scene("five", 5, false).unwrap();
        let neg = tree.add_scene("neg", -1, false).unwrap();
        let zero = tree.add_scene("zero", 0, false).unwrap();
        // Non-scene children of the root are ignored.
        tree.spawn(NodeKind::Plain, tree.root()).unwrap();
        assert_eq!(tree.scenes(), vec![neg, zero, five]);
    }

    #[test]
    fn add_scene_installs_camera() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("Main", 0, true).unwrap();
        let camera = tree.get(scene).unwrap().scene().unwrap().camera.unwrap();
        assert_eq!(tree.parent(camera).unwrap(), Some(scene));
        assert_eq!(tree.get_child(tree.root(), "Main.Camera"), Ok(camera));
        assert!(matches!(
            tree.add_scene("Main", 1, false),
            Err(TreeError::NameCollision { .. })
        ));
    }

    #[test]
    fn simulation_order_is_stable_by_sim_order() {
        let mut tree = SceneTree::new();
        let scene = tree.add_scene("s", 0, false).unwrap();
        let a = tree
            .spawn(NodeKind::Spatial(Spatial::default()), scene)
            .unwrap();
        let a_child = tree.spawn(NodeKind::Plain, a).unwrap();
        let b = tree
            .spawn(NodeKind::Renderable(Renderable::default()), scene)
            .unwrap();
        let c = tree.spawn(NodeKind::Plain, scene).unwrap();

        tree.get_mut(c).unwrap().sim_order = -1;
        tree.get_mut(a_child).unwrap().sim_order = 2;

        assert_eq!(tree.simulation_order(scene).unwrap(), vec![c, a, b, a_child]);
    }
}

use glam::Affine3A;
use slotmap::{SecondaryMap, SlotMap};

use crate::assets::ModelAsset;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::{LightKey, NodeHandle};

/// Scene graph container.
///
/// Pure data: nodes, their names and light components. Rendering reads it,
/// the frame loop mutates it.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub names: SecondaryMap<NodeHandle, String>,
    pub root_nodes: Vec<NodeHandle>,

    pub lights: SlotMap<LightKey, Light>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node creation & removal
    // ========================================================================

    /// Creates an unnamed root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.set_name(handle, name);
        handle
    }

    /// Inserts a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Removes a node and its whole subtree, including light components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(children) = self.nodes.get(handle).map(|n| n.children.clone()) else {
            return;
        };
        for child in children {
            self.remove_node(child);
        }

        self.detach(handle);
        self.root_nodes.retain(|&h| h != handle);

        if let Some(node) = self.nodes.remove(handle)
            && let Some(light) = node.light
        {
            self.lights.remove(light);
        }
        self.names.remove(handle);
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` a child of `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if self.ancestors(parent).any(|a| a == child) {
            log::warn!("Refusing to attach a node under its own descendant");
            return;
        }

        self.detach(child);
        self.root_nodes.retain(|&h| h != child);

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Unlinks `handle` from its parent. The node becomes a scene root.
    pub fn detach(&mut self, handle: NodeHandle) {
        let Some(parent) = self.nodes.get(handle).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != handle);
        }
        self.nodes[handle].parent = None;
        self.root_nodes.push(handle);
    }

    /// Walks from the parent of `handle` up to the scene root.
    pub fn ancestors(&self, handle: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        std::iter::successors(
            self.nodes.get(handle).and_then(|n| n.parent),
            move |&h| self.nodes.get(h).and_then(|n| n.parent),
        )
    }

    // ========================================================================
    // Access & query
    // ========================================================================

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    /// Depth-first search for a node called `name`, starting at `root` itself.
    #[must_use]
    pub fn find_in_subtree(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        if self.get_name(root) == Some(name) {
            return Some(root);
        }
        self.nodes
            .get(root)?
            .children
            .iter()
            .find_map(|&child| self.find_in_subtree(child, name))
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.root_nodes
            .iter()
            .find_map(|&root| self.find_in_subtree(root, name))
    }

    /// A node is effectively visible only if it and all its ancestors are.
    #[must_use]
    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(|n| n.visible)
            && self.ancestors(handle).all(|a| self.nodes[a].visible)
    }

    // ========================================================================
    // Lights
    // ========================================================================

    /// Attaches a light component to `node`, replacing any previous one.
    pub fn set_light(&mut self, node: NodeHandle, light: Light) -> Option<LightKey> {
        let previous = self.nodes.get(node)?.light;
        if let Some(old) = previous {
            self.lights.remove(old);
        }
        let key = self.lights.insert(light);
        self.nodes[node].light = Some(key);
        Some(key)
    }

    #[must_use]
    pub fn get_light(&self, node: NodeHandle) -> Option<&Light> {
        let key = self.nodes.get(node)?.light?;
        self.lights.get(key)
    }

    pub fn get_light_mut(&mut self, node: NodeHandle) -> Option<&mut Light> {
        let key = self.nodes.get(node)?.light?;
        self.lights.get_mut(key)
    }

    // ========================================================================
    // Model instantiation
    // ========================================================================

    /// Copies the node hierarchy of `model` into the scene under a new root
    /// named `name`. Returns that root.
    ///
    /// Only nodes reachable from the model's roots are copied. A node listed
    /// under a second parent, or under its own descendant, is linked once
    /// and the extra link is dropped, so the copy is always a tree.
    pub fn instantiate(&mut self, model: &ModelAsset, name: &str) -> NodeHandle {
        let root = self.create_node_with_name(name);

        let mut visited = vec![false; model.nodes.len()];
        let mut stack: Vec<(usize, NodeHandle)> =
            model.roots.iter().rev().map(|&index| (index, root)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(source) = model.nodes.get(index) else {
                log::warn!("Model '{}': node index {index} out of range", model.name);
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                log::warn!(
                    "Model '{}': node {index} is reached more than once, extra link dropped",
                    model.name
                );
                continue;
            }

            let handle = self.nodes.insert(Node::with_transform(source.transform.clone()));
            if let Some(node_name) = &source.name {
                self.names.insert(handle, node_name.clone());
            }
            self.nodes[handle].parent = Some(parent);
            self.nodes[parent].children.push(handle);

            // Reversed so children pop in declaration order
            stack.extend(source.children.iter().rev().map(|&child| (child, handle)));
        }

        root
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Recomputes world matrices top-down from every root.
    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A)> = self
            .root_nodes
            .iter()
            .map(|&h| (h, Affine3A::IDENTITY))
            .collect();

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let world = parent_world * node.transform.local_matrix();
            node.transform.world_matrix = world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
    }

    /// Replaces a node's local transform wholesale.
    pub fn set_transform(&mut self, handle: NodeHandle, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform = transform;
        }
    }
}

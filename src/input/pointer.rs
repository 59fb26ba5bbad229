use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::scene::{NodeHandle, Scene};

/// A pointer click resolved against scene geometry by the render pipeline.
#[derive(Debug, Clone, Default)]
pub struct PointerEvent {
    /// Intersected nodes, nearest first.
    pub hits: SmallVec<[NodeHandle; 4]>,
    propagation_stopped: bool,
}

impl PointerEvent {
    #[must_use]
    pub fn new(hits: impl IntoIterator<Item = NodeHandle>) -> Self {
        Self {
            hits: hits.into_iter().collect(),
            propagation_stopped: false,
        }
    }

    /// Prevents delivery to any further target, behind or above the current one.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Click handlers registered on scene nodes.
///
/// Dispatch visits every hit nearest first and bubbles from the hit node up
/// through its ancestors, so a handler on a model root receives clicks on
/// any of its meshes.
#[derive(Debug, Clone)]
pub struct ClickTargets<T> {
    targets: FxHashMap<NodeHandle, T>,
}

impl<T> Default for ClickTargets<T> {
    fn default() -> Self {
        Self {
            targets: FxHashMap::default(),
        }
    }
}

impl<T: Copy> ClickTargets<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node: NodeHandle, target: T) {
        self.targets.insert(node, target);
    }

    pub fn unregister(&mut self, node: NodeHandle) -> Option<T> {
        self.targets.remove(&node)
    }

    #[must_use]
    pub fn get(&self, node: NodeHandle) -> Option<T> {
        self.targets.get(&node).copied()
    }

    /// Delivers `event` to every registered target it reaches until a handler
    /// stops propagation. Returns the number of handler invocations.
    pub fn dispatch(
        &self,
        scene: &Scene,
        event: &mut PointerEvent,
        mut handler: impl FnMut(T, &mut PointerEvent),
    ) -> usize {
        let hits = event.hits.clone();
        let mut delivered = 0;

        for hit in hits {
            for node in std::iter::once(hit).chain(scene.ancestors(hit)) {
                if let Some(target) = self.get(node) {
                    handler(target, event);
                    delivered += 1;
                    if event.propagation_stopped() {
                        return delivered;
                    }
                }
            }
        }

        delivered
    }
}

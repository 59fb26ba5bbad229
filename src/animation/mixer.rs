use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::Scene;

/// Owns the playback state of every clip bound to one model instance.
///
/// Actions are keyed by clip name; there is never more than one action per
/// clip, so a new play request always lands on the existing action.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action, replacing any action for a clip of the same name.
    pub fn add_action(&mut self, action: AnimationAction) {
        let name = action.clip().name.clone();
        if let Some(existing) = self.actions.iter_mut().find(|a| a.clip().name == name) {
            log::debug!("Replacing action for clip '{name}'");
            *existing = action;
        } else {
            self.actions.push(action);
        }
    }

    #[must_use]
    pub fn action(&self, clip_name: &str) -> Option<&AnimationAction> {
        self.actions.iter().find(|a| a.clip().name == clip_name)
    }

    pub fn action_mut(&mut self, clip_name: &str) -> Option<&mut AnimationAction> {
        self.actions.iter_mut().find(|a| a.clip().name == clip_name)
    }

    #[must_use]
    pub fn clip(&self, clip_name: &str) -> Option<&Arc<AnimationClip>> {
        self.action(clip_name).map(AnimationAction::clip)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.clip().name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Advances every action and writes sampled values into the bound nodes.
    ///
    /// Finished actions that clamp keep writing their terminal pose.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(dt);

            if !action.enabled {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(node) = scene.get_node_mut(binding.node_handle) else {
                    continue;
                };

                match binding.target {
                    TargetPath::Translation => {
                        if let Some(v) = action.sample_vec3(binding.track_index) {
                            node.transform.position = v;
                        }
                    }
                    TargetPath::Scale => {
                        if let Some(v) = action.sample_vec3(binding.track_index) {
                            node.transform.scale = v;
                        }
                    }
                    TargetPath::Rotation => {
                        if let Some(q) = action.sample_quat(binding.track_index) {
                            node.transform.rotation = q;
                        }
                    }
                }
            }
        }
    }
}

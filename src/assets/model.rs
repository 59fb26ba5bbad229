use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::errors::{Result, SceneError};
use crate::scene::Transform;

/// One node of a loaded model, referencing its children by index.
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub children: Vec<usize>,
}

/// CPU-side result of loading a model file: node hierarchy and animation clips.
///
/// Geometry and materials are consumed by the render pipeline directly from
/// the source file and are not represented here.
#[derive(Debug, Clone, Default)]
pub struct ModelAsset {
    pub name: String,
    pub nodes: Vec<ModelNode>,
    /// Indices of the nodes that sit at the top of the model's default scene.
    pub roots: Vec<usize>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ModelAsset {
    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Looks up a clip by name.
    ///
    /// Without a name, the clip is only chosen when it is unambiguous:
    /// exactly one clip in the model.
    pub fn resolve_clip(&self, name: Option<&str>) -> Result<Arc<AnimationClip>> {
        let found = match name {
            Some(name) => self.clip(name).cloned(),
            None if self.clips.len() == 1 => self.clips.first().cloned(),
            None => None,
        };

        found.ok_or_else(|| SceneError::MissingClip {
            clip: name.unwrap_or("<unnamed>").to_string(),
            model: self.name.clone(),
        })
    }
}

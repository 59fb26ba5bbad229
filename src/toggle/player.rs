use crate::animation::{AnimationAction, AnimationMixer, Binder, PlayDirection};
use crate::assets::ModelAsset;
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// The capability a [`ToggleController`](super::ToggleController) drives.
pub trait ClipCommand {
    fn play(&mut self, direction: PlayDirection);
}

/// Plays one named clip once, forward or in reverse, holding the end pose.
///
/// The player owns the mixer of the model instance it animates, so the clip's
/// playback state has exactly one owner.
#[derive(Debug)]
pub struct ReversibleClipPlayer {
    mixer: AnimationMixer,
    clip_name: String,
}

impl ReversibleClipPlayer {
    #[must_use]
    pub fn new(mixer: AnimationMixer, clip_name: impl Into<String>) -> Self {
        Self {
            mixer,
            clip_name: clip_name.into(),
        }
    }

    /// Builds a player for the model instantiated under `root`.
    ///
    /// Every clip of the model gets an idle action bound to the instance; the
    /// played clip is `clip_name`, or the model's only clip when no name is
    /// given.
    pub fn bind(
        scene: &Scene,
        root: NodeHandle,
        model: &ModelAsset,
        clip_name: Option<&str>,
    ) -> Result<Self> {
        let clip = model.resolve_clip(clip_name)?;

        let mut mixer = AnimationMixer::new();
        for c in &model.clips {
            let mut action = AnimationAction::new(c.clone());
            action.bindings = Binder::bind(scene, root, c);
            mixer.add_action(action);
        }

        log::debug!(
            "Switch player bound to clip '{}' ({:.3}s)",
            clip.name,
            clip.duration
        );
        Ok(Self::new(mixer, clip.name.clone()))
    }

    #[must_use]
    pub fn clip_name(&self) -> &str {
        &self.clip_name
    }

    /// Playback state of the driven clip.
    #[must_use]
    pub fn action(&self) -> Option<&AnimationAction> {
        self.mixer.action(&self.clip_name)
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Parks the clip at the terminal pose of `direction` without animating
    /// toward it. Used when the state is already on at mount.
    pub fn hold(&mut self, direction: PlayDirection) {
        let Some(action) = self.mixer.action_mut(&self.clip_name) else {
            return;
        };
        action.clamp_when_finished = true;
        action.time_scale = direction.sign();
        action.time = match direction {
            PlayDirection::Forward => action.duration(),
            PlayDirection::Reverse => 0.0,
        };
        // Finishes on the next update and keeps applying that pose.
        action.play();
    }

    /// Advances playback and writes the pose into `scene`.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        self.mixer.update(dt, scene);
    }
}

impl ClipCommand for ReversibleClipPlayer {
    fn play(&mut self, direction: PlayDirection) {
        let Some(action) = self.mixer.action_mut(&self.clip_name) else {
            log::warn!("Clip '{}' is not available, ignoring play", self.clip_name);
            return;
        };

        // A running action is redirected in place: it turns around from where
        // it is instead of jumping to the opposite end.
        let in_flight = action.is_running();

        action.clamp_when_finished = true;
        action.time_scale = direction.sign();

        if !in_flight {
            action.time = match direction {
                PlayDirection::Forward => 0.0,
                PlayDirection::Reverse => action.duration(),
            };
        }
        action.play();

        log::debug!(
            "Clip '{}' {direction:?} from {:.3}s{}",
            self.clip_name,
            action.time,
            if in_flight { " (superseding)" } else { "" }
        );
    }
}

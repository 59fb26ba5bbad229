use std::sync::Arc;

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

/// Direction of travel along a clip's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayDirection {
    Forward,
    Reverse,
}

impl PlayDirection {
    /// `+1.0` for forward, `-1.0` for reverse.
    #[inline]
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            PlayDirection::Forward => 1.0,
            PlayDirection::Reverse => -1.0,
        }
    }

    #[must_use]
    pub fn from_on(on: bool) -> Self {
        if on { PlayDirection::Forward } else { PlayDirection::Reverse }
    }
}

/// Mutable one-shot playback state for one clip.
///
/// `time_scale` is signed: its sign is the playback direction and its
/// magnitude the speed. The action finishes at `0` or `duration`; with
/// `clamp_when_finished` it keeps applying that terminal pose, otherwise it
/// disables itself.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,
    finished: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            clamp_when_finished: false,
            paused: false,
            // Actions start idle until something plays them
            enabled: false,
            finished: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.clip.duration
    }

    #[must_use]
    pub fn direction(&self) -> PlayDirection {
        if self.time_scale < 0.0 {
            PlayDirection::Reverse
        } else {
            PlayDirection::Forward
        }
    }

    /// True once playback has reached its boundary.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while the action is still advancing its time.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused && !self.finished
    }

    /// Resumes advancement without touching `time`.
    pub fn play(&mut self) {
        self.enabled = true;
        self.paused = false;
        self.finished = false;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.finished = false;
        self.time = 0.0;
    }

    /// Advances time by `dt * time_scale`, finishing at either boundary.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
            self.finish();
            return;
        }

        self.time += dt * self.time_scale;

        if self.time_scale >= 0.0 && self.time >= duration {
            self.time = duration;
            self.finish();
        } else if self.time_scale < 0.0 && self.time <= 0.0 {
            self.time = 0.0;
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if !self.clamp_when_finished {
            self.enabled = false;
        }
    }

    /// Samples a Vec3 track at the current time.
    pub(crate) fn sample_vec3(&mut self, track_index: usize) -> Option<glam::Vec3> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;
        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor),
            TrackData::Quaternion(_) => None,
        }
    }

    /// Samples a quaternion track at the current time.
    pub(crate) fn sample_quat(&mut self, track_index: usize) -> Option<glam::Quat> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;
        match &track.data {
            TrackData::Quaternion(t) => t.sample_with_cursor(self.time, cursor),
            TrackData::Vector3(_) => None,
        }
    }
}

//! Keyframe animation: clips, tracks, per-clip playback actions and the mixer
//! that writes sampled values back into scene nodes.

pub mod values;
pub mod tracks;
pub mod clip;
pub mod action;
pub mod binding;
pub mod binder;
pub mod mixer;

pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use action::{AnimationAction, PlayDirection};
pub use mixer::AnimationMixer;
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use tracks::{KeyframeCursor, KeyframeTrack, InterpolationMode};

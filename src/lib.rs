#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Interactive lighthouse scene.
//!
//! A light switch whose knob plays a reversible one-shot clip from a boolean
//! state, lights and a beam cone that follow that state, and a screen plane
//! textured from an offscreen vector-animation surface.

pub mod animation;
pub mod assets;
pub mod scene;
pub mod input;
pub mod toggle;
pub mod surface;
pub mod config;
pub mod overlay;
pub mod beam;
pub mod app;
pub mod errors;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, PlayDirection};
pub use app::{LighthouseScene, SceneModel};
pub use beam::{BeamMaterial, ConeMesh};
pub use assets::{AssetServer, LoadState, ModelAsset};
pub use config::SceneConfig;
pub use errors::{Result, SceneError};
pub use input::{ClickTargets, PointerEvent};
pub use overlay::OverlayPanel;
pub use scene::{Light, Node, NodeHandle, Scene, Transform};
pub use surface::{
    OffscreenSurface, OffscreenSurfaceBridge, RuntimeDescriptor, RuntimeFactory, SurfaceMaterial,
    SurfaceTexture, VectorRuntime,
};
pub use toggle::{ClipCommand, ReversibleClipPlayer, ToggleController, ToggleState};
pub use utils::Timer;

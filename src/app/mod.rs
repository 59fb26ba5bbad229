//! Scene root.
//!
//! [`LighthouseScene`] mounts the models, owns the switch state and wires the
//! controller, the drivers and the screen bridge together. The host drives it
//! with a [`Timer`](crate::utils::Timer) from its render loop.

pub mod lighthouse;

pub use lighthouse::{ClickTarget, LighthouseScene, ModelStatus, SceneModel};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::surface::offscreen::OffscreenSurface;

/// How the animation artboard is fitted into the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
    Fill,
    FitWidth,
    FitHeight,
    None,
}

/// Everything a vector-animation runtime needs to start drawing.
#[derive(Debug, Clone)]
pub struct RuntimeDescriptor {
    /// Path or URL of the animation asset.
    pub source: String,
    pub surface: OffscreenSurface,
    pub autoplay: bool,
    pub fit: FitMode,
    pub state_machine: Option<String>,
}

/// A running vector-animation instance bound to one surface.
pub trait VectorRuntime {
    /// Advances the animation and redraws into the bound surface.
    fn advance(&mut self, dt: f32);

    /// Halts playback. Called exactly once, right before the runtime is dropped.
    fn stop(&mut self);
}

/// Creates runtimes for an [`OffscreenSurfaceBridge`](super::OffscreenSurfaceBridge).
pub trait RuntimeFactory {
    fn create(&self, descriptor: RuntimeDescriptor) -> Result<Box<dyn VectorRuntime>>;
}

impl<F> RuntimeFactory for F
where
    F: Fn(RuntimeDescriptor) -> Result<Box<dyn VectorRuntime>>,
{
    fn create(&self, descriptor: RuntimeDescriptor) -> Result<Box<dyn VectorRuntime>> {
        self(descriptor)
    }
}

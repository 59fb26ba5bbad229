use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::surface::offscreen::OffscreenSurface;
use crate::surface::runtime::{FitMode, RuntimeDescriptor, RuntimeFactory, VectorRuntime};
use crate::surface::texture::SurfaceTexture;

/// Surface size and runtime options for a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub width: u32,
    pub height: u32,
    pub autoplay: bool,
    pub fit: FitMode,
    pub state_machine: Option<String>,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            autoplay: true,
            fit: FitMode::Contain,
            state_machine: None,
        }
    }
}

struct Mounted {
    surface: OffscreenSurface,
    runtime: Box<dyn VectorRuntime>,
    texture: SurfaceTexture,
}

/// Owns a hidden surface, the vector-animation runtime drawing into it, and
/// exposes the surface as a texture.
///
/// One surface/runtime pair exists per source identifier. Changing the source
/// or unmounting stops the runtime exactly once and releases the surface;
/// dropping the bridge unmounts it. If creation fails the bridge stays
/// mounted but textureless.
pub struct OffscreenSurfaceBridge {
    source: String,
    settings: SurfaceSettings,
    factory: Arc<dyn RuntimeFactory>,
    mounted: Option<Mounted>,
}

impl std::fmt::Debug for OffscreenSurfaceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffscreenSurfaceBridge")
            .field("source", &self.source)
            .field("settings", &self.settings)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl OffscreenSurfaceBridge {
    pub fn mount(
        source: impl Into<String>,
        factory: Arc<dyn RuntimeFactory>,
        settings: SurfaceSettings,
    ) -> Self {
        let mut bridge = Self {
            source: source.into(),
            settings,
            factory,
            mounted: None,
        };
        bridge.mounted = bridge.create();
        bridge
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    /// True while a runtime is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mounted.is_some()
    }

    /// Texture over the current surface, `None` when creation failed or the
    /// bridge is unmounted.
    #[must_use]
    pub fn texture(&self) -> Option<SurfaceTexture> {
        self.mounted.as_ref().map(|m| m.texture.clone())
    }

    #[must_use]
    pub fn surface(&self) -> Option<&OffscreenSurface> {
        self.mounted.as_ref().map(|m| &m.surface)
    }

    /// Switches to a new animation source. Same source is a no-op.
    ///
    /// Textures handed out before the switch become invalid.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source == self.source {
            return;
        }
        self.release();
        self.source = source;
        self.mounted = self.create();
    }

    /// Ticks the runtime, if any.
    pub fn advance(&mut self, dt: f32) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.runtime.advance(dt);
        }
    }

    /// Stops the runtime and releases the surface. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.release();
    }

    fn create(&self) -> Option<Mounted> {
        match self.try_create() {
            Ok(mounted) => {
                log::debug!(
                    "Surface bridge mounted '{}' ({}x{})",
                    self.source,
                    self.settings.width,
                    self.settings.height
                );
                Some(mounted)
            }
            Err(err) => {
                log::warn!("Surface bridge for '{}' disabled: {err}", self.source);
                None
            }
        }
    }

    fn try_create(&self) -> Result<Mounted> {
        let surface = OffscreenSurface::new(&self.source, self.settings.width, self.settings.height)?;
        let runtime = self.factory.create(RuntimeDescriptor {
            source: self.source.clone(),
            surface: surface.clone(),
            autoplay: self.settings.autoplay,
            fit: self.settings.fit,
            state_machine: self.settings.state_machine.clone(),
        })?;
        let texture = SurfaceTexture::new(&surface);
        Ok(Mounted {
            surface,
            runtime,
            texture,
        })
    }

    fn release(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.runtime.stop();
            log::debug!("Surface bridge released '{}'", self.source);
        }
    }
}

impl Drop for OffscreenSurfaceBridge {
    fn drop(&mut self) {
        self.release();
    }
}

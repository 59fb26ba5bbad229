use std::sync::Weak;
use std::sync::atomic::Ordering;

use glam::{Vec2, Vec4};
use image::RgbaImage;

use crate::surface::offscreen::{OffscreenSurface, SurfaceInner};

/// A texture view over an offscreen surface, sampled by the render pipeline.
///
/// Pull-based: the pipeline reads whatever pixels the surface holds when it
/// samples. There is no frame-ready signal, so a sample may see a frame the
/// runtime is halfway through replacing on another thread.
///
/// The handle does not keep the surface alive. After the owning bridge
/// releases or recreates its surface the handle reports invalid and samples
/// return `None`; fetch a fresh handle from the bridge.
#[derive(Debug, Clone)]
pub struct SurfaceTexture {
    surface: Weak<SurfaceInner>,
    surface_id: u64,
    width: u32,
    height: u32,
}

impl SurfaceTexture {
    #[must_use]
    pub fn new(surface: &OffscreenSurface) -> Self {
        Self {
            surface: surface.downgrade(),
            surface_id: surface.id(),
            width: surface.width(),
            height: surface.height(),
        }
    }

    #[must_use]
    pub fn surface_id(&self) -> u64 {
        self.surface_id
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.surface.strong_count() > 0
    }

    /// Current content version, for upload change detection.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.surface
            .upgrade()
            .map(|s| s.version.load(Ordering::Acquire))
    }

    /// Runs `f` over the current pixels.
    pub fn with_pixels<R>(&self, f: impl FnOnce(&RgbaImage) -> R) -> Option<R> {
        let surface = self.surface.upgrade()?;
        let pixels = surface.pixels.read();
        Some(f(&pixels))
    }

    /// Nearest-texel sample at `uv` (clamped to the edge), as linear 0..1 RGBA.
    #[must_use]
    pub fn sample(&self, uv: Vec2) -> Option<Vec4> {
        self.with_pixels(|img| sample_nearest(img, uv))
    }
}

/// Nearest texel of `img` at `uv`, clamped to the edge. `v` runs top-down.
/// An empty image samples as opaque white.
pub(crate) fn sample_nearest(img: &RgbaImage, uv: Vec2) -> Vec4 {
    if img.width() == 0 || img.height() == 0 {
        return Vec4::ONE;
    }
    let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
    let x = ((uv.x * img.width() as f32) as u32).min(img.width() - 1);
    let y = ((uv.y * img.height() as f32) as u32).min(img.height() - 1);
    let [r, g, b, a] = img.get_pixel(x, y).0;
    Vec4::new(f32::from(r), f32::from(g), f32::from(b), f32::from(a)) / 255.0
}

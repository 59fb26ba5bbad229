use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use image::RgbaImage;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{Result, SceneError};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub(crate) struct SurfaceInner {
    pub(crate) id: u64,
    pub(crate) pixels: RwLock<RgbaImage>,
    /// Bumped every time a writer releases the pixels.
    pub(crate) version: AtomicU64,
}

/// A hidden RGBA pixel buffer a vector-animation runtime draws into.
///
/// Cloning shares the same pixels. The owning bridge and its runtime hold the
/// only strong references; textures only hold weak ones, so once the bridge
/// releases the surface every texture over it goes invalid.
#[derive(Debug, Clone)]
pub struct OffscreenSurface(pub(crate) Arc<SurfaceInner>);

impl OffscreenSurface {
    /// Creates a transparent surface. Zero-sized surfaces are rejected.
    pub fn new(label: &str, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::SurfaceCreation {
                source_id: label.to_string(),
                reason: format!("invalid surface size {width}x{height}"),
            });
        }

        Ok(Self(Arc::new(SurfaceInner {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            pixels: RwLock::new(RgbaImage::new(width, height)),
            version: AtomicU64::new(0),
        })))
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.0.id
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.pixels.read().width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.pixels.read().height()
    }

    /// Content version; changes whenever a [`SurfaceWriteGuard`] is dropped.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.0.version.load(Ordering::Acquire)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RgbaImage> {
        self.0.pixels.read()
    }

    /// Locks the pixels for drawing. The version advances when the guard drops.
    pub fn write(&self) -> SurfaceWriteGuard<'_> {
        SurfaceWriteGuard {
            pixels: self.0.pixels.write(),
            version: &self.0.version,
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<SurfaceInner> {
        Arc::downgrade(&self.0)
    }
}

/// Write access to a surface's pixels.
pub struct SurfaceWriteGuard<'a> {
    pixels: RwLockWriteGuard<'a, RgbaImage>,
    version: &'a AtomicU64,
}

impl std::ops::Deref for SurfaceWriteGuard<'_> {
    type Target = RgbaImage;

    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl std::ops::DerefMut for SurfaceWriteGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl Drop for SurfaceWriteGuard<'_> {
    fn drop(&mut self) {
        self.version.fetch_add(1, Ordering::Release);
    }
}

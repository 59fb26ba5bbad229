//! Offscreen 2D surfaces bridged into the 3D pipeline as live textures.
//!
//! A vector-animation runtime (external) draws into an [`OffscreenSurface`];
//! the [`OffscreenSurfaceBridge`] owns both and hands out [`SurfaceTexture`]s
//! that materials sample every frame.

pub mod offscreen;
pub mod runtime;
pub mod texture;
pub mod material;
pub mod bridge;

pub use offscreen::{OffscreenSurface, SurfaceWriteGuard};
pub use runtime::{FitMode, RuntimeDescriptor, RuntimeFactory, VectorRuntime};
pub use texture::SurfaceTexture;
pub use material::SurfaceMaterial;
pub use bridge::{OffscreenSurfaceBridge, SurfaceSettings};

use glam::{Vec2, Vec3, Vec4};

use crate::surface::texture::SurfaceTexture;

/// Unlit/emissive material for planes showing a surface texture.
///
/// The map is optional: a missing or released texture renders the plain
/// base color instead.
#[derive(Debug, Clone)]
pub struct SurfaceMaterial {
    pub color: Vec4,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub transparent: bool,
    pub map: Option<SurfaceTexture>,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            transparent: false,
            map: None,
        }
    }
}

impl SurfaceMaterial {
    #[must_use]
    pub fn with_map(map: Option<SurfaceTexture>) -> Self {
        Self {
            map,
            ..Self::default()
        }
    }

    /// True when the map exists and its surface is still alive.
    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.map.as_ref().is_some_and(SurfaceTexture::is_valid)
    }

    /// Shaded color at `uv`: base color times texel, plus emission.
    #[must_use]
    pub fn shade(&self, uv: Vec2) -> Vec4 {
        let texel = self
            .map
            .as_ref()
            .and_then(|m| m.sample(uv))
            .unwrap_or(Vec4::ONE);

        let mut out = self.color * texel;
        out += (self.emissive * self.emissive_intensity).extend(0.0);
        if !self.transparent {
            out.w = 1.0;
        }
        out
    }
}

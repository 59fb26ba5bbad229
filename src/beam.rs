//! The lighthouse beam: an open cone hanging from its apex, and the emissive
//! textured material it is drawn with.

use std::f32::consts::{PI, TAU};
use std::path::Path;
use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use image::RgbaImage;

use crate::config::ConeConfig;
use crate::errors::{Result, SceneError};
use crate::surface::texture::sample_nearest;

pub struct ConeOptions {
    pub radius: f32,
    pub length: f32,
    pub radial_segments: u32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            length: 1.0,
            radial_segments: 32,
        }
    }
}

impl From<&ConeConfig> for ConeOptions {
    fn from(config: &ConeConfig) -> Self {
        Self {
            radius: config.radius,
            length: config.length,
            radial_segments: config.radial_segments,
        }
    }
}

/// CPU-side triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct ConeMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl ConeMesh {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Open-ended cone along -Y with its apex at the origin, so rotating the node
/// swings the beam around the lamp.
///
/// Two rings of `radial_segments + 1` vertices (the seam is duplicated for
/// UVs): a collapsed one at the apex and the open end at `y = -length`.
#[must_use]
pub fn create_cone(options: &ConeOptions) -> ConeMesh {
    let segments = options.radial_segments.max(3);
    let ring = segments + 1;

    let mut mesh = ConeMesh::default();

    for row in 0..2u32 {
        let v = row as f32;
        let radius = v * options.radius;
        let y = -v * options.length;

        for ix in 0..ring {
            let u = ix as f32 / segments as f32;
            let theta = u * TAU;
            mesh.positions.push([radius * theta.sin(), y, radius * theta.cos()]);
            mesh.uvs.push([u, 1.0 - v]);
        }
    }

    // Apex triangles collapse to lines, so only the lower half of each quad
    for ix in 0..segments {
        let b = ring + ix;
        let c = ring + ix + 1;
        let d = ix + 1;
        mesh.indices.extend_from_slice(&[b, c, d]);
    }

    mesh
}

/// Emissive, transparent, double-sided material for the beam.
#[derive(Debug, Clone)]
pub struct BeamMaterial {
    pub color: Vec4,
    pub map: Option<Arc<RgbaImage>>,
    /// Rotation of the map around its center, radians.
    pub map_rotation: f32,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub transparent: bool,
    pub double_sided: bool,
}

impl Default for BeamMaterial {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            map: None,
            map_rotation: 3.0 * PI / 2.0,
            emissive: Vec3::new(1.0, 1.0, 0.0),
            emissive_intensity: 1.0,
            transparent: true,
            double_sided: true,
        }
    }
}

impl BeamMaterial {
    /// Untextured beam material for `config`.
    #[must_use]
    pub fn new(config: &ConeConfig) -> Self {
        Self {
            emissive_intensity: config.emissive_intensity,
            ..Self::default()
        }
    }

    /// Beam material with the texture at `path`.
    pub fn load(config: &ConeConfig, path: &Path) -> Result<Self> {
        let map = image::open(path)
            .map_err(|e| SceneError::AssetLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .into_rgba8();

        log::debug!("Loaded beam texture {} ({}x{})", path.display(), map.width(), map.height());

        Ok(Self {
            map: Some(Arc::new(map)),
            ..Self::new(config)
        })
    }

    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.map.is_some()
    }

    /// Map coordinates for a surface `uv`, after `map_rotation` about the
    /// map center.
    #[must_use]
    pub fn map_uv(&self, uv: Vec2) -> Vec2 {
        let (s, c) = self.map_rotation.sin_cos();
        let d = uv - Vec2::splat(0.5);
        Vec2::new(c * d.x + s * d.y, c * d.y - s * d.x) + Vec2::splat(0.5)
    }

    /// Shaded color at `uv`: base color times texel, plus emission. The alpha
    /// comes from the texel when transparent.
    #[must_use]
    pub fn shade(&self, uv: Vec2) -> Vec4 {
        let texel = self
            .map
            .as_deref()
            .map_or(Vec4::ONE, |img| sample_nearest(img, self.map_uv(uv)));

        let mut out = self.color * texel;
        out += (self.emissive * self.emissive_intensity).extend(0.0);
        if !self.transparent {
            out.w = 1.0;
        }
        out
    }
}

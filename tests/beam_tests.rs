//! Beam Cone Tests
//!
//! Tests for:
//! - Open cone geometry hanging from its apex
//! - BeamMaterial defaults, emission and untextured fallback
//! - Texture loading and rotated map sampling

use std::path::PathBuf;

use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};

use lighthouse::beam::{BeamMaterial, ConeOptions, create_cone};
use lighthouse::config::ConeConfig;
use lighthouse::errors::SceneError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec4(a: Vec4, b: Vec4) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// 2x2 image, one color per quadrant: red, green / blue, white.
fn quadrants(tag: &str) -> PathBuf {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, Rgba([255, 255, 255, 128]));

    let path = std::env::temp_dir().join(format!("lighthouse-beam-{tag}-{}.png", std::process::id()));
    img.save(&path).unwrap();
    path
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn cone_hangs_from_apex() {
    let options = ConeOptions::from(&ConeConfig::default());
    let mesh = create_cone(&options);

    assert_eq!(mesh.positions.len(), 2 * 65);
    assert_eq!(mesh.uvs.len(), mesh.positions.len());
    assert_eq!(mesh.triangle_count(), 64);

    let (apex, rim) = mesh.positions.split_at(65);
    assert!(apex.iter().all(|p| p.iter().all(|c| approx(*c, 0.0))));
    for p in rim {
        assert!(approx(p[1], -12.0));
        assert!(approx(p[0].hypot(p[2]), 1.5));
    }
}

#[test]
fn cone_is_open_ended() {
    let mesh = create_cone(&ConeOptions::default());
    let top = mesh.positions.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < top));
    // Every triangle touches the apex ring exactly once.
    for tri in mesh.indices.chunks(3) {
        assert_eq!(tri.iter().filter(|&&i| i < 33).count(), 1);
    }
}

#[test]
fn cone_segments_have_a_floor() {
    let mesh = create_cone(&ConeOptions {
        radial_segments: 1,
        ..ConeOptions::default()
    });
    assert_eq!(mesh.triangle_count(), 3);
}

// ============================================================================
// Material
// ============================================================================

#[test]
fn beam_material_defaults() {
    let material = BeamMaterial::new(&ConeConfig::default());
    assert!(!material.is_textured());
    assert!(material.transparent);
    assert!(material.double_sided);
    assert!(approx(material.emissive_intensity, 1.5));
    assert!(approx(material.map_rotation, 3.0 * std::f32::consts::PI / 2.0));
}

#[test]
fn untextured_beam_glows_yellow() {
    let material = BeamMaterial::new(&ConeConfig::default());
    let color = material.shade(Vec2::new(0.3, 0.7));
    assert!(approx_vec4(color, Vec4::new(2.5, 2.5, 1.0, 1.0)), "got {color}");
}

#[test]
fn map_rotation_turns_uvs_about_center() {
    let material = BeamMaterial::new(&ConeConfig::default());
    let uv = material.map_uv(Vec2::new(0.25, 0.25));
    assert!((uv - Vec2::new(0.75, 0.25)).abs().max_element() < EPSILON, "got {uv}");
    let center = material.map_uv(Vec2::splat(0.5));
    assert!((center - Vec2::splat(0.5)).abs().max_element() < EPSILON);
}

#[test]
fn loaded_texture_is_sampled_through_rotation() {
    let path = quadrants("rotated");
    let mut material = BeamMaterial::load(&ConeConfig::default(), &path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(material.is_textured());

    material.emissive_intensity = 0.0;
    // (0.25, 0.25) maps to the top-right quadrant.
    let color = material.shade(Vec2::new(0.25, 0.25));
    assert!(approx_vec4(color, Vec4::new(0.0, 1.0, 0.0, 1.0)), "got {color}");

    material.map_rotation = 0.0;
    let color = material.shade(Vec2::new(0.75, 0.75));
    assert!(approx_vec4(color, Vec4::new(1.0, 1.0, 1.0, 128.0 / 255.0)), "got {color}");

    material.transparent = false;
    assert!(approx(material.shade(Vec2::new(0.75, 0.75)).w, 1.0));
}

#[test]
fn missing_texture_is_a_load_error() {
    let err = BeamMaterial::load(&ConeConfig::default(), &PathBuf::from("/no/such/beam.png")).unwrap_err();
    assert!(matches!(err, SceneError::AssetLoad { .. }));
}

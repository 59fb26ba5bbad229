//! Scene configuration.
//!
//! Asset paths and the pose constants of every element. [`SceneConfig::default`]
//! is the shipped lighthouse layout; a JSON file may override any subset of it.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::scene::Transform;
use crate::surface::{FitMode, SurfaceSettings};

/// Position, XYZ Euler rotation (radians) and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

impl Pose {
    #[must_use]
    pub const fn new(position: [f32; 3], rotation: [f32; 3], scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        let [x, y, z] = self.rotation;
        Transform::from_trs(
            Vec3::from_array(self.position),
            Quat::from_euler(EulerRot::XYZ, x, y, z),
            Vec3::splat(self.scale),
        )
    }
}

/// A model file placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub pose: Pose,
}

impl ModelConfig {
    fn new(path: &str, pose: Pose) -> Self {
        Self {
            path: PathBuf::from(path),
            pose,
        }
    }
}

/// The animated knob of the switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnobConfig {
    pub model: ModelConfig,
    /// Clip to play. `None` accepts the model's clip only if it has exactly one.
    #[serde(default)]
    pub clip: Option<String>,
}

/// The point light following the switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchLightConfig {
    /// Offset from the knob's origin, in the knob's local space.
    pub offset: [f32; 3],
    pub color: [f32; 3],
    pub peak_intensity: f32,
    /// Per-frame smoothing factor.
    pub smoothing: f32,
}

impl Default for SwitchLightConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.2, 0.2],
            color: [1.0, 1.0, 0.0],
            peak_intensity: 2.0,
            smoothing: 0.1,
        }
    }
}

/// The beam cone shown while the light is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeConfig {
    /// Beam texture, relative to the asset root.
    pub texture: PathBuf,
    pub pose: Pose,
    /// Radians per frame around the cone's local Z axis.
    pub spin_rate: f32,
    /// Radius of the open end.
    pub radius: f32,
    /// Apex to open end.
    pub length: f32,
    pub radial_segments: u32,
    pub emissive_intensity: f32,
}

impl Default for ConeConfig {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("Lighthouse_cone (0-00-00-00).png"),
            pose: Pose::new([-6.0, 3.9, -22.3], [PI / -1.9, 0.0, 0.0], 1.0),
            spin_rate: 0.01,
            radius: 1.5,
            length: 12.0,
            radial_segments: 64,
            emissive_intensity: 1.5,
        }
    }
}

/// The UI panel plane and the animation shown on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub source: String,
    pub pose: Pose,
    pub aspect: f32,
    /// World height of the panel before `pose.scale`.
    pub base_height: f32,
    /// DOM pixels per world unit for the overlay region.
    pub pixels_per_unit: f32,
    pub surface: SurfaceSettings,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            source: "assets/Resume_button.riv".to_string(),
            pose: Pose::new([1.7, -0.17, -3.2], [0.1, -0.6, 0.23], 1.3),
            aspect: 16.0 / 9.0,
            base_height: 6.0,
            pixels_per_unit: 50.0,
            surface: SurfaceSettings {
                fit: FitMode::Contain,
                state_machine: Some("State Machine 1".to_string()),
                ..SurfaceSettings::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub ambient_intensity: f32,
    pub directional_position: [f32; 3],
    pub directional_intensity: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            directional_position: [2.0, 5.0, 3.0],
            directional_intensity: 1.0,
        }
    }
}

/// Full scene layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory model and texture paths resolve against.
    pub asset_root: PathBuf,
    /// Switch state on mount.
    pub initial_on: bool,
    pub lighthouse: ModelConfig,
    pub computer: ModelConfig,
    pub switch_base: ModelConfig,
    pub knob: KnobConfig,
    pub switch_light: SwitchLightConfig,
    pub cone: ConeConfig,
    pub screen: ScreenConfig,
    pub lighting: AmbientConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let facing_west = [0.0, 3.0 * PI / 2.0, 0.0];
        let switch_pose = Pose::new([3.5, 8.0, -10.0], [0.0, 2.5 * PI / 2.0, -0.2], 1.0);

        Self {
            asset_root: PathBuf::from("public"),
            initial_on: false,
            lighthouse: ModelConfig::new(
                "Lighthouse-model.glb",
                Pose::new([4.0, -3.0, -20.0], facing_west, 1.0),
            ),
            computer: ModelConfig::new(
                "Lighthouse-model-computer.glb",
                Pose::new([-6.5, -5.0, -20.0], facing_west, 1.0),
            ),
            switch_base: ModelConfig::new("Lighthouse-model-switch.glb", switch_pose),
            knob: KnobConfig {
                model: ModelConfig::new("Lighthouse-model-switch_nob.glb", switch_pose),
                clip: None,
            },
            switch_light: SwitchLightConfig::default(),
            cone: ConeConfig::default(),
            screen: ScreenConfig::default(),
            lighting: AmbientConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded scene config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

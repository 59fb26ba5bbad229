//! Geometry of the UI panel plane that the DOM overlay compositor projects
//! onto. Compositing itself happens outside this crate.

use glam::Vec2;

use crate::config::ScreenConfig;

/// Placement and size of the panel in world units and overlay pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPanel {
    pub aspect: f32,
    pub base_height: f32,
    pub scale: f32,
    pub pixels_per_unit: f32,
}

impl OverlayPanel {
    #[must_use]
    pub fn from_config(config: &ScreenConfig) -> Self {
        Self {
            aspect: config.aspect,
            base_height: config.base_height,
            scale: config.pose.scale,
            pixels_per_unit: config.pixels_per_unit,
        }
    }

    /// Plane width and height in world units.
    #[must_use]
    pub fn world_size(&self) -> Vec2 {
        let height = self.base_height * self.scale;
        Vec2::new(height * self.aspect, height)
    }

    /// Size of the DOM region mapped onto the plane, in CSS pixels.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        self.world_size() * self.pixels_per_unit
    }
}

//! Headless run of the lighthouse scene.
//!
//! Loads the configured models (pass a JSON config path as the first
//! argument, otherwise the built-in layout is used), clicks the switch a few
//! times and prints what the render pipeline would see.

use std::sync::Arc;

use glam::Vec2;
use image::Rgba;
use lighthouse::surface::{RuntimeDescriptor, VectorRuntime};
use lighthouse::{LighthouseScene, SceneConfig, SceneModel, Timer};

/// Stand-in for the vector-animation runtime: fills the surface with a
/// slowly cycling color.
struct PulseRuntime {
    descriptor: RuntimeDescriptor,
    elapsed: f32,
    playing: bool,
}

impl VectorRuntime for PulseRuntime {
    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.elapsed += dt;
        let phase = (self.elapsed.sin() * 0.5 + 0.5) * 255.0;
        let mut pixels = self.descriptor.surface.write();
        for pixel in pixels.pixels_mut() {
            *pixel = Rgba([phase as u8, 64, 255 - phase as u8, 255]);
        }
    }

    fn stop(&mut self) {
        self.playing = false;
        println!("Runtime for '{}' stopped", self.descriptor.source);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let factory = Arc::new(
        |descriptor: RuntimeDescriptor| -> lighthouse::Result<Box<dyn VectorRuntime>> {
            let playing = descriptor.autoplay;
            Ok(Box::new(PulseRuntime {
                descriptor,
                elapsed: 0.0,
                playing,
            }))
        },
    );

    let mut root = LighthouseScene::mount(config, factory);
    let mut timer = Timer::new();

    // Give the loaders a moment; anything still pending just stays absent.
    for _ in 0..30 {
        root.update_assets();
        root.frame(timer.tick_fixed(1.0 / 60.0));
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    for model in SceneModel::ALL {
        println!("{:<10} {:?}", model.label(), root.model_status(model));
    }

    let panel = root.overlay().world_size();
    println!("Screen panel: {:.2} x {:.2} world units", panel.x, panel.y);
    println!(
        "Beam cone: {} triangles, textured: {}",
        root.cone_mesh().triangle_count(),
        root.cone_material().is_textured()
    );

    for click in 1..=3 {
        root.click_switch();
        for _ in 0..90 {
            root.update_assets();
            root.frame(timer.tick_fixed(1.0 / 60.0));
        }

        let clip = root.switch_action().map_or_else(
            || "not loaded".to_string(),
            |a| format!("{:?} at {:.2}s", a.direction(), a.time),
        );
        println!(
            "Click {click}: on={} light={:.3} cone_visible={} clip={clip}",
            root.is_on(),
            root.light_intensity(),
            root.cone_visible()
        );
    }

    if let Some(color) = root.screen_material().map.as_ref().and_then(|t| t.sample(Vec2::splat(0.5))) {
        println!("Screen center texel: {color:?}");
    }

    root.unmount();
    println!("Done after {} frames", timer.frame_count);
    Ok(())
}

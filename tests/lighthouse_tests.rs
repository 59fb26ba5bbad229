//! Lighthouse Scene Tests
//!
//! Tests for:
//! - Mounting: model placement, per-model failure, screen bridge
//! - Clicking the switch: state, knob clip, light smoothing, cone
//! - Overlapping switch targets activating once
//! - Degraded cases: knob missing, clip missing, clicks before the knob loads
//! - Beam cone texture and untextured fallback
//! - Screen source changes and unmount, clicks after unmount

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{EulerRot, Quat, Vec3};

use lighthouse::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, PlayDirection, TargetPath, Track, TrackData,
    TrackMeta,
};
use lighthouse::app::{LighthouseScene, ModelStatus, SceneModel};
use lighthouse::assets::{AssetServer, ModelAsset, ModelNode};
use lighthouse::config::SceneConfig;
use lighthouse::errors::Result;
use lighthouse::input::PointerEvent;
use lighthouse::scene::{NodeHandle, Transform};
use lighthouse::surface::{RuntimeDescriptor, RuntimeFactory, VectorRuntime};
use lighthouse::utils::Timer;

const EPSILON: f32 = 1e-4;
const FRAME: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Default)]
struct Counters {
    created: AtomicUsize,
    stopped: AtomicUsize,
}

struct NullRuntime {
    counters: Arc<Counters>,
}

impl VectorRuntime for NullRuntime {
    fn advance(&mut self, _dt: f32) {}

    fn stop(&mut self) {
        self.counters.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

fn factory(counters: &Arc<Counters>) -> Arc<dyn RuntimeFactory> {
    let counters = Arc::clone(counters);
    Arc::new(move |_: RuntimeDescriptor| -> Result<Box<dyn VectorRuntime>> {
        counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(NullRuntime {
            counters: Arc::clone(&counters),
        }))
    })
}

fn model_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn knob_model(path: &Path) -> ModelAsset {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::Y],
        InterpolationMode::Linear,
    );
    ModelAsset {
        name: model_name(path),
        nodes: vec![ModelNode {
            name: Some("Knob".to_string()),
            transform: Transform::new(),
            children: vec![],
        }],
        roots: vec![0],
        clips: vec![Arc::new(AnimationClip::new(
            "Switch",
            vec![Track {
                meta: TrackMeta {
                    node_name: "Knob".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(track),
            }],
        ))],
    }
}

fn base_model(path: &Path) -> ModelAsset {
    ModelAsset {
        name: model_name(path),
        nodes: vec![ModelNode {
            name: Some("Base".to_string()),
            transform: Transform::new(),
            children: vec![],
        }],
        roots: vec![0],
        clips: vec![],
    }
}

fn test_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.screen.surface.width = 8;
    config.screen.surface.height = 8;
    config
}

fn asset_root() -> PathBuf {
    std::env::temp_dir().join(format!("lighthouse-no-assets-{}", std::process::id()))
}

/// Mounts the scene with the switch base (and optionally the knob) already
/// loaded; every other model has already failed.
fn mount(config: SceneConfig, with_knob: bool) -> (LighthouseScene, Arc<Counters>) {
    let (mut scene, counters) = mount_unplaced(config, with_knob);
    scene.update_assets();
    (scene, counters)
}

/// Like [`mount`], but no model has been placed yet.
fn mount_unplaced(config: SceneConfig, with_knob: bool) -> (LighthouseScene, Arc<Counters>) {
    let mut assets = AssetServer::new(asset_root());

    assets.insert_model(base_model(&config.switch_base.path));
    let mut missing = vec![config.lighthouse.path.clone(), config.computer.path.clone()];
    if with_knob {
        assets.insert_model(knob_model(&config.knob.model.path));
    } else {
        missing.push(config.knob.model.path.clone());
    }
    for path in missing {
        let handle = assets.load_model(path);
        assets.wait(handle);
    }

    let counters = Arc::new(Counters::default());
    let scene = LighthouseScene::mount_with_assets(config, assets, factory(&counters));
    (scene, counters)
}

fn run(scene: &mut LighthouseScene, frames: usize) {
    for _ in 0..frames {
        scene.frame(FRAME);
    }
}

fn knob_node(scene: &LighthouseScene) -> NodeHandle {
    let instance = scene.model_instance(SceneModel::Knob).unwrap();
    scene.scene.find_in_subtree(instance, "Knob").unwrap()
}

// ============================================================================
// Mounting
// ============================================================================

#[test]
fn mount_places_loaded_models_and_isolates_failures() {
    let (scene, counters) = mount(test_config(), true);

    assert_eq!(scene.model_status(SceneModel::Knob), ModelStatus::Placed);
    assert_eq!(scene.model_status(SceneModel::SwitchBase), ModelStatus::Placed);
    assert_eq!(scene.model_status(SceneModel::Lighthouse), ModelStatus::Failed);
    assert_eq!(scene.model_status(SceneModel::Computer), ModelStatus::Failed);
    assert!(scene.model_instance(SceneModel::Lighthouse).is_none());

    assert!(!scene.is_on());
    let action = scene.switch_action().unwrap();
    assert!(!action.is_running());
    assert!(approx(scene.light_intensity(), 0.0));
    assert!(!scene.cone_visible());

    assert_eq!(counters.created.load(Ordering::SeqCst), 1);
    assert!(scene.screen_texture().is_some());
    assert!(scene.screen_material().is_textured());
}

#[test]
fn update_assets_settles_each_model_once() {
    let (mut scene, _) = mount(test_config(), true);
    assert_eq!(scene.update_assets(), 0);
}

#[test]
fn instances_hang_under_posed_groups() {
    let (scene, _) = mount(test_config(), true);
    let group = scene.model_group(SceneModel::Knob).unwrap();
    let instance = scene.model_instance(SceneModel::Knob).unwrap();
    assert_eq!(scene.scene.get_node(instance).unwrap().parent(), Some(group));

    let pose = scene.config().knob.model.pose;
    let transform = &scene.scene.get_node(group).unwrap().transform;
    assert_eq!(transform.position, Vec3::from_array(pose.position));
}

// ============================================================================
// Switch
// ============================================================================

#[test]
fn click_once_turns_on_and_plays_forward() {
    let (mut scene, _) = mount(test_config(), true);

    assert_eq!(scene.click_switch(), 1);
    assert!(scene.is_on());

    run(&mut scene, 120);
    let action = scene.switch_action().unwrap();
    assert_eq!(action.direction(), PlayDirection::Forward);
    assert!(action.is_finished());
    assert!(approx(action.time, 1.0));

    let knob = knob_node(&scene);
    assert!(approx(scene.scene.get_node(knob).unwrap().transform.position.y, 1.0));
    assert!(scene.light_intensity() > 1.99);
    assert!(scene.cone_visible());
}

#[test]
fn click_twice_rapidly_ends_off_and_reversed() {
    let (mut scene, _) = mount(test_config(), true);

    scene.click_switch();
    scene.click_switch();
    assert!(!scene.is_on());

    let action = scene.switch_action().unwrap();
    assert_eq!(action.direction(), PlayDirection::Reverse);
    assert_eq!(scene.controller().player().unwrap().mixer().len(), 1);

    run(&mut scene, 120);
    let action = scene.switch_action().unwrap();
    assert!(approx(action.time, 0.0));
    assert!(scene.light_intensity() < 0.01);
    assert!(!scene.cone_visible());
}

#[test]
fn click_mid_flight_reverses_from_current_pose() {
    let (mut scene, _) = mount(test_config(), true);

    scene.click_switch();
    run(&mut scene, 30);
    let mid = scene.switch_action().unwrap().time;
    assert!(mid > 0.0 && mid < 1.0);

    scene.click_switch();
    let action = scene.switch_action().unwrap();
    assert_eq!(action.direction(), PlayDirection::Reverse);
    assert!(approx(action.time, mid));
}

#[test]
fn knob_and_base_hit_together_activate_once() {
    let (mut scene, _) = mount(test_config(), true);
    let knob = knob_node(&scene);
    let base = scene.model_instance(SceneModel::SwitchBase).unwrap();

    let delivered = scene.click(PointerEvent::new([knob, base]));
    assert_eq!(delivered, 1);
    assert!(scene.is_on());
    assert_eq!(scene.controller().activations(), 1);
}

#[test]
fn clicks_elsewhere_do_nothing() {
    let (mut scene, _) = mount(test_config(), true);
    let screen = scene.screen();
    assert_eq!(scene.click(PointerEvent::new([screen])), 0);
    assert_eq!(scene.click(PointerEvent::default()), 0);
    assert!(!scene.is_on());
}

#[test]
fn missing_knob_model_still_toggles() {
    let (mut scene, _) = mount(test_config(), false);
    assert_eq!(scene.model_status(SceneModel::Knob), ModelStatus::Failed);

    assert_eq!(scene.click_switch(), 1);
    assert!(scene.is_on());
    assert!(scene.switch_action().is_none());

    run(&mut scene, 60);
    assert!(scene.light_intensity() > 1.99);
}

#[test]
fn missing_clip_still_toggles() {
    let mut config = test_config();
    config.knob.clip = Some("Toggle".to_string());
    let (mut scene, _) = mount(config, true);

    assert_eq!(scene.model_status(SceneModel::Knob), ModelStatus::Placed);
    assert!(scene.controller().player().is_none());

    scene.click_switch();
    run(&mut scene, 5);
    assert!(scene.is_on());
    assert!(approx(scene.scene.get_node(knob_node(&scene)).unwrap().transform.position.y, 0.0));
}

#[test]
fn click_while_knob_loads_is_not_caught_up() {
    let (mut scene, _) = mount_unplaced(test_config(), true);
    assert_eq!(scene.model_status(SceneModel::Knob), ModelStatus::Loading);

    // Hits the knob group; no clip is bound yet.
    assert_eq!(scene.click_switch(), 1);
    assert!(scene.is_on());
    assert!(scene.switch_action().is_none());

    scene.update_assets();
    scene.frame(FRAME);
    assert_eq!(scene.model_status(SceneModel::Knob), ModelStatus::Placed);

    let action = scene.switch_action().unwrap();
    assert!(!action.is_running());
    assert!(approx(action.time, 0.0));
    assert!(approx(scene.scene.get_node(knob_node(&scene)).unwrap().transform.position.y, 0.0));
    assert!(scene.is_on());

    // The next click animates from the rest pose.
    scene.click_switch();
    assert!(!scene.is_on());
    assert_eq!(scene.switch_action().unwrap().direction(), PlayDirection::Reverse);
}

#[test]
fn initially_on_click_while_knob_loads_keeps_rest_pose() {
    let mut config = test_config();
    config.initial_on = true;
    let (mut scene, _) = mount_unplaced(config, true);

    scene.click_switch();
    assert!(!scene.is_on());

    scene.update_assets();
    scene.frame(FRAME);
    assert!(!scene.switch_action().unwrap().is_running());
    assert!(approx(scene.scene.get_node(knob_node(&scene)).unwrap().transform.position.y, 0.0));
}

#[test]
fn initially_on_starts_at_end_pose() {
    let mut config = test_config();
    config.initial_on = true;
    let (mut scene, _) = mount(config, true);

    assert!(scene.is_on());
    assert!(approx(scene.light_intensity(), 2.0));

    scene.frame(FRAME);
    let action = scene.switch_action().unwrap();
    assert!(action.is_finished());
    assert!(approx(action.time, 1.0));
    assert!(scene.cone_visible());

    scene.click_switch();
    assert_eq!(scene.switch_action().unwrap().direction(), PlayDirection::Reverse);
    assert!(approx(scene.switch_action().unwrap().time, 1.0));
}

// ============================================================================
// Dependent visuals
// ============================================================================

#[test]
fn cone_without_texture_falls_back_to_plain_beam() {
    let (scene, _) = mount(test_config(), true);

    assert!(!scene.cone_material().is_textured());
    assert!(scene.cone_material().transparent);
    assert_eq!(scene.cone_mesh().triangle_count(), 64);
}

#[test]
fn cone_loads_texture_from_asset_root() {
    let mut config = test_config();
    config.cone.texture = PathBuf::from("beam-test.png");
    config.cone.emissive_intensity = 0.5;
    std::fs::create_dir_all(asset_root()).unwrap();
    image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]))
        .save(asset_root().join("beam-test.png"))
        .unwrap();

    let (scene, _) = mount(config, true);
    let material = scene.cone_material();
    assert!(material.is_textured());
    assert!(approx(material.emissive_intensity, 0.5));
    assert_eq!(material.map.as_ref().unwrap().dimensions(), (4, 4));
}

#[test]
fn cone_spins_only_while_on() {
    let (mut scene, _) = mount(test_config(), true);
    run(&mut scene, 10);
    assert!(approx(scene.cone_angle(), 0.0));

    scene.click_switch();
    run(&mut scene, 10);
    let angle = scene.cone_angle();
    assert!(approx(angle, 0.1));

    let [x, y, z] = scene.config().cone.pose.rotation;
    let expected = Quat::from_euler(EulerRot::XYZ, x, y, z + angle);
    let rotation = scene.scene.get_node(scene.cone()).unwrap().transform.rotation;
    assert!(rotation.angle_between(expected) < 1e-4);

    scene.click_switch();
    run(&mut scene, 10);
    assert!(approx(scene.cone_angle(), angle));
}

#[test]
fn switch_light_rides_on_knob_group() {
    let (mut scene, _) = mount(test_config(), true);
    let light = scene.switch_light();
    let group = scene.model_group(SceneModel::Knob).unwrap();
    assert_eq!(scene.scene.get_node(light).unwrap().parent(), Some(group));

    scene.frame(FRAME);
    let offset = Vec3::from_array(scene.config().switch_light.offset);
    let expected = scene
        .scene
        .get_node(group)
        .unwrap()
        .transform
        .world_matrix()
        .transform_point3(offset);
    let actual = scene.scene.get_node(light).unwrap().transform.world_position();
    assert!((actual - expected).length() < EPSILON);
}

#[test]
fn overlay_panel_matches_screen_config() {
    let (scene, _) = mount(test_config(), true);
    let size = scene.overlay().world_size();
    assert!(approx(size.y, 6.0 * 1.3));
    assert!(approx(size.x, 6.0 * 1.3 * 16.0 / 9.0));
    assert!(approx(scene.overlay().pixel_size().y, 6.0 * 1.3 * 50.0));
}

// ============================================================================
// Screen & unmount
// ============================================================================

#[test]
fn changing_screen_source_rebinds_material() {
    let (mut scene, counters) = mount(test_config(), true);
    let old = scene.screen_texture().unwrap();

    scene.set_screen_source("assets/Other.riv");
    assert!(!old.is_valid());
    assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    assert!(scene.screen_material().is_textured());
    assert_eq!(scene.bridge().source(), "assets/Other.riv");
}

#[test]
fn unmount_stops_screen_once_and_freezes_frames() {
    let (mut scene, counters) = mount(test_config(), true);
    scene.click_switch();
    scene.unmount();

    assert!(!scene.is_mounted());
    assert!(scene.screen_texture().is_none());
    assert!(!scene.screen_material().is_textured());
    assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);

    let before = scene.light_intensity();
    run(&mut scene, 10);
    assert!(approx(scene.light_intensity(), before));

    scene.unmount();
    drop(scene);
    assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
}

#[test]
fn clicks_after_unmount_are_ignored() {
    let (mut scene, _) = mount(test_config(), true);
    scene.unmount();

    assert_eq!(scene.click_switch(), 0);
    let knob = knob_node(&scene);
    assert_eq!(scene.click(PointerEvent::new([knob])), 0);
    assert!(!scene.is_on());
    assert_eq!(scene.controller().activations(), 0);
}

// ============================================================================
// Timer
// ============================================================================

#[test]
fn timer_fixed_steps_accumulate() {
    let mut timer = Timer::new();
    for _ in 0..60 {
        timer.tick_fixed(FRAME);
    }
    assert_eq!(timer.frame_count, 60);
    assert!((timer.elapsed.as_secs_f32() - 1.0).abs() < 1e-3);
    assert!(approx(timer.dt_seconds(), FRAME));
}

#[test]
fn timer_clamps_long_frames() {
    let mut timer = Timer::new();
    let dt = timer.tick_fixed(5.0);
    assert!(approx(dt, timer.max_delta.as_secs_f32()));
}

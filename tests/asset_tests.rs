//! Asset Loading Tests
//!
//! Tests for:
//! - GltfLoader: node hierarchy, names, TRS, animation clips from data URIs
//! - Fallback naming for unnamed nodes / scene-less files
//! - AssetServer: background loads, dedup by path, failed state
//! - ModelAsset clip resolution

#![cfg(feature = "gltf")]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use glam::Vec3;

use lighthouse::animation::{AnimationClip, TargetPath, TrackData};
use lighthouse::assets::{AssetServer, GltfLoader, LoadState, ModelAsset};
use lighthouse::errors::SceneError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// A two-node switch (base with a knob child) whose "Switch" clip moves the
/// knob from the origin to +Y over `duration` seconds.
fn switch_gltf(duration: f32) -> String {
    let data: [f32; 8] = [0.0, duration, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let bytes: &[u8] = bytemuck::cast_slice(&data);
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [
    {{ "name": "Base", "children": [1], "translation": [1.0, 2.0, 3.0] }},
    {{ "name": "Knob", "scale": [2.0, 2.0, 2.0] }}
  ],
  "buffers": [{{ "byteLength": 32, "uri": "data:application/octet-stream;base64,{encoded}" }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 8, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [{duration}] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ],
  "animations": [{{
    "name": "Switch",
    "samplers": [{{ "input": 0, "output": 1, "interpolation": "LINEAR" }}],
    "channels": [{{ "sampler": 0, "target": {{ "node": 1, "path": "translation" }} }}]
  }}]
}}"#
    )
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lighthouse-assets-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn clip(name: &str) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(name, vec![]))
}

// ============================================================================
// GltfLoader
// ============================================================================

#[test]
fn gltf_reads_hierarchy_and_transforms() {
    let json = switch_gltf(0.5);
    let model = GltfLoader::load_from_slice("switch", json.as_bytes(), Path::new(".")).unwrap();

    assert_eq!(model.name, "switch");
    assert_eq!(model.nodes.len(), 2);
    assert_eq!(model.roots, vec![0]);
    assert_eq!(model.nodes[0].name.as_deref(), Some("Base"));
    assert_eq!(model.nodes[0].children, vec![1]);
    assert_eq!(model.nodes[0].transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(model.nodes[1].transform.scale, Vec3::splat(2.0));
}

#[test]
fn gltf_reads_animation_clip() {
    let json = switch_gltf(0.5);
    let model = GltfLoader::load_from_slice("switch", json.as_bytes(), Path::new(".")).unwrap();

    assert_eq!(model.clips.len(), 1);
    let clip = &model.clips[0];
    assert_eq!(clip.name, "Switch");
    assert!(approx(clip.duration, 0.5));

    let track = &clip.tracks[0];
    assert_eq!(track.meta.node_name, "Knob");
    assert_eq!(track.meta.target, TargetPath::Translation);
    let TrackData::Vector3(keys) = &track.data else {
        panic!("translation track should hold Vec3 keys");
    };
    let mid = keys.sample(0.25).unwrap();
    assert!(approx(mid.y, 0.5), "Expected y=0.5, got {mid}");
}

#[test]
fn gltf_skips_channel_without_target_node() {
    let json = switch_gltf(0.5).replace(
        r#""channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }]"#,
        r#""channels": [
      { "sampler": 0, "target": { "path": "translation" } },
      { "sampler": 0, "target": { "node": 1, "path": "translation" } }
    ]"#,
    );
    assert!(json.contains(r#""target": { "path": "translation" }"#));

    let model = GltfLoader::load_from_slice("switch", json.as_bytes(), Path::new(".")).unwrap();
    let clip = &model.clips[0];
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "Knob");
    assert!(approx(clip.duration, 0.5));
}

#[test]
fn gltf_unnamed_nodes_and_no_scene() {
    let json = r#"{
  "asset": { "version": "2.0" },
  "nodes": [ { "children": [1] }, {} , {} ]
}"#;
    let model = GltfLoader::load_from_slice("bare", json.as_bytes(), Path::new(".")).unwrap();
    assert_eq!(model.nodes[0].name.as_deref(), Some("Node_0"));
    assert_eq!(model.roots, vec![0, 2]);
    assert!(model.clips.is_empty());
}

#[test]
fn gltf_rejects_non_base64_data_uri() {
    let json = r#"{
  "asset": { "version": "2.0" },
  "buffers": [ { "byteLength": 4, "uri": "data:application/octet-stream,abcd" } ]
}"#;
    let err = GltfLoader::load_from_slice("bad", json.as_bytes(), Path::new(".")).unwrap_err();
    assert!(matches!(err, SceneError::DataUriError(_)), "got {err}");
}

#[test]
fn gltf_garbage_is_an_error() {
    assert!(GltfLoader::load_from_slice("junk", b"not a model", Path::new(".")).is_err());
}

#[test]
fn gltf_missing_file_is_not_found() {
    let err = GltfLoader::load(Path::new("/definitely/not/here.glb")).unwrap_err();
    assert!(matches!(err, SceneError::AssetNotFound(_)));
}

#[test]
fn gltf_load_from_disk_uses_file_stem() {
    let dir = temp_dir("stem");
    let path = dir.join("Lighthouse-model-switch_nob.gltf");
    std::fs::write(&path, switch_gltf(1.0)).unwrap();

    let model = GltfLoader::load(&path).unwrap();
    assert_eq!(model.name, "Lighthouse-model-switch_nob");
    assert!(model.clip("Switch").is_some());
}

// ============================================================================
// AssetServer
// ============================================================================

#[test]
fn server_loads_in_background() {
    let dir = temp_dir("server");
    std::fs::write(dir.join("knob.gltf"), switch_gltf(1.0)).unwrap();

    let mut server = AssetServer::new(&dir);
    let handle = server.load_model("knob.gltf");
    assert_eq!(server.path(handle), Some(dir.join("knob.gltf").as_path()));

    match server.wait(handle) {
        LoadState::Ready(model) => assert_eq!(model.clips.len(), 1),
        other => panic!("expected Ready, got {other:?}"),
    }
    assert!(server.get(handle).is_some());
}

#[test]
fn server_dedups_same_path() {
    let mut server = AssetServer::new(temp_dir("dedup"));
    let a = server.load_model("missing.glb");
    let b = server.load_model("missing.glb");
    assert_eq!(a, b);
}

#[test]
fn server_missing_file_fails_only_that_model() {
    let dir = temp_dir("partial");
    std::fs::write(dir.join("knob.gltf"), switch_gltf(1.0)).unwrap();

    let mut server = AssetServer::new(&dir);
    let missing = server.load_model("lighthouse.glb");
    let present = server.load_model("knob.gltf");

    match server.wait(missing) {
        LoadState::Failed(err) => assert!(matches!(*err, SceneError::AssetNotFound(_))),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(matches!(server.wait(present), LoadState::Ready(_)));
    assert!(server.get(missing).is_none());
}

#[test]
fn server_insert_model_is_ready_immediately() {
    let mut server = AssetServer::new("assets");
    let handle = server.insert_model(ModelAsset {
        name: "knob.glb".to_string(),
        ..ModelAsset::default()
    });
    assert!(server.state(handle).is_some_and(LoadState::is_settled));
    // Requesting the same path reuses the inserted model.
    assert_eq!(server.load_model("knob.glb"), handle);
    assert_eq!(server.poll(), 0);
}

// ============================================================================
// ModelAsset clip resolution
// ============================================================================

#[test]
fn resolve_clip_by_name_or_single() {
    let single = ModelAsset {
        name: "knob".into(),
        clips: vec![clip("Switch")],
        ..ModelAsset::default()
    };
    assert_eq!(single.resolve_clip(None).unwrap().name, "Switch");
    assert_eq!(single.resolve_clip(Some("Switch")).unwrap().name, "Switch");
    assert!(matches!(
        single.resolve_clip(Some("Other")),
        Err(SceneError::MissingClip { .. })
    ));
}

#[test]
fn resolve_clip_refuses_to_guess() {
    let several = ModelAsset {
        name: "knob".into(),
        clips: vec![clip("On"), clip("Off")],
        ..ModelAsset::default()
    };
    assert!(several.resolve_clip(None).is_err());
    assert_eq!(several.resolve_clip(Some("Off")).unwrap().name, "Off");

    let none = ModelAsset::default();
    assert!(none.resolve_clip(None).is_err());
}

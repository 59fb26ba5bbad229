use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use gltf::animation::util::ReadOutputs;
use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::model::{ModelAsset, ModelNode};
use crate::errors::{Result, SceneError};
use crate::scene::Transform;

/// Reads the node hierarchy and animation clips out of `.gltf` / `.glb` files.
pub struct GltfLoader;

impl GltfLoader {
    /// Loads a model from disk. Relative buffer URIs resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<ModelAsset> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SceneError::AssetNotFound(path.display().to_string()),
            _ => SceneError::IoError(e),
        })?;

        let name = path
            .file_stem()
            .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().into_owned());
        let base_path = path.parent().unwrap_or(Path::new("./"));

        Self::load_from_slice(&name, &bytes, base_path)
    }

    /// Parses a model from memory (JSON glTF or binary GLB).
    pub fn load_from_slice(name: &str, bytes: &[u8], base_path: &Path) -> Result<ModelAsset> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let unsupported: Vec<_> = gltf.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("'{name}' requires extensions {unsupported:?}; display may be incorrect");
        }

        let buffers = Self::load_buffers(&gltf, base_path)?;

        let nodes = gltf
            .nodes()
            .map(|node| {
                let (t, r, s) = node.transform().decomposed();
                ModelNode {
                    name: Some(node_name(&node)),
                    transform: Transform::from_trs(
                        Vec3::from_array(t),
                        Quat::from_array(r),
                        Vec3::from_array(s),
                    ),
                    children: node.children().map(|c| c.index()).collect(),
                }
            })
            .collect::<Vec<_>>();

        let roots = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => scene.nodes().map(|n| n.index()).collect(),
            None => {
                // No scene declared: every node nobody lists as a child is a root
                let mut is_child = vec![false; nodes.len()];
                for n in &nodes {
                    for &c in &n.children {
                        if let Some(flag) = is_child.get_mut(c) {
                            *flag = true;
                        }
                    }
                }
                (0..nodes.len()).filter(|&i| !is_child[i]).collect()
            }
        };

        let clips = Self::load_animations(&gltf, &buffers)
            .into_iter()
            .map(Arc::new)
            .collect::<Vec<_>>();

        log::info!(
            "Loaded model '{name}': {} nodes, {} clips {:?}",
            nodes.len(),
            clips.len(),
            clips.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        Ok(ModelAsset {
            name: name.to_string(),
            nodes,
            roots,
            clips,
        })
    }

    fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_deref()
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| SceneError::GltfError("Missing GLB binary chunk".to_string()))?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => {
                    let buffer_path = base_path.join(uri);
                    std::fs::read(&buffer_path).map_err(|e| SceneError::AssetLoad {
                        path: buffer_path.display().to_string(),
                        reason: e.to_string(),
                    })?
                }
            };
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let clip_name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let Some(node) = channel.target().node() else {
                    log::warn!("Clip '{clip_name}': channel without a target node, skipped");
                    continue;
                };
                let target_node = node_name(&node);

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("Clip '{clip_name}': channel without keyframe times, skipped");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let (target_path, data) = match reader.read_outputs() {
                    Some(ReadOutputs::Translations(iter)) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    Some(ReadOutputs::Rotations(iter)) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    Some(ReadOutputs::Scales(iter)) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    Some(ReadOutputs::MorphTargetWeights(_)) => {
                        log::debug!("Clip '{clip_name}': morph target channel ignored");
                        continue;
                    }
                    None => {
                        log::warn!("Clip '{clip_name}': channel without output values, skipped");
                        continue;
                    }
                };

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name: target_node,
                        target: target_path,
                    },
                    data,
                });
            }

            animations.push(AnimationClip::new(clip_name, tracks));
        }

        animations
    }
}

/// Node name, or a stable index-based fallback so that unnamed nodes can still
/// be bound by animation tracks.
fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| SceneError::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(SceneError::DataUriError(format!(
            "unsupported encoding in '{header}'"
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::animation::{Channel, ChannelOutputs, Clip, Interpolation};
use crate::math::Aabb;
use crate::scene::{Mesh, Model, Node, Vertex, MODEL_POSITION, MODEL_ROTATION_Y, MODEL_SCALE};

/// Result of a successful import: the flattened model plus its clips.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub model: Model,
    pub clips: Vec<Clip>,
}

/// Imports a `.glb`/`.gltf` file into the viewer's scene representation.
///
/// The default scene's node tree is flattened parent-before-child under a
/// synthetic root carrying the viewer's fixed model placement. Every mesh is
/// marked clickable. Single attempt; any transport or parse failure surfaces
/// as an error with no partial result.
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    info!("loading model: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("failed to load model {:?}", path))?;

    info!(
        "model parsed: {} nodes, {} meshes, {} animations",
        document.nodes().count(),
        document.meshes().count(),
        document.animations().count()
    );

    let mut model = Model::default();
    let mut root = Node::new("model-root", None);
    root.translation = MODEL_POSITION;
    root.rotation = Quat::from_rotation_y(MODEL_ROTATION_Y);
    root.scale = MODEL_SCALE;
    model.nodes.push(root);

    // glTF node index -> flattened node index, for animation retargeting
    let mut node_map = vec![usize::MAX; document.nodes().count()];

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file contains no scenes")?;
    for node in scene.nodes() {
        flatten_node(&node, &buffers, 0, &mut model, &mut node_map);
    }

    if model.meshes.is_empty() {
        warn!("no geometry found in {:?}", path);
    }

    let clips = document
        .animations()
        .map(|animation| decode_clip(&animation, &buffers, &node_map))
        .collect::<Vec<_>>();

    Ok(LoadedModel { model, clips })
}

/// Runs `load_model` on a background thread. The receiver resolves exactly
/// once; the caller polls it from the frame loop so rendering and input keep
/// working while the load is in flight. No cancellation, no timeout.
pub fn spawn_load(path: PathBuf) -> mpsc::Receiver<Result<LoadedModel>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_model(&path);
        // A closed receiver just means the viewer exited first
        let _ = tx.send(result);
    });
    rx
}

fn flatten_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent: usize,
    model: &mut Model,
    node_map: &mut [usize],
) {
    let index = model.nodes.len();
    node_map[node.index()] = index;

    let (translation, rotation, scale) = node.transform().decomposed();
    let mut flat = Node::new(
        node.name().unwrap_or("unnamed").to_string(),
        Some(parent),
    );
    flat.translation = Vec3::from(translation);
    flat.rotation = Quat::from_array(rotation);
    flat.scale = Vec3::from(scale);
    model.nodes.push(flat);

    if let Some(mesh) = node.mesh() {
        extract_mesh(&mesh, buffers, index, model);
    }

    for child in node.children() {
        flatten_node(&child, buffers, index, model, node_map);
    }
}

fn extract_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    node: usize,
    model: &mut Model,
) {
    let mesh_name = mesh.name().unwrap_or("unnamed");

    for (prim_index, primitive) in mesh.primitives().enumerate() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let Some(positions) = reader.read_positions() else {
            warn!("mesh {:?} primitive {} has no positions, skipping", mesh_name, prim_index);
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        if positions.is_empty() {
            continue;
        }

        let mut bounds = Aabb::new(Vec3::from(positions[0]), Vec3::from(positions[0]));
        for &p in &positions {
            bounds.expand(Vec3::from(p));
        }

        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(normals) => normals.collect(),
            None => vec![[0.0, 1.0, 0.0]; positions.len()],
        };

        let vertices = positions
            .iter()
            .zip(&normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let base = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        model.meshes.push(Mesh {
            name: if prim_index == 0 {
                mesh_name.to_string()
            } else {
                format!("{}.{}", mesh_name, prim_index)
            },
            node,
            vertices,
            indices,
            base_color: [base[0], base[1], base[2]],
            bounds,
            clickable: true,
        });
    }
}

fn decode_clip(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    node_map: &[usize],
) -> Clip {
    use gltf::animation::util::ReadOutputs;

    let name = animation.name().unwrap_or("unnamed").to_string();
    let mut channels = Vec::new();
    let mut duration = 0.0f32;

    for channel in animation.channels() {
        let target_node = node_map
            .get(channel.target().node().index())
            .copied()
            .unwrap_or(usize::MAX);
        if target_node == usize::MAX {
            // Channel targets a node outside the loaded scene
            continue;
        }

        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        if let Some(&last) = times.last() {
            duration = duration.max(last);
        }

        let outputs = match reader.read_outputs() {
            Some(ReadOutputs::Translations(values)) => {
                ChannelOutputs::Translations(values.map(Vec3::from).collect())
            }
            Some(ReadOutputs::Scales(values)) => {
                ChannelOutputs::Scales(values.map(Vec3::from).collect())
            }
            Some(ReadOutputs::Rotations(values)) => ChannelOutputs::Rotations(
                values.into_f32().map(Quat::from_array).collect(),
            ),
            Some(ReadOutputs::MorphTargetWeights(_)) => {
                warn!("clip {:?}: morph target channel ignored", name);
                continue;
            }
            None => continue,
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        channels.push(Channel {
            target_node,
            times,
            outputs,
            interpolation,
        });
    }

    Clip {
        name,
        duration,
        channels,
    }
}

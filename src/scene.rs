use glam::{Mat4, Quat, Vec3};

use crate::math::Aabb;

/// Fixed placement applied to the model root on attach. The asset is authored
/// Z-up, so it gets a quarter turn about Y; no auto-fit.
pub const MODEL_ROTATION_Y: f32 = -std::f32::consts::FRAC_PI_2;
pub const MODEL_POSITION: Vec3 = Vec3::ZERO;
pub const MODEL_SCALE: Vec3 = Vec3::ONE;

/// Interleaved vertex layout shared with the render pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Light rig: flat ambient plus a single directional source.
#[derive(Copy, Clone, Debug)]
pub struct Lighting {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    pub sun_direction: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.8,
            // 0xe9fcff, a cold white
            sun_color: Vec3::new(0xe9 as f32 / 255.0, 0xfc as f32 / 255.0, 1.0),
            sun_intensity: 3.0,
            sun_direction: Vec3::new(2.0, 2.0, -1.0).normalize(),
        }
    }
}

/// One transform in the model hierarchy. Nodes are stored parent-before-child
/// so a single forward pass refreshes every cached global matrix.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub global: Mat4,
}

impl Node {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            global: Mat4::IDENTITY,
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Renderable surface owned by one node.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub node: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 3],
    /// Node-local bounds, used for picking.
    pub bounds: Aabb,
    /// Surfaces that respond to click/touch interaction.
    pub clickable: bool,
}

/// The loaded asset: a flattened node hierarchy plus its meshes.
/// Created once on a successful load and kept for the rest of the session.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Recomputes every cached global matrix from the local TRS values.
    /// Relies on the parent-before-child node ordering.
    pub fn update_global_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].local_matrix();
            self.nodes[i].global = match self.nodes[i].parent {
                Some(p) => self.nodes[p].global * local,
                None => local,
            };
        }
    }

    /// World-space bounds of a mesh under the current pose.
    pub fn mesh_world_bounds(&self, mesh: &Mesh) -> Aabb {
        mesh.bounds.transformed(&self.nodes[mesh.node].global)
    }

    /// True when any node reports a zero scale on any axis. Such a model
    /// cannot be displayed meaningfully and the load is rejected.
    pub fn has_degenerate_scale(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| n.scale.x == 0.0 || n.scale.y == 0.0 || n.scale.z == 0.0)
    }
}

/// Everything the renderer draws: light rig and at most one model.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub lighting: Lighting,
    pub model: Option<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            lighting: Lighting::default(),
            model: None,
        }
    }

    pub fn attach_model(&mut self, mut model: Model) {
        model.update_global_transforms();
        self.model = Some(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_model() -> Model {
        let mut root = Node::new("root", None);
        root.translation = Vec3::new(1.0, 0.0, 0.0);
        let mut child = Node::new("child", Some(0));
        child.translation = Vec3::new(0.0, 2.0, 0.0);
        Model {
            nodes: vec![root, child],
            meshes: vec![],
        }
    }

    #[test]
    fn global_transforms_compose_down_the_hierarchy() {
        let mut model = two_node_model();
        model.update_global_transforms();
        let child_pos = model.nodes[1].global.transform_point3(Vec3::ZERO);
        assert!((child_pos - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn degenerate_scale_is_detected() {
        let mut model = two_node_model();
        assert!(!model.has_degenerate_scale());
        model.nodes[1].scale = Vec3::new(1.0, 0.0, 1.0);
        assert!(model.has_degenerate_scale());
    }

    #[test]
    fn mesh_world_bounds_follow_the_owning_node() {
        let mut model = two_node_model();
        model.meshes.push(Mesh {
            name: "quad".into(),
            node: 1,
            vertices: vec![],
            indices: vec![],
            base_color: [1.0, 1.0, 1.0],
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            clickable: true,
        });
        model.update_global_transforms();
        let bounds = model.mesh_world_bounds(&model.meshes[0]);
        assert!((bounds.center() - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }
}

use glam::Vec2;

use crate::math::Ray;
use crate::scene::Scene;

/// Nearest surface under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub mesh: usize,
    pub distance: f32,
}

/// Maps a window-space pointer position to normalized device coordinates
/// (x right, y up, both in [-1, 1]).
pub fn viewport_to_ndc(position: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (position.x / viewport.x) * 2.0 - 1.0,
        -(position.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Casts `ray` against every mesh in the scene and returns the nearest hit,
/// clickable or not; the caller decides what a hit means.
pub fn pick(scene: &Scene, ray: &Ray) -> Option<Hit> {
    let model = scene.model.as_ref()?;

    let mut nearest: Option<Hit> = None;
    for (index, mesh) in model.meshes.iter().enumerate() {
        let bounds = model.mesh_world_bounds(mesh);
        let Some(distance) = ray.intersect_aabb(&bounds) else {
            continue;
        };
        if nearest.is_none_or(|hit| distance < hit.distance) {
            nearest = Some(Hit {
                mesh: index,
                distance,
            });
        }
    }
    nearest
}

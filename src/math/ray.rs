use glam::Vec3;

use crate::math::Aabb;

/// A picking ray in world space. Direction is expected to be normalized.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab-method intersection against an AABB.
    ///
    /// Returns the nearest positive hit distance, or `None` on a miss.
    /// Rays starting inside the box return the exit distance.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        const EPSILON: f32 = 1e-8;

        // Clamp near-zero components so the division stays finite while
        // preserving the sign of the direction.
        let safe = |d: f32| {
            if d.abs() < EPSILON {
                1.0 / EPSILON.copysign(d)
            } else {
                1.0 / d
            }
        };
        let inv_dir = Vec3::new(
            safe(self.direction.x),
            safe(self.direction.y),
            safe(self.direction.z),
        );

        let t_min = (aabb.min - self.origin) * inv_dir;
        let t_max = (aabb.max - self.origin) * inv_dir;

        let t1 = t_min.min(t_max);
        let t2 = t_min.max(t_max);

        let t_near = t1.x.max(t1.y).max(t1.z);
        let t_far = t2.x.min(t2.y).min(t2.z);

        if t_near > t_far || t_far < 0.0 {
            return None;
        }

        if t_near < 0.0 {
            (t_far > 1e-3).then_some(t_far)
        } else {
            Some(t_near)
        }
    }
}

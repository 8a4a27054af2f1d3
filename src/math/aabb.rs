use glam::{Mat4, Vec3};

/// Axis-aligned bounding box in whatever space the caller keeps it in.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Grows the box to enclose a single point.
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// All eight corners, used when re-bounding under a transform.
    pub fn corners(&self) -> [Vec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Vec3::new(mn.x, mn.y, mn.z),
            Vec3::new(mx.x, mn.y, mn.z),
            Vec3::new(mn.x, mx.y, mn.z),
            Vec3::new(mx.x, mx.y, mn.z),
            Vec3::new(mn.x, mn.y, mx.z),
            Vec3::new(mx.x, mn.y, mx.z),
            Vec3::new(mn.x, mx.y, mx.z),
            Vec3::new(mx.x, mx.y, mx.z),
        ]
    }

    /// World-space box enclosing this box under `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Aabb {
        let first = transform.transform_point3(self.min);
        let mut out = Aabb::new(first, first);
        for corner in self.corners() {
            out.expand(transform.transform_point3(corner));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_aabb_new() {
        let min = Vec3::new(0.0, 0.0, 0.0);
        let max = Vec3::new(1.0, 1.0, 1.0);
        let aabb = Aabb::new(min, max);
        assert_eq!(aabb.min, min);
        assert_eq!(aabb.max, max);
    }

    #[test]
    fn test_aabb_expand() {
        let mut aabb = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        aabb.expand(Vec3::new(-1.0, 2.0, 0.5));
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(0.0, 2.0, 0.5));
    }

    #[test]
    fn test_aabb_union() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_aabb_center() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_transformed_translation() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(moved.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_transformed_rotation_grows_bounds() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rot = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let rotated = aabb.transformed(&rot);
        // A 45-degree rotation of a unit cube widens x/z to sqrt(2)
        assert!((rotated.max.x - 2f32.sqrt()).abs() < 1e-4);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }
}

use glam::{Mat4, Vec2, Vec3};

use crate::math::Ray;

pub const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.1;
/// Per-frame velocity retention; lower means the orbit coasts to a stop faster.
const DAMPING: f32 = 0.85;
const MIN_DISTANCE: f32 = 0.05;
/// Keeps the pitch off the poles so the view never flips.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera around a fixed target with inertial damping.
///
/// Pointer drags and wheel ticks feed velocities; `update` applies and decays
/// them once per frame, input or not, so released drags coast smoothly.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    aspect: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}

impl OrbitCamera {
    /// Starts at the viewer's fixed home pose: half a unit from the origin,
    /// looking down at it from slightly above.
    pub fn new(aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: (0.4f32 / 0.5).asin(),
            distance: 0.5,
            aspect,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Feeds a pointer drag, in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw_velocity += delta.x * ROTATE_SPEED;
        self.pitch_velocity += delta.y * ROTATE_SPEED;
    }

    /// Feeds a wheel tick or pinch step; positive zooms in.
    pub fn zoom(&mut self, amount: f32) {
        self.zoom_velocity += amount * ZOOM_SPEED;
    }

    /// Advances the damped motion by one frame. Must run every frame
    /// regardless of input so residual velocity decays.
    pub fn update(&mut self) {
        self.yaw -= self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * (1.0 - self.zoom_velocity)).max(MIN_DISTANCE);

        self.yaw_velocity *= DAMPING;
        self.pitch_velocity *= DAMPING;
        self.zoom_velocity *= DAMPING;
    }

    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, self.aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point given in normalized device
    /// coordinates (x right, y up, both in [-1, 1]).
    pub fn viewport_ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.eye(), far - near)
    }
}

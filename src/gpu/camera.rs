//! Orbit camera around the particle cloud.

use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.3;
const PITCH_LIMIT: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;

/// Orbit camera: drag to rotate, scroll to zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// Camera five units in front of the origin, looking at it.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect, NEAR, FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Rotate by a pointer drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + dy * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move closer for positive `scroll`, farther for negative.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance - scroll * ZOOM_SENSITIVITY).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let cam = Camera::new();
        assert!((cam.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut cam = Camera::new();
        cam.orbit(0.0, 10_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.orbit(0.0, -100_000.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = Camera::new();
        cam.orbit(123.0, -45.0);
        assert!((cam.position().length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut cam = Camera::new();
        cam.zoom(1_000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(-1_000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let cam = Camera::new();
        let clip = cam.view_proj(16.0 / 9.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}

//! Damped orbit controls
//!
//! Input accumulates into pending deltas; every frame `update` applies a
//! `damping_factor` fraction of them to the camera and decays the rest, so
//! motion eases out after the pointer is released.

use glam::{Vec2, Vec3};

use crate::state::settings::CameraSettings;
use crate::viewport::camera::ArcBallCamera;

const PITCH_LIMIT: f32 = 1.5;
/// Pending motion below this is dropped
const REST_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping_factor: f32,
    pub enabled: bool,
    /// yaw, pitch (radians)
    rotate_delta: Vec2,
    /// right, up (world units)
    pan_delta: Vec2,
    zoom_delta: f32,
    disposed: bool,
}

impl OrbitControls {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            target: Vec3::ZERO,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance.max(settings.min_distance),
            damping_factor: settings.damping_factor.clamp(0.0, 1.0),
            enabled: true,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
            zoom_delta: 0.0,
            disposed: false,
        }
    }

    fn accepts_input(&self) -> bool {
        self.enabled && !self.disposed
    }

    /// Orbit by a drag, in degrees
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if self.accepts_input() {
            self.rotate_delta += Vec2::new(dx.to_radians(), dy.to_radians());
        }
    }

    /// Positive zooms in
    pub fn zoom(&mut self, delta: f32) {
        if self.accepts_input() {
            self.zoom_delta += delta;
        }
    }

    /// Move the target along the camera's right and up vectors
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.accepts_input() {
            self.pan_delta += Vec2::new(dx, dy);
        }
    }

    /// Advance one frame. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut ArcBallCamera) -> bool {
        if self.disposed {
            return false;
        }
        let before = camera.clone();
        // A zero factor would never move the camera
        let f = if self.damping_factor > 0.0 { self.damping_factor } else { 1.0 };

        camera.yaw += self.rotate_delta.x * f;
        camera.pitch = (camera.pitch + self.rotate_delta.y * f).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera.distance *= 1.0 - self.zoom_delta * f;

        let offset = camera.right_vector() * self.pan_delta.x + camera.up_vector() * self.pan_delta.y;
        self.target += offset * f;
        camera.target = self.target;
        camera.distance = camera.distance.clamp(self.min_distance, self.max_distance);

        let keep = 1.0 - f;
        self.rotate_delta *= keep;
        self.pan_delta *= keep;
        self.zoom_delta *= keep;
        if self.rotate_delta.length() < REST_EPSILON {
            self.rotate_delta = Vec2::ZERO;
        }
        if self.pan_delta.length() < REST_EPSILON {
            self.pan_delta = Vec2::ZERO;
        }
        if self.zoom_delta.abs() < REST_EPSILON {
            self.zoom_delta = 0.0;
        }

        *camera != before
    }

    /// Adopt the camera's target and drop pending motion (after reframing)
    pub fn sync(&mut self, camera: &mut ArcBallCamera) {
        self.target = camera.target;
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.zoom_delta = 0.0;
        camera.distance = camera.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Apply new limits and damping; pending motion is kept
    pub fn configure(&mut self, settings: &CameraSettings, camera: &mut ArcBallCamera) {
        self.min_distance = settings.min_distance;
        self.max_distance = settings.max_distance.max(settings.min_distance);
        self.damping_factor = settings.damping_factor.clamp(0.0, 1.0);
        camera.distance = camera.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn is_settled(&self) -> bool {
        self.rotate_delta == Vec2::ZERO && self.pan_delta == Vec2::ZERO && self.zoom_delta == 0.0
    }

    /// Stop reacting to input. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.enabled = false;
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.zoom_delta = 0.0;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(damping: f32) -> OrbitControls {
        OrbitControls::new(&CameraSettings {
            damping_factor: damping,
            ..CameraSettings::default()
        })
    }

    #[test]
    fn test_damping_eases_out() {
        let mut c = controls(0.5);
        let mut cam = ArcBallCamera::new();
        let yaw0 = cam.yaw;
        c.rotate(20.0, 0.0);

        assert!(c.update(&mut cam));
        let first = cam.yaw - yaw0;
        assert!((first - 10f32.to_radians()).abs() < 1e-5);

        c.update(&mut cam);
        let second = cam.yaw - yaw0 - first;
        assert!((second - 5f32.to_radians()).abs() < 1e-5);

        for _ in 0..64 {
            c.update(&mut cam);
        }
        assert!(c.is_settled());
        assert!((cam.yaw - yaw0 - 20f32.to_radians()).abs() < 1e-3);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut c = controls(1.0);
        let mut cam = ArcBallCamera::new();
        c.zoom(-100.0);
        c.update(&mut cam);
        assert_eq!(cam.distance, c.max_distance);
        c.zoom(0.999);
        c.update(&mut cam);
        assert_eq!(cam.distance, c.min_distance);
    }

    #[test]
    fn test_configure_keeps_pending_motion() {
        let mut c = controls(0.5);
        let mut cam = ArcBallCamera::new();
        c.rotate(20.0, 0.0);
        c.configure(
            &CameraSettings {
                max_distance: 3.0,
                damping_factor: 1.0,
                ..CameraSettings::default()
            },
            &mut cam,
        );
        assert_eq!(cam.distance, 3.0);
        assert!(!c.is_settled());
        c.update(&mut cam);
        assert!(c.is_settled());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut c = controls(1.0);
        let mut cam = ArcBallCamera::new();
        c.rotate(0.0, 720.0);
        c.update(&mut cam);
        assert_eq!(cam.pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_settled_controls_do_not_move_camera() {
        let mut c = controls(0.1);
        let mut cam = ArcBallCamera::new();
        c.sync(&mut cam);
        assert!(!c.update(&mut cam));
    }

    #[test]
    fn test_disposed_controls_ignore_input() {
        let mut c = controls(0.1);
        let mut cam = ArcBallCamera::new();
        c.dispose();
        c.dispose();
        assert!(c.is_disposed());
        c.rotate(30.0, 10.0);
        assert!(c.is_settled());
        assert!(!c.update(&mut cam));
    }
}

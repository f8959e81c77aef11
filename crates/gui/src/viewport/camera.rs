use glam::{Mat4, Vec3, Vec4};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Perspective camera orbiting a target point
#[derive(Debug, Clone, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    /// Place the camera at `position`, looking at `target`
    pub fn look_from(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        let distance = offset.length();
        self.target = target;
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, NEAR, FAR)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let vp = self.view_projection(aspect_ratio(rect.size()));
        let p = vp * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 || !p.is_finite() {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }
}

/// Width over height; a degenerate size falls back to 1
pub fn aspect_ratio(size: egui::Vec2) -> f32 {
    if size.x > 0.0 && size.y > 0.0 {
        size.x / size.y
    } else {
        1.0
    }
}

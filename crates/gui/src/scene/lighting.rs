use glam::Vec3;

/// Directional light; `direction` points from the scene toward the light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(toward: Vec3, intensity: f32) -> Self {
        Self {
            direction: toward.normalize_or_zero(),
            intensity,
        }
    }
}

/// Key light, fill light and ambient term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub ambient: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            key: DirectionalLight::new(Vec3::new(5.0, 10.0, 7.5), 0.8),
            fill: DirectionalLight::new(Vec3::new(-5.0, -5.0, -5.0), 0.3),
            ambient: 0.45,
        }
    }
}

impl Lighting {
    pub fn directional(&self) -> [DirectionalLight; 2] {
        [self.key, self.fill]
    }

    /// Lambert brightness for a surface normal, as the mesh shader computes it
    pub fn brightness(&self, normal: Vec3) -> f32 {
        let n = normal.normalize_or_zero();
        let diffuse: f32 = self
            .directional()
            .iter()
            .map(|l| n.dot(l.direction).max(0.0) * l.intensity)
            .sum();
        (self.ambient + diffuse).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_away_from_lights_get_ambient() {
        let lighting = Lighting {
            key: DirectionalLight::new(Vec3::Y, 0.8),
            fill: DirectionalLight::new(Vec3::X, 0.3),
            ambient: 0.4,
        };
        assert!((lighting.brightness(Vec3::NEG_Y) - 0.4).abs() < 1e-6);
        assert!((lighting.brightness(Vec3::Y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_both_lights_contribute() {
        let lighting = Lighting::default();
        let top = lighting.brightness(Vec3::Y);
        let bottom = lighting.brightness(Vec3::NEG_Y);
        assert!(top > bottom);
        assert!(bottom > lighting.ambient);
    }
}

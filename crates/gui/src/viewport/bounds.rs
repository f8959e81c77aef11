use glam::Vec3;

use super::mesh::MeshData;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData positions. An empty mesh gives an inverted box.
    pub fn from_mesh(data: &MeshData) -> Self {
        Self::from_points(data.positions())
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all() && self.min.is_finite() && self.max.is_finite()
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Point lies in the open interior of the box
    pub fn contains_strictly(&self, p: Vec3) -> bool {
        p.cmpgt(self.min).all() && p.cmplt(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh;

    #[test]
    fn test_cuboid_bounds() {
        let aabb = Aabb::from_mesh(&mesh::cuboid(2.0, 4.0, 6.0, [0.5; 3]));
        assert!(aabb.is_valid());
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::ZERO);
    }

    #[test]
    fn test_empty_mesh_is_invalid() {
        assert!(!Aabb::from_mesh(&MeshData::default()).is_valid());
    }

    #[test]
    fn test_contains_strictly_excludes_faces() {
        let aabb = Aabb { min: Vec3::ZERO, max: Vec3::ONE };
        assert!(aabb.contains_strictly(Vec3::splat(0.5)));
        assert!(!aabb.contains_strictly(Vec3::new(0.5, 0.5, 1.0)));
        assert!(!aabb.contains_strictly(Vec3::new(0.5, 0.5, 1.3)));
    }
}

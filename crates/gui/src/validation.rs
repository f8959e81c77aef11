//! Mesh validation utilities.
//!
//! `MeshValidator` checks mesh data integrity: correct stride, in-range
//! indices, normalized normals, bounding box dimensions, and whether the
//! surface is closed (solids) or lies in one plane (flat shapes).

use crate::geometry::outline::edge_use_counts;
use crate::viewport::bounds::Aabb;
use crate::viewport::mesh::{MeshData, MESH_STRIDE};

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Vertex buffer length is a multiple of the stride.
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % MESH_STRIDE == 0
    }

    /// Index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// All indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// All vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| (self.mesh.normal(i).length() - 1.0).abs() <= epsilon)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh.positions().all(|p| p.is_finite())
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Bounding box size (width, height, depth).
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    /// Bounding box size is approximately `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Every edge is shared by exactly two faces.
    pub fn is_closed(&self) -> bool {
        let counts = edge_use_counts(self.mesh);
        !counts.is_empty() && counts.values().all(|&c| c == 2)
    }

    /// All vertices lie in one plane (the plane of the first non-degenerate triangle).
    pub fn is_planar(&self, epsilon: f32) -> bool {
        let Some((origin, normal)) = self.mesh.triangles().find_map(|[a, b, c]| {
            let n = (b - a).cross(c - a);
            (n.length_squared() > 1e-12).then(|| (a, n.normalize()))
        }) else {
            return false;
        };
        self.mesh
            .positions()
            .all(|p| (p - origin).dot(normal).abs() <= epsilon)
    }

    /// Run all integrity checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {}",
                self.mesh.vertices.len(),
                MESH_STRIDE
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
            // positions behind bad indices cannot be inspected further
            return errors;
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        if !self.are_positions_finite() {
            errors.push("Some positions are NaN or infinite".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh;

    fn simple_triangle() -> MeshData {
        MeshData {
            vertices: vec![
                // vertex 0: pos(0,0,0) normal(0,0,1) color(0.5,0.5,0.5)
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
                // vertex 1: pos(1,0,0) normal(0,0,1) color(0.5,0.5,0.5)
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
                // vertex 2: pos(0,1,0) normal(0,0,1) color(0.5,0.5,0.5)
                0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_counts() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.vertex_count(), 3);
        assert_eq!(v.triangle_count(), 1);
    }

    #[test]
    fn test_stride_invalid() {
        let bad = MeshData {
            vertices: vec![0.0; 10],
            indices: vec![],
        };
        assert!(!MeshValidator::new(&bad).is_stride_valid());
    }

    #[test]
    fn test_indices_out_of_range() {
        let bad = MeshData {
            vertices: vec![0.0; 9], // 1 vertex
            indices: vec![0, 1, 2],
        };
        let v = MeshValidator::new(&bad);
        assert!(!v.are_indices_in_range());
        assert!(v.validate_all().iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_normals_not_normalized() {
        let bad = MeshData {
            vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.5, 0.5, 0.5],
            indices: vec![0],
        };
        assert!(!MeshValidator::new(&bad).are_normals_normalized(0.01));
    }

    #[test]
    fn test_dimensions() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.assert_dimensions_approx([1.0, 1.0, 0.0], 0.01));
        assert!(!v.assert_dimensions_approx([2.0, 1.0, 0.0], 0.01));
    }

    #[test]
    fn test_validate_all_ok() {
        let mesh = simple_triangle();
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn test_nan_positions_reported() {
        let mut mesh = simple_triangle();
        mesh.vertices[0] = f32::NAN;
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.iter().any(|e| e.contains("NaN")));
    }

    #[test]
    fn test_closed_and_planar() {
        let cube = mesh::cuboid(1.0, 1.0, 1.0, [0.5; 3]);
        let v = MeshValidator::new(&cube);
        assert!(v.is_closed());
        assert!(!v.is_planar(1e-4));

        let tri = simple_triangle();
        let v = MeshValidator::new(&tri);
        assert!(!v.is_closed());
        assert!(v.is_planar(1e-4));
    }

    #[test]
    fn test_empty_mesh_is_neither() {
        let empty = MeshData::default();
        let v = MeshValidator::new(&empty);
        assert!(!v.is_closed());
        assert!(!v.is_planar(1e-4));
    }
}

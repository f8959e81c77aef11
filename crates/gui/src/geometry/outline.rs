//! Edge outline extraction
//!
//! Finds the visible edges of a triangle mesh: boundary edges and edges where
//! the two adjacent faces meet at an angle. Vertices are matched by quantized
//! position so duplicated vertices (flat-shaded faces) still share edges.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::viewport::mesh::{LineMeshData, MeshData};

/// Represents an edge in a mesh
#[derive(Debug, Clone)]
pub struct MeshEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub normal1: Vec3,
    pub normal2: Option<Vec3>,
}

impl MeshEdge {
    /// Angle between adjacent faces (in radians). Boundary edges report 0.
    pub fn dihedral_angle(&self) -> f32 {
        if let Some(n2) = self.normal2 {
            let dot = self.normal1.dot(n2).clamp(-1.0, 1.0).abs();
            dot.acos()
        } else {
            0.0
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.normal2.is_none()
    }

    /// Boundary edges and creases sharper than the threshold
    pub fn is_visible(&self, threshold_degrees: f32) -> bool {
        self.is_boundary() || self.dihedral_angle().to_degrees() > threshold_degrees
    }
}

pub(crate) type QuantizedPos = (i64, i64, i64);
pub(crate) type EdgeKey = (QuantizedPos, QuantizedPos);

pub(crate) fn quantize_position(pos: Vec3) -> QuantizedPos {
    let scale = 10000.0;
    (
        (pos.x * scale).round() as i64,
        (pos.y * scale).round() as i64,
        (pos.z * scale).round() as i64,
    )
}

fn edge_key(p1: QuantizedPos, p2: QuantizedPos) -> EdgeKey {
    if p1 < p2 { (p1, p2) } else { (p2, p1) }
}

/// Non-degenerate triangles with their quantized corners and face normal
fn faces(mesh: &MeshData) -> impl Iterator<Item = ([Vec3; 3], [QuantizedPos; 3], Vec3)> + '_ {
    mesh.triangles().filter_map(|[v0, v1, v2]| {
        let q = [
            quantize_position(v0),
            quantize_position(v1),
            quantize_position(v2),
        ];
        if q[0] == q[1] || q[1] == q[2] || q[2] == q[0] {
            return None;
        }
        let normal = (v1 - v0).cross(v2 - v0);
        if normal.length_squared() < 1e-12 {
            return None;
        }
        Some(([v0, v1, v2], q, normal.normalize()))
    })
}

/// Extract all edges from a mesh, in a deterministic order
pub fn extract_edges(mesh: &MeshData) -> Vec<MeshEdge> {
    let mut edge_map: BTreeMap<EdgeKey, (Vec3, Vec3, Vec3, Option<Vec3>)> = BTreeMap::new();

    for ([v0, v1, v2], [q0, q1, q2], normal) in faces(mesh) {
        for (qa, qb, va, vb) in [(q0, q1, v0, v1), (q1, q2, v1, v2), (q2, q0, v2, v0)] {
            edge_map
                .entry(edge_key(qa, qb))
                .and_modify(|(_, _, _, n2)| {
                    if n2.is_none() {
                        *n2 = Some(normal);
                    }
                })
                .or_insert((va, vb, normal, None));
        }
    }

    edge_map
        .into_values()
        .map(|(start, end, n1, n2)| MeshEdge { start, end, normal1: n1, normal2: n2 })
        .collect()
}

/// How many faces use each edge. A closed surface uses every edge exactly twice.
pub fn edge_use_counts(mesh: &MeshData) -> BTreeMap<EdgeKey, usize> {
    let mut counts = BTreeMap::new();
    for (_, [q0, q1, q2], _) in faces(mesh) {
        for (qa, qb) in [(q0, q1), (q1, q2), (q2, q0)] {
            *counts.entry(edge_key(qa, qb)).or_insert(0) += 1;
        }
    }
    counts
}

/// Line mesh of the visible edges
pub fn outline(mesh: &MeshData, threshold_degrees: f32, color: [f32; 4]) -> LineMeshData {
    let mut lines = LineMeshData::default();
    for edge in extract_edges(mesh) {
        if edge.is_visible(threshold_degrees) {
            lines.push_segment(edge.start, edge.end, color);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh;

    #[test]
    fn test_quantize_position() {
        let p1 = Vec3::new(1.0, 2.0, 3.0);
        let p2 = Vec3::new(1.0, 2.0, 3.00001);
        assert_eq!(quantize_position(p1), quantize_position(p2));
    }

    #[test]
    fn test_dihedral_angle() {
        let edge = MeshEdge {
            start: Vec3::ZERO,
            end: Vec3::X,
            normal1: Vec3::Y,
            normal2: Some(Vec3::Z),
        };
        let angle = edge.dihedral_angle().to_degrees();
        assert!((angle - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_cuboid_outline_has_twelve_edges() {
        let m = mesh::cuboid(1.0, 1.0, 1.0, [0.5; 3]);
        let lines = outline(&m, 15.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lines.segment_count(), 12);
    }

    #[test]
    fn test_polygon_outline_is_its_boundary() {
        let m = mesh::convex_polygon(&[[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]], [0.5; 3]);
        let lines = outline(&m, 15.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lines.segment_count(), 4);
    }

    #[test]
    fn test_cylinder_outline_is_two_rims() {
        let m = mesh::cylinder(1.0, 2.0, 32, [0.5; 3]);
        let lines = outline(&m, 15.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lines.segment_count(), 64);
    }

    #[test]
    fn test_closed_cuboid_uses_every_edge_twice() {
        let m = mesh::cuboid(1.0, 2.0, 3.0, [0.5; 3]);
        assert!(edge_use_counts(&m).values().all(|&c| c == 2));
    }
}

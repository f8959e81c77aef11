use glam::{Mat4, Vec3};

/// Floats per mesh vertex: position(3) + normal(3) + color(3)
pub const MESH_STRIDE: usize = 9;
/// Floats per line vertex: position(3) + color(4)
pub const LINE_STRIDE: usize = 7;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let b = index * MESH_STRIDE;
        Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let b = index * MESH_STRIDE + 3;
        Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2])
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.vertex_count()).map(|i| self.position(i))
    }

    /// Triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.position(t[0] as usize),
                self.position(t[1] as usize),
                self.position(t[2] as usize),
            ]
        })
    }

    /// Apply an affine transform to positions and normals
    pub fn transform(&mut self, m: Mat4) {
        let normal_m = m.inverse().transpose();
        for v in self.vertices.chunks_exact_mut(MESH_STRIDE) {
            let p = m.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = normal_m
                .transform_vector3(Vec3::new(v[3], v[4], v[5]))
                .normalize_or_zero();
            v[..6].copy_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.transform(Mat4::from_translation(offset));
    }

    /// Recompute smooth vertex normals from face geometry (area weighted)
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertex_count()];
        for t in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (t[0] as usize, t[1] as usize, t[2] as usize);
            let face = (self.position(i1) - self.position(i0))
                .cross(self.position(i2) - self.position(i0));
            acc[i0] += face;
            acc[i1] += face;
            acc[i2] += face;
        }
        for (i, n) in acc.into_iter().enumerate() {
            let n = n.normalize_or_zero();
            let b = i * MESH_STRIDE + 3;
            self.vertices[b..b + 3].copy_from_slice(&[n.x, n.y, n.z]);
        }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    pub fn segment_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, a.x, a.y, a.z, color);
        push_line_vert(&mut self.vertices, b.x, b.y, b.z, color);
    }

    /// Segments as position pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.vertices.chunks_exact(LINE_STRIDE * 2).map(|s| {
            (
                Vec3::new(s[0], s[1], s[2]),
                Vec3::new(s[7], s[8], s[9]),
            )
        })
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in self.vertices.chunks_exact_mut(LINE_STRIDE) {
            v[0] += offset.x;
            v[1] += offset.y;
            v[2] += offset.z;
        }
    }
}

// ── Primitive generation ─────────────────────────────────────
// All primitives are centered on the origin; builders move them into place.

pub fn cuboid(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * MESH_STRIDE);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / MESH_STRIDE) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

pub fn cylinder(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side faces
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let c0 = a0.cos();
        let s0 = a0.sin();
        let c1 = a1.cos();
        let s1 = a1.sin();

        let n0 = Vec3::new(c0, 0.0, s0).normalize();
        let n1 = Vec3::new(c1, 0.0, s1).normalize();

        let base = (vertices.len() / MESH_STRIDE) as u32;

        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c1, hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c0, hh, radius * s0, n0, color);

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    add_cap(&mut vertices, &mut indices, radius, hh, segments, Vec3::Y, color);
    add_cap_reversed(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color);

    MeshData { vertices, indices }
}

pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let x = sp * theta.cos();
            let y = cp;
            let z = sp * theta.sin();

            push_vert(&mut vertices, radius * x, radius * y, radius * z, Vec3::new(x, y, z), color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let slope = radius / height;
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let c0 = a0.cos();
        let s0 = a0.sin();
        let c1 = a1.cos();
        let s1 = a1.sin();

        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_top = (n0 + n1).normalize();

        let base = (vertices.len() / MESH_STRIDE) as u32;

        push_vert(&mut vertices, 0.0, hh, 0.0, n_top, color); // apex
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);

        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    add_cap_reversed(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color);

    MeshData { vertices, indices }
}

/// Extrude a convex profile (XY plane) along +Z by `depth`, starting at z = 0
pub fn extrude_convex(profile: &[[f32; 2]], depth: f32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let n = profile.len();

    // Side walls, flat shaded
    for i in 0..n {
        let [x0, y0] = profile[i];
        let [x1, y1] = profile[(i + 1) % n];
        let normal = Vec3::new(y1 - y0, x0 - x1, 0.0).normalize_or_zero();
        let outward = if ccw_area(profile) >= 0.0 { normal } else { -normal };

        let base = (vertices.len() / MESH_STRIDE) as u32;
        push_vert(&mut vertices, x0, y0, 0.0, outward, color);
        push_vert(&mut vertices, x1, y1, 0.0, outward, color);
        push_vert(&mut vertices, x1, y1, depth, outward, color);
        push_vert(&mut vertices, x0, y0, depth, outward, color);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    // Caps
    for (z, normal) in [(0.0, Vec3::NEG_Z), (depth, Vec3::Z)] {
        let base = (vertices.len() / MESH_STRIDE) as u32;
        for [x, y] in profile {
            push_vert(&mut vertices, *x, *y, z, normal, color);
        }
        for i in 1..n.saturating_sub(1) as u32 {
            if normal.z > 0.0 {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
            } else {
                indices.extend_from_slice(&[base, base + i + 1, base + i]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Flat convex polygon in the XY plane, fan-triangulated from its first vertex
pub fn convex_polygon(points: &[[f32; 2]], color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::with_capacity(points.len() * MESH_STRIDE);
    let mut indices = Vec::new();
    let normal = if ccw_area(points) >= 0.0 { Vec3::Z } else { Vec3::NEG_Z };

    for [x, y] in points {
        push_vert(&mut vertices, *x, *y, 0.0, normal, color);
    }
    for i in 1..points.len().saturating_sub(1) as u32 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    MeshData { vertices, indices }
}

/// Latitude/longitude wireframe for a sphere centered at the origin
pub fn sphere_wireframe(radius: f32, rings: u32, sectors: u32, color: [f32; 4]) -> LineMeshData {
    let mut lines = LineMeshData::default();
    let steps = 32;

    let point = |phi: f32, theta: f32| {
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    };

    // Parallels
    for r in 1..rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        for s in 0..steps {
            let t0 = std::f32::consts::TAU * s as f32 / steps as f32;
            let t1 = std::f32::consts::TAU * (s + 1) as f32 / steps as f32;
            lines.push_segment(point(phi, t0), point(phi, t1), color);
        }
    }
    // Meridians
    for s in 0..sectors {
        let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
        for r in 0..steps {
            let p0 = std::f32::consts::PI * r as f32 / steps as f32;
            let p1 = std::f32::consts::PI * (r + 1) as f32 / steps as f32;
            lines.push_segment(point(p0, theta), point(p1, theta), color);
        }
    }

    lines
}

// ── Grid ─────────────────────────────────────────────────────

pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let center_color = [0.45_f32, 0.45, 0.45, opacity];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 { center_color } else { grid_color };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -extent, color);
        push_line_vert(&mut vertices, f, 0.0, extent, color);
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.0, f, color);
        push_line_vert(&mut vertices, extent, 0.0, f, color);
    }

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

/// Signed area of a 2D polygon (positive when counter-clockwise)
pub fn ccw_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum * 0.5
}

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
) {
    let center_idx = (vertices.len() / MESH_STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
    }
}

fn add_cap_reversed(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
) {
    let center_idx = (vertices.len() / MESH_STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
    }
}

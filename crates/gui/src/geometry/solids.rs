//! Solid (3D) shape builders. Every solid rests on the ground plane (y = 0).

use glam::Vec3;
use shared::ShapeParams;

use super::{
    dimension_label, scaled, AnnotationAnchor, BuiltShape, ANNOTATION_OFFSET, ROUND_SEGMENTS,
    SOLID_COLOR, WIREFRAME_COLOR,
};
use crate::viewport::mesh::{self, MeshData};

const O: f32 = ANNOTATION_OFFSET;

fn label(params: &ShapeParams, key: &str) -> String {
    dimension_label(key, params.value(key))
}

pub fn cube(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let mut m = mesh::cuboid(a, a, a, SOLID_COLOR);
    m.translate(Vec3::new(0.0, a * 0.5, 0.0));

    let anchors = vec![AnnotationAnchor::new(
        Vec3::new(-a * 0.5, 0.0, a * 0.5 + O),
        Vec3::new(a * 0.5, 0.0, a * 0.5 + O),
        label(params, "a"),
    )];
    BuiltShape::from_mesh(m, anchors)
}

/// `a` is the width (X), `b` the depth (Z), `c` the height (Y)
pub fn rectangular_prism(params: &ShapeParams) -> BuiltShape {
    let w = scaled(params, "a");
    let d = scaled(params, "b");
    let h = scaled(params, "c");
    let mut m = mesh::cuboid(w, h, d, SOLID_COLOR);
    m.translate(Vec3::new(0.0, h * 0.5, 0.0));

    let anchors = vec![
        AnnotationAnchor::new(
            Vec3::new(-w * 0.5, 0.0, d * 0.5 + O),
            Vec3::new(w * 0.5, 0.0, d * 0.5 + O),
            label(params, "a"),
        ),
        AnnotationAnchor::new(
            Vec3::new(w * 0.5 + O, 0.0, -d * 0.5),
            Vec3::new(w * 0.5 + O, 0.0, d * 0.5),
            label(params, "b"),
        ),
        AnnotationAnchor::new(
            Vec3::new(-w * 0.5 - O, 0.0, d * 0.5),
            Vec3::new(-w * 0.5 - O, h, d * 0.5),
            label(params, "c"),
        ),
    ];
    BuiltShape::from_mesh(m, anchors)
}

pub fn sphere(params: &ShapeParams) -> BuiltShape {
    let r = scaled(params, "r");
    let center = Vec3::new(0.0, r, 0.0);
    let mut m = mesh::sphere(r, 24, 32, SOLID_COLOR);
    m.translate(center);

    // Slightly larger so the lines are not hidden by the surface
    let mut wire = mesh::sphere_wireframe(r * 1.002, 6, 8, WIREFRAME_COLOR);
    wire.translate(center);

    let anchors = vec![AnnotationAnchor::new(
        Vec3::new(0.0, 2.0 * r + O, 0.0),
        Vec3::new(r, 2.0 * r + O, 0.0),
        label(params, "r"),
    )];
    let mut built = BuiltShape::from_mesh(m, anchors);
    built.wireframe = Some(wire);
    built
}

pub fn cylinder(params: &ShapeParams) -> BuiltShape {
    let r = scaled(params, "r");
    let h = scaled(params, "h");
    let mut m = mesh::cylinder(r, h, ROUND_SEGMENTS, SOLID_COLOR);
    m.translate(Vec3::new(0.0, h * 0.5, 0.0));

    let anchors = vec![
        AnnotationAnchor::new(
            Vec3::new(0.0, h + O, 0.0),
            Vec3::new(r, h + O, 0.0),
            label(params, "r"),
        ),
        AnnotationAnchor::new(
            Vec3::new(r + O, 0.0, 0.0),
            Vec3::new(r + O, h, 0.0),
            label(params, "h"),
        ),
    ];
    BuiltShape::from_mesh(m, anchors)
}

pub fn cone(params: &ShapeParams) -> BuiltShape {
    let r = scaled(params, "r");
    let h = scaled(params, "h");
    let mut m = mesh::cone(r, h, ROUND_SEGMENTS, SOLID_COLOR);
    m.translate(Vec3::new(0.0, h * 0.5, 0.0));

    let anchors = vec![
        AnnotationAnchor::new(
            Vec3::new(0.0, 0.0, r + O),
            Vec3::new(r, 0.0, r + O),
            label(params, "r"),
        ),
        AnnotationAnchor::new(
            Vec3::new(r + O, 0.0, 0.0),
            Vec3::new(r + O, h, 0.0),
            label(params, "h"),
        ),
    ];
    BuiltShape::from_mesh(m, anchors)
}

/// Square pyramid: apex plus four base corners, six triangles
pub fn pyramid(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let h = scaled(params, "h");
    let ha = a * 0.5;

    let corners = [
        Vec3::new(0.0, h, 0.0), // apex
        Vec3::new(-ha, 0.0, ha),
        Vec3::new(ha, 0.0, ha),
        Vec3::new(ha, 0.0, -ha),
        Vec3::new(-ha, 0.0, -ha),
    ];
    let mut vertices = Vec::with_capacity(corners.len() * 9);
    for p in corners {
        vertices.extend_from_slice(&[p.x, p.y, p.z, 0.0, 0.0, 0.0]);
        vertices.extend_from_slice(&SOLID_COLOR);
    }
    #[rustfmt::skip]
    let indices = vec![
        1, 2, 0, // front
        2, 3, 0, // right
        3, 4, 0, // back
        4, 1, 0, // left
        1, 4, 3, // base
        1, 3, 2,
    ];
    let mut m = MeshData { vertices, indices };
    m.compute_vertex_normals();

    let anchors = vec![
        AnnotationAnchor::new(
            Vec3::new(-ha, 0.0, ha + O),
            Vec3::new(ha, 0.0, ha + O),
            label(params, "a"),
        ),
        AnnotationAnchor::new(
            Vec3::new(ha + O, 0.0, 0.0),
            Vec3::new(ha + O, h, 0.0),
            label(params, "h"),
        ),
    ];
    BuiltShape::from_mesh(m, anchors)
}

/// Equilateral triangle profile of side `a`, extruded `h` along Z
pub fn triangular_prism(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let len = scaled(params, "h");
    let profile = [
        [-a * 0.5, 0.0],
        [a * 0.5, 0.0],
        [0.0, a * 3f32.sqrt() / 2.0],
    ];
    let mut m = mesh::extrude_convex(&profile, len, SOLID_COLOR);
    m.translate(Vec3::new(0.0, 0.0, -len * 0.5));

    let anchors = vec![
        AnnotationAnchor::new(
            Vec3::new(-a * 0.5, 0.0, len * 0.5 + O),
            Vec3::new(a * 0.5, 0.0, len * 0.5 + O),
            label(params, "a"),
        ),
        AnnotationAnchor::new(
            Vec3::new(a * 0.5 + O, 0.0, -len * 0.5),
            Vec3::new(a * 0.5 + O, 0.0, len * 0.5),
            label(params, "h"),
        ),
    ];
    BuiltShape::from_mesh(m, anchors)
}

//! Integration tests for the shape builders and the annotations they produce.

use glam::Vec3;
use shape_viewer_lib::annotations::build_annotations;
use shape_viewer_lib::fixtures;
use shape_viewer_lib::geometry::{build_shape, planar};
use shape_viewer_lib::validation::MeshValidator;
use shape_viewer_lib::viewport::bounds::Aabb;
use shared::{ShapeFamily, ShapeKind};

#[test]
fn test_every_default_shape_builds_a_valid_mesh() {
    for desc in fixtures::all_defaults() {
        let built = build_shape(&desc).unwrap();
        let v = MeshValidator::new(&built.mesh);
        assert!(v.vertex_count() > 0, "{} has no vertices", desc.shape);
        assert!(v.triangle_count() > 0, "{} has no faces", desc.shape);
        let errors = v.validate_all();
        assert!(errors.is_empty(), "{}: {:?}", desc.shape, errors);
        assert!(!built.outline.is_empty(), "{} has no outline", desc.shape);
    }
}

#[test]
fn test_solids_are_closed() {
    for desc in fixtures::defaults_of(ShapeFamily::Solid) {
        let built = build_shape(&desc).unwrap();
        assert!(MeshValidator::new(&built.mesh).is_closed(), "{}", desc.shape);
    }
}

#[test]
fn test_planar_shapes_lie_flat_on_the_ground() {
    for desc in fixtures::defaults_of(ShapeFamily::Planar) {
        let built = build_shape(&desc).unwrap();
        let v = MeshValidator::new(&built.mesh);
        assert!(v.is_planar(1e-4), "{} is not planar", desc.shape);

        let aabb = v.aabb();
        assert!(aabb.size().y < 1e-4, "{} is not horizontal", desc.shape);
        assert!(aabb.min.y > 0.0, "{} sits under the grid", desc.shape);
        assert!(aabb.min.y < 0.05, "{} floats above the grid", desc.shape);
    }
}

#[test]
fn test_unknown_shape_builds_nothing() {
    assert!(build_shape(&fixtures::unknown_shape()).is_none());
}

#[test]
fn test_cube_scenario() {
    let built = build_shape(&fixtures::cube(4.0)).unwrap();
    let v = MeshValidator::new(&built.mesh);
    assert!(v.assert_dimensions_approx([2.0, 2.0, 2.0], 1e-5));

    let aabb = v.aabb();
    assert!(aabb.min.y.abs() < 1e-6);
    assert!((aabb.center().y - 1.0).abs() < 1e-6);

    let annotations = build_annotations(&built.anchors);
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].label.text, "a=4");
}

#[test]
fn test_rhomboid_scenario() {
    let shear = planar::rhomboid_shear(3.0, 60.0);
    assert!((shear - 1.732).abs() < 1e-3);

    let built = build_shape(&fixtures::rhomboid(5.0, 3.0, Some(60.0))).unwrap();
    let aabb = Aabb::from_mesh(&built.mesh);
    let center = aabb.center();
    assert!(center.x.abs() < 1e-5);
    assert!(center.z.abs() < 1e-5);
    // (b + shear) and h, in world units
    assert!((aabb.size().x - (5.0 + shear) * 0.5).abs() < 1e-4);
    assert!((aabb.size().z - 1.5).abs() < 1e-4);
}

#[test]
fn test_rhomboid_angle_defaults_to_sixty() {
    let with = build_shape(&fixtures::rhomboid(5.0, 3.0, Some(60.0))).unwrap();
    let without = build_shape(&fixtures::rhomboid(5.0, 3.0, None)).unwrap();
    assert_eq!(with.mesh.vertices, without.mesh.vertices);

    let labels: Vec<_> = without.anchors.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, ["b=5", "h=3", "ang=60°"]);
}

#[test]
fn test_one_anchor_per_parameter() {
    for kind in ShapeKind::ALL {
        let desc = shared::ShapeDescriptor::with_defaults(kind);
        let built = build_shape(&desc).unwrap();
        assert_eq!(
            built.anchors.len(),
            kind.params().len(),
            "{} anchors do not match its parameters",
            kind
        );
    }
}

#[test]
fn test_labels_sit_outside_solids() {
    for desc in fixtures::defaults_of(ShapeFamily::Solid) {
        let built = build_shape(&desc).unwrap();
        let aabb = Aabb::from_mesh(&built.mesh);
        for annotation in build_annotations(&built.anchors) {
            assert!(
                !aabb.contains_strictly(annotation.label.position),
                "{}: label {} is inside the mesh",
                desc.shape,
                annotation.label.text
            );
        }
    }
}

#[test]
fn test_annotation_line_spans_its_anchor() {
    let built = build_shape(&fixtures::cylinder(2.0, 4.0)).unwrap();
    for (anchor, annotation) in built.anchors.iter().zip(build_annotations(&built.anchors)) {
        let (start, end) = annotation.line.segments().next().unwrap();
        assert_eq!((start, end), (anchor.start, anchor.end));
        assert!(annotation.label.position.distance(anchor.midpoint()) < 1e-6);
        // main segment plus two end ticks
        assert_eq!(annotation.line.segment_count(), 3);
    }
}

#[test]
fn test_hexagon_vertices_on_circumcircle() {
    let side = 1.5;
    let profile = planar::regular_polygon(6, side);
    let r = side / (2.0 * (std::f32::consts::PI / 6.0).sin());
    for (i, p) in profile.iter().enumerate() {
        let p = glam::Vec2::from(*p);
        assert!((p.length() - r).abs() < 1e-5);
        let next = glam::Vec2::from(profile[(i + 1) % profile.len()]);
        assert!((p.distance(next) - side).abs() < 1e-5);
    }
    // first vertex at the top
    assert!(profile[0][0].abs() < 1e-6 && profile[0][1] > 0.0);
}

#[test]
fn test_sphere_wireframe_hugs_the_surface() {
    let built = build_shape(&fixtures::sphere(2.0)).unwrap();
    let wire = built.wireframe.unwrap();
    let center = Vec3::new(0.0, 1.0, 0.0);
    for (a, _) in wire.segments() {
        let d = a.distance(center);
        assert!((d - 1.0).abs() < 0.01, "wire point {a} at distance {d}");
    }
}

//! Planar (2D) shape builders
//!
//! Profiles are built in the XY plane, then laid flat on the ground: `(x, y)`
//! maps to `(x, PLANAR_LIFT, -y)`, i.e. a -90° turn about X plus a small lift
//! so the fill does not z-fight with the grid. The profile functions are
//! unit-agnostic; builders feed them scaled (world) values.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec2, Vec3};
use shared::ShapeParams;

use super::{
    dimension_label, scaled, AnnotationAnchor, BuiltShape, ANNOTATION_OFFSET, CIRCLE_SEGMENTS,
    PLANAR_COLOR, PLANAR_LIFT,
};
use crate::viewport::mesh;

const O: f32 = ANNOTATION_OFFSET;

// ── Profiles ─────────────────────────────────────────────────

/// Regular n-gon with the given side, centered on its centroid, first vertex on top
pub fn regular_polygon(n: usize, side: f32) -> Vec<[f32; 2]> {
    let radius = side / (2.0 * (PI / n as f32).sin());
    (0..n)
        .map(|i| {
            let angle = FRAC_PI_2 + TAU * i as f32 / n as f32;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

/// Isosceles triangle with base `a` and height `h`
pub fn triangle_profile(a: f32, h: f32) -> Vec<[f32; 2]> {
    recentered(vec![[-a * 0.5, 0.0], [a * 0.5, 0.0], [0.0, h]])
}

pub fn rectangle_profile(a: f32, b: f32) -> Vec<[f32; 2]> {
    let (hw, hh) = (a * 0.5, b * 0.5);
    vec![[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]]
}

pub fn circle_profile(radius: f32, segments: usize) -> Vec<[f32; 2]> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

/// Isosceles trapezoid: bottom base `a`, top base `b`, height `h`
pub fn trapezoid_profile(a: f32, b: f32, h: f32) -> Vec<[f32; 2]> {
    recentered(vec![
        [-a * 0.5, 0.0],
        [a * 0.5, 0.0],
        [b * 0.5, h],
        [-b * 0.5, h],
    ])
}

/// Rhombus from its horizontal (`big`) and vertical (`small`) diagonals
pub fn rhombus_profile(big: f32, small: f32) -> Vec<[f32; 2]> {
    vec![
        [-big * 0.5, 0.0],
        [0.0, -small * 0.5],
        [big * 0.5, 0.0],
        [0.0, small * 0.5],
    ]
}

/// Horizontal shear of the top edge for a parallelogram of height `h`
pub fn rhomboid_shear(h: f32, angle_deg: f32) -> f32 {
    h / angle_deg.to_radians().tan()
}

/// Parallelogram with base `b`, height `h` and base angle `angle_deg`,
/// re-centered on its bounding-box centroid
pub fn rhomboid_profile(b: f32, h: f32, angle_deg: f32) -> Vec<[f32; 2]> {
    let s = rhomboid_shear(h, angle_deg);
    recentered(vec![[0.0, 0.0], [b, 0.0], [b + s, h], [s, h]])
}

/// Bounding-box centre of a profile
pub fn bbox_center(points: &[[f32; 2]]) -> Vec2 {
    let (min, max) = bbox(points);
    (min + max) * 0.5
}

fn bbox(points: &[[f32; 2]]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), &p| (min.min(Vec2::from(p)), max.max(Vec2::from(p))),
    )
}

fn recentered(points: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    let c = bbox_center(&points);
    points.into_iter().map(|[x, y]| [x - c.x, y - c.y]).collect()
}

// ── Ground mapping ───────────────────────────────────────────

/// Profile point laid on the ground plane
pub fn to_ground(p: Vec2) -> Vec3 {
    Vec3::new(p.x, PLANAR_LIFT, -p.y)
}

fn flat_shape(profile: &[[f32; 2]], anchors: Vec<(Vec2, Vec2, String)>) -> BuiltShape {
    let mut m = mesh::convex_polygon(profile, PLANAR_COLOR);
    m.transform(
        Mat4::from_translation(Vec3::Y * PLANAR_LIFT) * Mat4::from_rotation_x(-FRAC_PI_2),
    );
    let anchors = anchors
        .into_iter()
        .map(|(a, b, label)| AnnotationAnchor::new(to_ground(a), to_ground(b), label))
        .collect();
    BuiltShape::from_mesh(m, anchors)
}

/// Dimension line under the profile, spanning `[x0, x1]`
fn below(profile: &[[f32; 2]], x0: f32, x1: f32, label: String) -> (Vec2, Vec2, String) {
    let (min, _) = bbox(profile);
    (Vec2::new(x0, min.y - O), Vec2::new(x1, min.y - O), label)
}

/// Vertical dimension line right of the profile, spanning its full height
fn right_of(profile: &[[f32; 2]], label: String) -> (Vec2, Vec2, String) {
    let (min, max) = bbox(profile);
    (
        Vec2::new(max.x + O, min.y),
        Vec2::new(max.x + O, max.y),
        label,
    )
}

/// Edge `i -> i+1` of a counter-clockwise profile, pushed outward
fn along_edge(profile: &[[f32; 2]], i: usize, label: String) -> (Vec2, Vec2, String) {
    let a = Vec2::from(profile[i]);
    let b = Vec2::from(profile[(i + 1) % profile.len()]);
    let d = (b - a).normalize_or_zero();
    let outward = Vec2::new(d.y, -d.x);
    (a + outward * O, b + outward * O, label)
}

/// Index of the edge with the lowest midpoint
fn bottom_edge(profile: &[[f32; 2]]) -> usize {
    let n = profile.len();
    (0..n)
        .min_by(|&i, &j| {
            let mi = profile[i][1] + profile[(i + 1) % n][1];
            let mj = profile[j][1] + profile[(j + 1) % n][1];
            mi.total_cmp(&mj)
        })
        .unwrap_or(0)
}

fn label(params: &ShapeParams, key: &str) -> String {
    dimension_label(key, params.value(key))
}

// ── Builders ─────────────────────────────────────────────────

pub fn triangle(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let profile = triangle_profile(a, scaled(params, "h"));
    let anchors = vec![
        below(&profile, -a * 0.5, a * 0.5, label(params, "a")),
        right_of(&profile, label(params, "h")),
    ];
    flat_shape(&profile, anchors)
}

pub fn rectangle(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let profile = rectangle_profile(a, scaled(params, "b"));
    let anchors = vec![
        below(&profile, -a * 0.5, a * 0.5, label(params, "a")),
        right_of(&profile, label(params, "b")),
    ];
    flat_shape(&profile, anchors)
}

pub fn square(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let profile = rectangle_profile(a, a);
    let anchors = vec![below(&profile, -a * 0.5, a * 0.5, label(params, "a"))];
    flat_shape(&profile, anchors)
}

pub fn circle(params: &ShapeParams) -> BuiltShape {
    let r = scaled(params, "r");
    let profile = circle_profile(r, CIRCLE_SEGMENTS);
    let anchors = vec![(
        Vec2::new(0.0, r + O),
        Vec2::new(r, r + O),
        label(params, "r"),
    )];
    flat_shape(&profile, anchors)
}

pub fn trapezoid(params: &ShapeParams) -> BuiltShape {
    let a = scaled(params, "a");
    let b = scaled(params, "b");
    let profile = trapezoid_profile(a, b, scaled(params, "h"));
    let (_, max) = bbox(&profile);
    let anchors = vec![
        below(&profile, -a * 0.5, a * 0.5, label(params, "a")),
        (
            Vec2::new(-b * 0.5, max.y + O),
            Vec2::new(b * 0.5, max.y + O),
            label(params, "b"),
        ),
        right_of(&profile, label(params, "h")),
    ];
    flat_shape(&profile, anchors)
}

pub fn rhombus(params: &ShapeParams) -> BuiltShape {
    let big = scaled(params, "D");
    let profile = rhombus_profile(big, scaled(params, "d"));
    let anchors = vec![
        below(&profile, -big * 0.5, big * 0.5, label(params, "D")),
        right_of(&profile, label(params, "d")),
    ];
    flat_shape(&profile, anchors)
}

/// `ang` is optional and defaults to 60°
pub fn rhomboid(params: &ShapeParams) -> BuiltShape {
    let angle = params.value_or("ang", 60.0);
    let profile = rhomboid_profile(scaled(params, "b"), scaled(params, "h"), angle as f32);
    let [x0, _] = profile[0];
    let [x1, _] = profile[1];
    let anchors = vec![
        below(&profile, x0, x1, label(params, "b")),
        right_of(&profile, label(params, "h")),
        // left slanted edge runs from vertex 3 back to vertex 0
        along_edge(&profile, 3, format!("{}°", dimension_label("ang", angle))),
    ];
    flat_shape(&profile, anchors)
}

pub fn pentagon(params: &ShapeParams) -> BuiltShape {
    regular(5, params)
}

pub fn hexagon(params: &ShapeParams) -> BuiltShape {
    regular(6, params)
}

fn regular(n: usize, params: &ShapeParams) -> BuiltShape {
    let profile = regular_polygon(n, scaled(params, "a"));
    let anchors = vec![along_edge(&profile, bottom_edge(&profile), label(params, "a"))];
    flat_shape(&profile, anchors)
}

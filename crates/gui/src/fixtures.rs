//! Factory functions for descriptors used in tests and demos.

use shared::{ShapeDescriptor, ShapeFamily, ShapeKind, ShapeParams};

/// Descriptor from an id and `(key, value)` pairs
pub fn descriptor(id: &str, params: &[(&str, f64)]) -> ShapeDescriptor {
    ShapeDescriptor::new(id, params.iter().copied().collect::<ShapeParams>())
}

/// Cube with side `a`
pub fn cube(a: f64) -> ShapeDescriptor {
    descriptor("cube", &[("a", a)])
}

pub fn rectangular_prism(a: f64, b: f64, c: f64) -> ShapeDescriptor {
    descriptor("rectangular-prism", &[("a", a), ("b", b), ("c", c)])
}

pub fn sphere(r: f64) -> ShapeDescriptor {
    descriptor("sphere", &[("r", r)])
}

pub fn cylinder(r: f64, h: f64) -> ShapeDescriptor {
    descriptor("cylinder", &[("r", r), ("h", h)])
}

pub fn circle(r: f64) -> ShapeDescriptor {
    descriptor("circle", &[("r", r)])
}

/// Rhomboid; `ang` is left out when `None` so the builder default applies
pub fn rhomboid(b: f64, h: f64, ang: Option<f64>) -> ShapeDescriptor {
    let mut desc = descriptor("rhomboid", &[("b", b), ("h", h)]);
    if let Some(ang) = ang {
        desc.params.set("ang", ang);
    }
    desc
}

pub fn hexagon(a: f64) -> ShapeDescriptor {
    descriptor("hexagon", &[("a", a)])
}

/// Id that no builder knows
pub fn unknown_shape() -> ShapeDescriptor {
    descriptor("dodecahedron", &[("a", 1.0)])
}

/// Every shape kind with its default parameters
pub fn all_defaults() -> Vec<ShapeDescriptor> {
    ShapeKind::ALL
        .into_iter()
        .map(ShapeDescriptor::with_defaults)
        .collect()
}

pub fn defaults_of(family: ShapeFamily) -> Vec<ShapeDescriptor> {
    ShapeKind::ALL
        .into_iter()
        .filter(|k| k.family() == family)
        .map(ShapeDescriptor::with_defaults)
        .collect()
}

/// A sequence of shape changes that alternates families and parameter values
pub fn change_sequence() -> Vec<ShapeDescriptor> {
    vec![
        cube(4.0),
        cube(5.0),
        circle(3.0),
        rhomboid(5.0, 3.0, Some(60.0)),
        sphere(2.0),
        unknown_shape(),
        rectangular_prism(4.0, 3.0, 2.0),
        hexagon(3.0),
        cylinder(2.0, 4.0),
        rhomboid(5.0, 3.0, None),
    ]
}

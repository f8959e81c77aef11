//! Shape geometry builder
//!
//! Pure functions from a [`ShapeDescriptor`] to a mesh, its edge outline and
//! the anchor points for dimension annotations. Nothing here touches the GPU,
//! so every builder is unit-testable on its own.

pub mod outline;
pub mod planar;
pub mod solids;

use glam::Vec3;
use shared::{ShapeDescriptor, ShapeKind, ShapeParams};

use crate::viewport::mesh::{LineMeshData, MeshData};

/// Uniform scale from parameter units to world units
pub const WORLD_SCALE: f32 = 0.5;
/// Distance between a mesh and its dimension lines, in world units
pub const ANNOTATION_OFFSET: f32 = 0.3;
/// Height of flat shapes above the ground grid
pub const PLANAR_LIFT: f32 = 0.01;
/// Faces meeting at a larger angle get an outline edge
pub const OUTLINE_THRESHOLD_DEG: f32 = 15.0;

pub const SOLID_COLOR: [f32; 3] = [0.38, 0.62, 0.9];
pub const PLANAR_COLOR: [f32; 3] = [0.95, 0.65, 0.3];
pub const EDGE_COLOR: [f32; 4] = [0.08, 0.08, 0.1, 1.0];
pub const WIREFRAME_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.25];

/// Segments for round solids and the circle
pub const ROUND_SEGMENTS: u32 = 48;
pub const CIRCLE_SEGMENTS: usize = 64;

/// One dimension to annotate: a segment and its label text
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationAnchor {
    pub start: Vec3,
    pub end: Vec3,
    pub label: String,
}

impl AnnotationAnchor {
    pub fn new(start: Vec3, end: Vec3, label: String) -> Self {
        Self { start, end, label }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// Output of a shape builder, in world units
#[derive(Debug, Clone, Default)]
pub struct BuiltShape {
    pub mesh: MeshData,
    pub outline: LineMeshData,
    /// Decorative wireframe drawn over the mesh (sphere only)
    pub wireframe: Option<LineMeshData>,
    /// One anchor per independent parameter, in parameter order
    pub anchors: Vec<AnnotationAnchor>,
}

impl BuiltShape {
    /// Assemble a shape from its mesh, deriving the edge outline
    pub(crate) fn from_mesh(mesh: MeshData, anchors: Vec<AnnotationAnchor>) -> Self {
        let outline = outline::outline(&mesh, OUTLINE_THRESHOLD_DEG, EDGE_COLOR);
        Self {
            mesh,
            outline,
            wireframe: None,
            anchors,
        }
    }
}

/// Pure builder for one shape kind
pub type ShapeBuilder = fn(&ShapeParams) -> BuiltShape;

/// Dispatch table: every shape kind maps to exactly one builder
pub fn builder_for(kind: ShapeKind) -> ShapeBuilder {
    match kind {
        ShapeKind::Cube => solids::cube,
        ShapeKind::RectangularPrism => solids::rectangular_prism,
        ShapeKind::Sphere => solids::sphere,
        ShapeKind::Cylinder => solids::cylinder,
        ShapeKind::Cone => solids::cone,
        ShapeKind::Pyramid => solids::pyramid,
        ShapeKind::TriangularPrism => solids::triangular_prism,
        ShapeKind::Triangle => planar::triangle,
        ShapeKind::Rectangle => planar::rectangle,
        ShapeKind::Square => planar::square,
        ShapeKind::Circle => planar::circle,
        ShapeKind::Trapezoid => planar::trapezoid,
        ShapeKind::Rhombus => planar::rhombus,
        ShapeKind::Rhomboid => planar::rhomboid,
        ShapeKind::Pentagon => planar::pentagon,
        ShapeKind::Hexagon => planar::hexagon,
    }
}

/// Build a shape. Unknown shape ids give `None`.
pub fn build_shape(desc: &ShapeDescriptor) -> Option<BuiltShape> {
    let kind = desc.kind()?;
    let built = builder_for(kind)(&desc.params);
    tracing::debug!(
        "Built {}: {} vertices, {} triangles, {} outline segments, {} anchors",
        kind,
        built.mesh.vertex_count(),
        built.mesh.triangle_count(),
        built.outline.segment_count(),
        built.anchors.len()
    );
    Some(built)
}

/// Parameter value converted to world units. Missing keys give NaN.
pub(crate) fn scaled(params: &ShapeParams, key: &str) -> f32 {
    params.value(key) as f32 * WORLD_SCALE
}

/// Label text for a parameter: `a=4`, `r=2.5`
pub fn dimension_label(key: &str, value: f64) -> String {
    format!("{}={}", key, format_value(value))
}

/// Shortest text that reads back as the same value (`4`, `2.345`)
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // no "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(2.345), "2.345");
        assert_eq!(format_value(std::f64::consts::PI), "3.141592653589793");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_dimension_label() {
        assert_eq!(dimension_label("a", 4.0), "a=4");
        assert_eq!(dimension_label("D", 6.25), "D=6.25");
    }

    #[test]
    fn test_unknown_shape_builds_nothing() {
        let desc = ShapeDescriptor::new("dodecahedron", ShapeParams::new().with("a", 1.0));
        assert!(build_shape(&desc).is_none());
    }

    #[test]
    fn test_every_kind_has_a_builder() {
        for kind in ShapeKind::ALL {
            let built = builder_for(kind)(&kind.default_params());
            assert!(!built.mesh.is_empty(), "{} built an empty mesh", kind);
            assert_eq!(built.anchors.len(), kind.params().len(), "{} anchors", kind);
        }
    }
}

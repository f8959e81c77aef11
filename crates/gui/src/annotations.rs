//! Dimension annotation builder
//!
//! Turns the anchors produced by a shape builder into a dimension line (with
//! short end ticks) and a label positioned at the line midpoint. Lines go to
//! the 3D renderer, labels to the screen-space overlay.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::AnnotationAnchor;
use crate::viewport::mesh::LineMeshData;

/// Half length of the ticks at both ends of a dimension line
pub const TICK_SIZE: f32 = 0.08;
pub const DIMENSION_COLOR: [f32; 4] = [0.92, 0.92, 0.96, 1.0];

/// Visual style shared by every dimension label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_size: f32,
    pub padding: f32,
    /// RGBA
    pub background: [u8; 4],
    /// RGBA
    pub text_color: [u8; 4],
}

pub const LABEL_STYLE: LabelStyle = LabelStyle {
    font_size: 14.0,
    padding: 4.0,
    background: [20, 20, 24, 200],
    text_color: [240, 240, 245, 255],
};

impl Default for LabelStyle {
    fn default() -> Self {
        LABEL_STYLE
    }
}

/// Screen-space label anchored to a world position
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLabel {
    pub text: String,
    pub position: Vec3,
}

/// One renderable dimension: line primitive plus its label
#[derive(Debug, Clone)]
pub struct Annotation {
    pub line: LineMeshData,
    pub label: DimensionLabel,
}

/// Build one annotation per anchor, in anchor order
pub fn build_annotations(anchors: &[AnnotationAnchor]) -> Vec<Annotation> {
    anchors.iter().map(build_annotation).collect()
}

pub fn build_annotation(anchor: &AnnotationAnchor) -> Annotation {
    let mut line = LineMeshData::default();
    line.push_segment(anchor.start, anchor.end, DIMENSION_COLOR);

    let tick = tick_direction(anchor.end - anchor.start) * TICK_SIZE;
    for p in [anchor.start, anchor.end] {
        line.push_segment(p - tick, p + tick, DIMENSION_COLOR);
    }

    Annotation {
        line,
        label: DimensionLabel {
            text: anchor.label.clone(),
            position: anchor.midpoint(),
        },
    }
}

/// Perpendicular to the dimension line, horizontal when possible
fn tick_direction(dir: Vec3) -> Vec3 {
    let dir = dir.normalize_or_zero();
    let across = dir.cross(Vec3::Y);
    if across.length_squared() > 1e-6 {
        across.normalize()
    } else {
        // vertical line
        Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(start: Vec3, end: Vec3) -> AnnotationAnchor {
        AnnotationAnchor::new(start, end, "a=4".to_string())
    }

    #[test]
    fn test_label_at_midpoint() {
        let a = build_annotation(&anchor(Vec3::new(-1.0, 0.0, 1.3), Vec3::new(1.0, 0.0, 1.3)));
        assert_eq!(a.label.text, "a=4");
        assert!((a.label.position - Vec3::new(0.0, 0.0, 1.3)).length() < 1e-6);
    }

    #[test]
    fn test_line_has_two_ticks() {
        let a = build_annotation(&anchor(Vec3::ZERO, Vec3::X));
        assert_eq!(a.line.segment_count(), 3);
        let (t0, t1) = a.line.segments().nth(1).unwrap();
        assert!((t1 - t0).dot(Vec3::X).abs() < 1e-6);
        assert!(((t1 - t0).length() - 2.0 * TICK_SIZE).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_line_ticks_are_horizontal() {
        let a = build_annotation(&anchor(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)));
        for (p0, p1) in a.line.segments().skip(1) {
            assert!((p1 - p0).y.abs() < 1e-6);
        }
    }

    #[test]
    fn test_one_annotation_per_anchor() {
        let anchors = vec![
            anchor(Vec3::ZERO, Vec3::X),
            anchor(Vec3::ZERO, Vec3::Y),
            anchor(Vec3::ZERO, Vec3::Z),
        ];
        assert_eq!(build_annotations(&anchors).len(), 3);
        assert!(build_annotations(&[]).is_empty());
    }
}

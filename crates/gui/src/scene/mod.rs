//! Scene graph and rendering seams
//!
//! The host talks to the GPU and to the label overlay only through the
//! [`SceneRenderer`] and [`LabelRenderer`] traits. The binary implements them
//! with glow and egui; [`crate::harness`] implements them with recording
//! backends so the whole lifecycle runs headless in tests.

pub mod controls;
pub mod host;
pub mod lighting;

use std::collections::BTreeMap;

use shared::ShapeKind;

use crate::annotations::{Annotation, DimensionLabel};
use crate::geometry::BuiltShape;
use crate::viewport::bounds::Aabb;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::{LineMeshData, MeshData};

pub use controls::OrbitControls;
pub use host::{HostConfig, SceneHost, SceneState};
pub use lighting::{DirectionalLight, Lighting};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Back faces are lit as if they faced the viewer
    pub double_sided: bool,
    pub opacity: f32,
}

impl Material {
    pub const SURFACE: Material = Material {
        double_sided: false,
        opacity: 1.0,
    };
    /// Flat shapes are drawn double-sided and slightly translucent
    pub const FLAT: Material = Material {
        double_sided: true,
        opacity: 0.9,
    };
}

/// Everything a renderer needs to draw one frame
pub struct RenderFrame<'a, M, L> {
    pub camera: &'a ArcBallCamera,
    pub aspect: f32,
    pub lighting: &'a Lighting,
    pub background: [u8; 3],
    pub meshes: Vec<&'a M>,
    pub lines: Vec<&'a L>,
}

/// Primary (3D) renderer
pub trait SceneRenderer {
    /// GPU mesh plus its material
    type Mesh;
    /// GPU line buffer
    type Lines;

    fn upload_mesh(&mut self, data: &MeshData, material: Material) -> Self::Mesh;
    fn upload_lines(&mut self, data: &LineMeshData) -> Self::Lines;
    fn release_mesh(&mut self, mesh: Self::Mesh);
    fn release_lines(&mut self, lines: Self::Lines);

    /// Resize the drawing surface (pixels)
    fn set_size(&mut self, size: egui::Vec2);
    fn render(&mut self, frame: &RenderFrame<'_, Self::Mesh, Self::Lines>);

    /// Free programs and any remaining GPU state
    fn dispose(&mut self);
    /// Stop presenting output
    fn detach(&mut self);
}

/// Handle to a label owned by a [`LabelRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(pub u64);

/// Secondary renderer for screen-space labels, drawn above the 3D output
pub trait LabelRenderer {
    fn add_label(&mut self, label: &DimensionLabel) -> LabelId;
    fn remove_label(&mut self, id: LabelId);
    fn set_size(&mut self, size: egui::Vec2);
    /// Draw every label with the same camera used for the 3D pass
    fn render(&mut self, camera: &ArcBallCamera);
    fn detach(&mut self);
}

/// Id-keyed label storage for [`LabelRenderer`] implementations
#[derive(Debug, Default)]
pub struct LabelSet {
    labels: BTreeMap<LabelId, DimensionLabel>,
    next_id: u64,
}

impl LabelSet {
    pub fn insert(&mut self, label: &DimensionLabel) -> LabelId {
        let id = LabelId(self.next_id);
        self.next_id += 1;
        self.labels.insert(id, label.clone());
        id
    }

    pub fn remove(&mut self, id: LabelId) -> Option<DimensionLabel> {
        self.labels.remove(&id)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionLabel> {
        self.labels.values()
    }
}

// ── Scene graph nodes ────────────────────────────────────────

/// A GPU-backed node of the shape subtree
pub enum SceneNode<R: SceneRenderer> {
    Mesh(R::Mesh),
    Lines(R::Lines),
}

impl<R: SceneRenderer> SceneNode<R> {
    fn release(self, renderer: &mut R) {
        match self {
            SceneNode::Mesh(mesh) => renderer.release_mesh(mesh),
            SceneNode::Lines(lines) => renderer.release_lines(lines),
        }
    }
}

/// GPU resources of one built shape: surface, outline and optional wireframe
pub struct ShapeSubtree<R: SceneRenderer> {
    pub kind: ShapeKind,
    pub bounds: Aabb,
    nodes: Vec<SceneNode<R>>,
}

impl<R: SceneRenderer> ShapeSubtree<R> {
    pub fn upload(kind: ShapeKind, built: &BuiltShape, renderer: &mut R) -> Self {
        let material = match kind.family() {
            shared::ShapeFamily::Solid => Material::SURFACE,
            shared::ShapeFamily::Planar => Material::FLAT,
        };
        let mut nodes = vec![
            SceneNode::Mesh(renderer.upload_mesh(&built.mesh, material)),
            SceneNode::Lines(renderer.upload_lines(&built.outline)),
        ];
        if let Some(wire) = &built.wireframe {
            nodes.push(SceneNode::Lines(renderer.upload_lines(wire)));
        }
        Self {
            kind,
            bounds: Aabb::from_mesh(&built.mesh),
            nodes,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Release every node's geometry and material
    pub fn dispose(self, renderer: &mut R) {
        for node in self.nodes {
            node.release(renderer);
        }
    }

    fn collect<'a>(&'a self, meshes: &mut Vec<&'a R::Mesh>, lines: &mut Vec<&'a R::Lines>) {
        for node in &self.nodes {
            match node {
                SceneNode::Mesh(m) => meshes.push(m),
                SceneNode::Lines(l) => lines.push(l),
            }
        }
    }
}

/// Owned, swappable slot for the active shape subtree
pub struct ShapeSlot<R: SceneRenderer>(Option<ShapeSubtree<R>>);

impl<R: SceneRenderer> Default for ShapeSlot<R> {
    fn default() -> Self {
        Self(None)
    }
}

impl<R: SceneRenderer> ShapeSlot<R> {
    /// Detach the current subtree, leaving the slot empty
    pub fn take(&mut self) -> Option<ShapeSubtree<R>> {
        self.0.take()
    }

    /// Attach a subtree. A subtree still occupying the slot is released first.
    pub fn attach(&mut self, subtree: ShapeSubtree<R>, renderer: &mut R) {
        if let Some(stale) = self.0.replace(subtree) {
            tracing::warn!("Shape slot was still occupied by {}; releasing it", stale.kind);
            stale.dispose(renderer);
        }
    }

    pub fn get(&self) -> Option<&ShapeSubtree<R>> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Dimension lines (3D renderer) and their labels (overlay)
pub struct AnnotationSet<R: SceneRenderer> {
    lines: Vec<R::Lines>,
    labels: Vec<LabelId>,
}

impl<R: SceneRenderer> Default for AnnotationSet<R> {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl<R: SceneRenderer> AnnotationSet<R> {
    pub fn upload<L: LabelRenderer>(
        annotations: &[Annotation],
        renderer: &mut R,
        overlay: &mut L,
    ) -> Self {
        let mut set = Self::default();
        for annotation in annotations {
            set.lines.push(renderer.upload_lines(&annotation.line));
            set.labels.push(overlay.add_label(&annotation.label));
        }
        set
    }

    /// Release every line and remove every label. Safe to call repeatedly.
    pub fn clear<L: LabelRenderer>(&mut self, renderer: &mut R, overlay: &mut L) {
        for lines in self.lines.drain(..) {
            renderer.release_lines(lines);
        }
        for id in self.labels.drain(..) {
            overlay.remove_label(id);
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn lines(&self) -> impl Iterator<Item = &R::Lines> {
        self.lines.iter()
    }
}

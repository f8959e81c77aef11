//! Headless test harness.
//!
//! Drives a [`SceneHost`] and an [`UpdateCoordinator`] with recording
//! renderers instead of OpenGL and egui. The recorders track every live GPU
//! resource and label, so tests can check rebuild leak-freedom, unmount
//! teardown and per-frame ordering without a window.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use shared::{ShapeDescriptor, ShapeParams};

use crate::annotations::DimensionLabel;
use crate::coordinator::{UpdateCoordinator, UpdateOutcome};
use crate::scene::{
    HostConfig, LabelId, LabelRenderer, LabelSet, Material, RenderFrame, SceneHost, SceneRenderer,
};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::{LineMeshData, MeshData};

/// What the recorders saw, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    Scene {
        camera: ArcBallCamera,
        meshes: usize,
        lines: usize,
    },
    Labels {
        camera: ArcBallCamera,
        labels: usize,
    },
    /// Primary renderer disposed
    Disposed,
}

/// Event log shared by both recorders
pub type EventLog = Rc<RefCell<Vec<FrameEvent>>>;

#[derive(Debug, PartialEq, Eq)]
pub struct RecordedMesh(u64);

#[derive(Debug, PartialEq, Eq)]
pub struct RecordedLines(u64);

/// [`SceneRenderer`] that keeps uploaded data in memory
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    log: EventLog,
    next_id: u64,
    meshes: BTreeMap<u64, (MeshData, Material)>,
    lines: BTreeMap<u64, LineMeshData>,
    pub size: egui::Vec2,
    pub uploads: usize,
    pub releases: usize,
    /// Releases of handles that were not live
    pub bad_releases: usize,
    pub disposed: bool,
    pub detached: bool,
}

impl RecordingRenderer {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn live_resources(&self) -> usize {
        self.meshes.len() + self.lines.len()
    }

    pub fn live_meshes(&self) -> impl Iterator<Item = (&MeshData, Material)> {
        self.meshes.values().map(|(m, mat)| (m, *mat))
    }

    pub fn live_lines(&self) -> impl Iterator<Item = &LineMeshData> {
        self.lines.values()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.uploads += 1;
        self.next_id
    }
}

impl SceneRenderer for RecordingRenderer {
    type Mesh = RecordedMesh;
    type Lines = RecordedLines;

    fn upload_mesh(&mut self, data: &MeshData, material: Material) -> RecordedMesh {
        let id = self.next();
        self.meshes.insert(id, (data.clone(), material));
        RecordedMesh(id)
    }

    fn upload_lines(&mut self, data: &LineMeshData) -> RecordedLines {
        let id = self.next();
        self.lines.insert(id, data.clone());
        RecordedLines(id)
    }

    fn release_mesh(&mut self, mesh: RecordedMesh) {
        self.releases += 1;
        if self.meshes.remove(&mesh.0).is_none() {
            self.bad_releases += 1;
        }
    }

    fn release_lines(&mut self, lines: RecordedLines) {
        self.releases += 1;
        if self.lines.remove(&lines.0).is_none() {
            self.bad_releases += 1;
        }
    }

    fn set_size(&mut self, size: egui::Vec2) {
        self.size = size;
    }

    fn render(&mut self, frame: &RenderFrame<'_, RecordedMesh, RecordedLines>) {
        self.log.borrow_mut().push(FrameEvent::Scene {
            camera: frame.camera.clone(),
            meshes: frame.meshes.len(),
            lines: frame.lines.len(),
        });
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.log.borrow_mut().push(FrameEvent::Disposed);
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

/// [`LabelRenderer`] that keeps labels in memory
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    log: EventLog,
    labels: LabelSet,
    pub size: egui::Vec2,
    pub bad_removals: usize,
    pub detached: bool,
}

impl RecordingOverlay {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn live_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn label_texts(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.text.clone()).collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &DimensionLabel> {
        self.labels.iter()
    }
}

impl LabelRenderer for RecordingOverlay {
    fn add_label(&mut self, label: &DimensionLabel) -> LabelId {
        self.labels.insert(label)
    }

    fn remove_label(&mut self, id: LabelId) {
        if self.labels.remove(id).is_none() {
            self.bad_removals += 1;
        }
    }

    fn set_size(&mut self, size: egui::Vec2) {
        self.size = size;
    }

    fn render(&mut self, camera: &ArcBallCamera) {
        self.log.borrow_mut().push(FrameEvent::Labels {
            camera: camera.clone(),
            labels: self.labels.len(),
        });
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

pub type HeadlessHost = SceneHost<RecordingRenderer, RecordingOverlay>;

/// Headless viewer: host + coordinator + recorders
pub struct TestHarness {
    pub host: HeadlessHost,
    pub coordinator: UpdateCoordinator,
    log: EventLog,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Mounted harness with an 800x600 container and default settings
    pub fn new() -> Self {
        Self::with_size(egui::vec2(800.0, 600.0))
    }

    pub fn with_size(size: egui::Vec2) -> Self {
        Self::with_config(size, HostConfig::default())
    }

    pub fn with_config(size: egui::Vec2, config: HostConfig) -> Self {
        let log = EventLog::default();
        let host = SceneHost::mount(
            RecordingRenderer::new(log.clone()),
            RecordingOverlay::new(log.clone()),
            size,
            config,
        );
        Self {
            host,
            coordinator: UpdateCoordinator::new(),
            log,
        }
    }

    // ── Driving ───────────────────────────────────────────────

    pub fn show(&mut self, desc: &ShapeDescriptor) -> UpdateOutcome {
        self.coordinator.update(&mut self.host, desc)
    }

    /// Show a shape by id with explicit parameters
    pub fn show_shape(&mut self, id: &str, params: &[(&str, f64)]) -> UpdateOutcome {
        let params: ShapeParams = params.iter().copied().collect();
        self.show(&ShapeDescriptor::new(id, params))
    }

    pub fn tick(&mut self) -> bool {
        self.host.tick()
    }

    pub fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.host.tick();
        }
    }

    pub fn resize(&mut self, size: egui::Vec2) {
        self.host.resize(size);
    }

    pub fn unmount(&mut self) {
        self.host.unmount();
    }

    /// Replace the host with a freshly mounted one (new recorders, new log)
    pub fn remount(&mut self) {
        let size = self.renderer().size;
        *self = Self::with_config(size, self.host.config().clone());
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn renderer(&self) -> &RecordingRenderer {
        self.host.renderer()
    }

    pub fn overlay(&self) -> &RecordingOverlay {
        self.host.overlay()
    }

    pub fn live_gpu_resources(&self) -> usize {
        self.renderer().live_resources()
    }

    pub fn live_labels(&self) -> usize {
        self.overlay().live_labels()
    }

    pub fn label_texts(&self) -> Vec<String> {
        self.overlay().label_texts()
    }

    /// Resources that should be live: grid, shape subtree nodes, dimension lines
    pub fn expected_gpu_resources(&self) -> usize {
        let Some(scene) = self.host.scene() else {
            return 0;
        };
        let grid = usize::from(self.host.config().grid.visible);
        let subtree = scene.slot.get().map_or(0, |s| s.node_count());
        grid + subtree + scene.annotations.len()
    }

    /// The uploaded shape surface, if a shape is showing
    pub fn shape_mesh(&self) -> Option<MeshData> {
        self.renderer().live_meshes().next().map(|(m, _)| m.clone())
    }

    pub fn events(&self) -> Vec<FrameEvent> {
        self.log.borrow().clone()
    }

    pub fn clear_events(&mut self) {
        self.log.borrow_mut().clear();
    }
}

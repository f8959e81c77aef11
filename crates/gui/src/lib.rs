// Library crate: shape geometry, scene host and update coordinator, testable
// without a window. GL and egui code (app, ui, viewport rendering) stays in
// the binary crate.

pub mod annotations;
pub mod coordinator;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod i18n;
pub mod scene;
pub mod state;
pub mod validation;

/// Renderer-independent viewport types: CPU meshes, bounds, camera.
/// The GL renderer and label overlay stay in the binary crate.
pub mod viewport {
    pub mod bounds;
    pub mod camera;
    pub mod mesh;
}

//! Scene host: owns the camera, controls, lights, grid, renderers and the
//! active shape, and drives the per-frame tick.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    AnnotationSet, LabelRenderer, Lighting, OrbitControls, RenderFrame, SceneRenderer, ShapeSlot,
};
use crate::state::settings::{AppSettings, CameraSettings, GridSettings};
use crate::viewport::camera::{aspect_ratio, ArcBallCamera};
use crate::viewport::mesh;

/// Distinguishes successive mounts
static NEXT_MOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Host configuration, derived from [`AppSettings`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostConfig {
    pub camera: CameraSettings,
    pub grid: GridSettings,
    pub background: [u8; 3],
}

impl HostConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            camera: settings.camera.clone(),
            grid: settings.grid.clone(),
            background: settings.viewport.background_color,
        }
    }
}

/// Everything that lives between mount and unmount
pub struct SceneState<R: SceneRenderer> {
    pub camera: ArcBallCamera,
    pub controls: OrbitControls,
    pub lighting: Lighting,
    pub slot: ShapeSlot<R>,
    pub annotations: AnnotationSet<R>,
    grid: Option<R::Lines>,
    size: egui::Vec2,
}

impl<R: SceneRenderer> SceneState<R> {
    pub fn size(&self) -> egui::Vec2 {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.size)
    }
}

pub struct SceneHost<R: SceneRenderer, L: LabelRenderer> {
    renderer: R,
    overlay: L,
    config: HostConfig,
    /// `Some` while mounted
    scene: Option<SceneState<R>>,
    mount_id: u64,
    frames: u64,
}

impl<R: SceneRenderer, L: LabelRenderer> SceneHost<R, L> {
    /// Mount into a container of the given pixel size. A zero size is
    /// accepted; the next non-zero [`resize`](Self::resize) corrects it.
    pub fn mount(mut renderer: R, mut overlay: L, size: egui::Vec2, config: HostConfig) -> Self {
        renderer.set_size(size);
        overlay.set_size(size);

        let mut camera = ArcBallCamera::new();
        camera.fov = config.camera.fov_degrees.to_radians();
        let mut controls = OrbitControls::new(&config.camera);
        controls.sync(&mut camera);

        let grid = config.grid.visible.then(|| {
            renderer.upload_lines(&mesh::grid(config.grid.range, config.grid.size, config.grid.opacity))
        });

        let mount_id = NEXT_MOUNT_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Scene host mounted ({:.0}x{:.0}, mount #{})", size.x, size.y, mount_id);

        Self {
            renderer,
            overlay,
            config,
            scene: Some(SceneState {
                camera,
                controls,
                lighting: Lighting::default(),
                slot: ShapeSlot::default(),
                annotations: AnnotationSet::default(),
                grid,
                size,
            }),
            mount_id,
            frames: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    /// Unique per mount; stays the same after unmount
    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Frames rendered since mount
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> Option<&SceneState<R>> {
        self.scene.as_ref()
    }

    pub fn camera(&self) -> Option<&ArcBallCamera> {
        self.scene.as_ref().map(|s| &s.camera)
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.scene.as_mut().map(|s| &mut s.controls)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn overlay(&self) -> &L {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut L {
        &mut self.overlay
    }

    /// Split borrow for the update coordinator
    pub fn parts_mut(&mut self) -> Option<(&mut SceneState<R>, &mut R, &mut L)> {
        let scene = self.scene.as_mut()?;
        Some((scene, &mut self.renderer, &mut self.overlay))
    }

    /// Container resize handler: recompute aspect and resize both renderers.
    /// Does nothing once unmounted.
    pub fn resize(&mut self, size: egui::Vec2) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if scene.size == size {
            return;
        }
        tracing::debug!("Viewport resized to {:.0}x{:.0}", size.x, size.y);
        scene.size = size;
        self.renderer.set_size(size);
        self.overlay.set_size(size);
    }

    /// Apply changed settings to the mounted scene without a remount.
    /// The grid is re-uploaded only when its settings changed.
    pub fn reconfigure(&mut self, config: HostConfig) {
        if config == self.config {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            if config.grid != self.config.grid {
                if let Some(grid) = scene.grid.take() {
                    self.renderer.release_lines(grid);
                }
                scene.grid = config.grid.visible.then(|| {
                    self.renderer.upload_lines(&mesh::grid(
                        config.grid.range,
                        config.grid.size,
                        config.grid.opacity,
                    ))
                });
            }
            scene.camera.fov = config.camera.fov_degrees.to_radians();
            scene.controls.configure(&config.camera, &mut scene.camera);
            tracing::debug!("Scene host reconfigured");
        }
        self.config = config;
    }

    /// One frame: advance controls, render the scene, then render labels with
    /// the same camera. Returns whether another frame is requested.
    pub fn tick(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        scene.controls.update(&mut scene.camera);
        let camera = scene.camera.clone();

        let mut meshes = Vec::new();
        let mut lines: Vec<&R::Lines> = scene.grid.iter().collect();
        if let Some(subtree) = scene.slot.get() {
            subtree.collect(&mut meshes, &mut lines);
        }
        lines.extend(scene.annotations.lines());

        let frame = RenderFrame {
            camera: &camera,
            aspect: scene.aspect(),
            lighting: &scene.lighting,
            background: self.config.background,
            meshes,
            lines,
        };
        self.renderer.render(&frame);
        self.overlay.render(&camera);

        self.frames += 1;
        true
    }

    /// Tear down: cancel the frame loop, drop the resize handler, dispose the
    /// controls and the primary renderer, detach both outputs. Idempotent.
    pub fn unmount(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        if let Some(subtree) = scene.slot.take() {
            subtree.dispose(&mut self.renderer);
        }
        scene.annotations.clear(&mut self.renderer, &mut self.overlay);
        if let Some(grid) = scene.grid.take() {
            self.renderer.release_lines(grid);
        }
        scene.controls.dispose();

        self.renderer.dispose();
        self.renderer.detach();
        self.overlay.detach();
        tracing::info!("Scene host unmounted after {} frames", self.frames);
    }
}

impl<R: SceneRenderer, L: LabelRenderer> Drop for SceneHost<R, L> {
    fn drop(&mut self) {
        self.unmount();
    }
}

//! 3D viewport panel: hosts the scene and forwards pointer input to the
//! orbit controls

mod gl_renderer;
mod overlays;

use std::sync::Arc;

use egui::Ui;

use shape_viewer_lib::coordinator::{UpdateCoordinator, UpdateOutcome};
use shape_viewer_lib::i18n::t;
use shape_viewer_lib::scene::{HostConfig, SceneHost};
use shape_viewer_lib::state::AppState;
use shared::ParameterError;

use gl_renderer::GlSceneRenderer;
use overlays::LabelOverlay;

type GlSceneHost = SceneHost<GlSceneRenderer, LabelOverlay>;

/// Degrees of orbit per dragged point
const ROTATE_SPEED: f32 = 0.5;
/// World units of pan per dragged point
const PAN_SPEED: f32 = 0.01;
const ZOOM_SPEED: f32 = 0.002;

/// Snapshot for the status bar
#[derive(Debug, Default, Clone)]
pub struct ViewportStatus {
    pub mounted: bool,
    pub frames: u64,
    pub labels: usize,
    pub problems: Vec<ParameterError>,
}

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl: Option<Arc<glow::Context>>,
    host: Option<GlSceneHost>,
    coordinator: UpdateCoordinator,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl: None,
            host: None,
            coordinator: UpdateCoordinator::new(),
        }
    }

    /// Keep the GL context for mounting (must be called with a GL context)
    pub fn init_gl(&mut self, gl: Arc<glow::Context>) {
        self.gl = Some(gl);
    }

    /// Reframe the camera for the current shape on the next frame
    pub fn reset_camera(&mut self) {
        self.coordinator.invalidate();
    }

    pub fn status(&self) -> ViewportStatus {
        match &self.host {
            Some(host) if host.is_mounted() => ViewportStatus {
                mounted: true,
                frames: host.frames(),
                labels: host.overlay().len(),
                problems: self.coordinator.problems().to_vec(),
            },
            _ => ViewportStatus::default(),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        if !state.viewport_mounted {
            self.unmount();
            self.draw_unmounted(ui, rect, state);
            return;
        }

        self.ensure_mounted(ui.ctx(), rect, state);
        let Some(host) = self.host.as_mut() else {
            self.draw_unmounted(ui, rect, state);
            return;
        };

        // ── Camera controls ─────────────────────────────────
        if let Some(controls) = host.controls_mut() {
            if response.dragged_by(egui::PointerButton::Primary)
                || response.dragged_by(egui::PointerButton::Middle)
            {
                let delta = response.drag_delta();
                controls.rotate(-delta.x * ROTATE_SPEED, delta.y * ROTATE_SPEED);
            }
            if response.dragged_by(egui::PointerButton::Secondary) {
                let delta = response.drag_delta();
                controls.pan(-delta.x * PAN_SPEED, delta.y * PAN_SPEED);
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll.abs() > 0.1 {
                    controls.zoom(scroll * ZOOM_SPEED);
                }
            }
        }

        if std::mem::take(&mut state.camera_reset_requested) {
            self.coordinator.invalidate();
        }

        // ── Rebuild on descriptor change ────────────────────
        if let UpdateOutcome::Rebuilt { problems, .. } =
            self.coordinator.update(host, &state.descriptor)
        {
            if !problems.is_empty() {
                tracing::debug!("{} parameter problem(s) after rebuild", problems.len());
            }
        }

        // ── Frame ───────────────────────────────────────────
        host.resize(rect.size());
        host.overlay_mut().set_rect(rect);
        host.overlay_mut().set_style(state.settings.labels);
        if !ui.is_rect_visible(rect) {
            return;
        }
        if host.tick() {
            host.renderer_mut().paint_into(ui.painter(), rect);
            ui.ctx().request_repaint();
        }
    }

    /// Mount a host if there is none; settings changes apply in place
    fn ensure_mounted(&mut self, ctx: &egui::Context, rect: egui::Rect, state: &AppState) {
        let config = HostConfig::from_settings(&state.settings);
        if let Some(host) = self.host.as_mut() {
            host.reconfigure(config);
            return;
        }
        let Some(gl) = self.gl.clone() else {
            return;
        };
        let renderer = GlSceneRenderer::new(gl);
        let overlay = LabelOverlay::new(ctx.clone(), state.settings.labels);
        self.host = Some(SceneHost::mount(renderer, overlay, rect.size(), config));
    }

    /// Release the host while the GL context is still current
    pub fn unmount(&mut self) {
        if let Some(mut host) = self.host.take() {
            host.unmount();
        }
    }

    fn draw_unmounted(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);
        let [r, g, b] = state.settings.viewport.background_color;
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(r, g, b));
        let hint = if self.gl.is_some() {
            t("vp.unmounted_hint")
        } else {
            t("vp.no_gl")
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            hint,
            egui::FontId::proportional(13.0),
            egui::Color32::from_rgb(120, 120, 130),
        );
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmount_without_host_is_noop() {
        let mut panel = ViewportPanel::new();
        panel.unmount();
        panel.unmount();
        assert!(panel.host.is_none());
        assert!(!panel.status().mounted);
    }
}

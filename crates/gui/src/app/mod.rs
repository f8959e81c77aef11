//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;

use shape_viewer_lib::i18n::set_lang;
use shape_viewer_lib::state::{AppSettings, AppState};
use shared::ShapeDescriptor;

use crate::ui::{shape_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct ShapeViewerApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl ShapeViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<ShapeDescriptor>) -> Self {
        let settings = AppSettings::load();
        set_lang(settings.ui.language);
        let state = AppState::new(settings, initial.unwrap_or_default());

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();
        match cc.gl.as_ref() {
            Some(gl) => viewport.init_gl(gl.clone()),
            None => tracing::error!("No glow context; the viewport stays empty"),
        }

        let last_font_size = state.settings.ui.font_size;
        Self {
            state,
            viewport,
            last_font_size,
        }
    }
}

impl eframe::App for ShapeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::shape_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        let status = self.viewport.status();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, &status);
            });

        // ── Left panel: shape and parameters ─────────────────
        if self.state.panels.shape_panel {
            egui::SidePanel::left("shape_panel")
                .default_width(240.0)
                .width_range(180.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    shape_panel::show(ui, &mut self.state);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        self.viewport.unmount();
        self.state.settings.save();
    }
}

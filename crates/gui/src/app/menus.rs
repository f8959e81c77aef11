//! Application menu bar and settings window

use eframe::egui;

use shape_viewer_lib::i18n::{lang, set_lang, shape_name, t, Lang};
use shape_viewer_lib::state::{AppSettings, AppState};
use shared::{ShapeFamily, ShapeKind};

use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.reset_params")).clicked() {
            state.reset_params();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.shape_panel, t("menu.shape_panel"));
        ui.checkbox(&mut state.settings.grid.visible, t("menu.grid"));
        ui.checkbox(&mut state.viewport_mounted, t("menu.viewport_mounted"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, name) in [(Lang::Ru, "Русский"), (Lang::En, "English")] {
                if ui.selectable_label(lang() == l, name).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l;
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the shape menu, grouped by family
pub fn shape_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.shape"), |ui| {
        for (family, title) in [
            (ShapeFamily::Solid, t("menu.solids")),
            (ShapeFamily::Planar, t("menu.planar")),
        ] {
            ui.menu_button(title, |ui| {
                for kind in ShapeKind::ALL.into_iter().filter(|k| k.family() == family) {
                    let selected = state.descriptor.kind() == Some(kind);
                    if ui.selectable_label(selected, shape_name(kind)).clicked() {
                        state.select_shape(kind);
                        ui.close_menu();
                    }
                }
            });
        }
    });
}

pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_grid_settings(ui, state);
                show_viewport_settings(ui, state);
                show_camera_settings(ui, state);
                show_label_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn show_grid_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.grid"));
    ui.checkbox(&mut state.settings.grid.visible, t("settings.grid_visible"));

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.size)
                .speed(0.1)
                .range(0.1..=10.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.range)
                .speed(1)
                .range(1..=50),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_opacity"));
        ui.add(egui::Slider::new(&mut state.settings.grid.opacity, 0.0..=1.0));
    });
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        let [r, g, b] = state.settings.viewport.background_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            state.settings.viewport.background_color = [color.r(), color.g(), color.b()];
        }
    });
    ui.add_space(10.0);
}

fn show_camera_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let camera = &mut state.settings.camera;
    ui.heading(t("settings.camera"));
    ui.horizontal(|ui| {
        ui.label(t("settings.fov"));
        ui.add(
            egui::DragValue::new(&mut camera.fov_degrees)
                .speed(1.0)
                .range(20.0..=100.0)
                .suffix("°"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.damping"));
        ui.add(egui::Slider::new(&mut camera.damping_factor, 0.01..=1.0));
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.zoom_range"));
        ui.add(
            egui::DragValue::new(&mut camera.min_distance)
                .speed(0.1)
                .range(0.1..=camera.max_distance),
        );
        ui.add(
            egui::DragValue::new(&mut camera.max_distance)
                .speed(1.0)
                .range(camera.min_distance..=500.0),
        );
    });
    ui.add_space(10.0);
}

fn show_label_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let labels = &mut state.settings.labels;
    ui.heading(t("settings.labels"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut labels.font_size)
                .speed(0.5)
                .range(8.0..=32.0)
                .suffix(" pt"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.label_bg"));
        let [r, g, b, a] = labels.background;
        let mut color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
        if ui.color_edit_button_srgba(&mut color).changed() {
            labels.background = color.to_srgba_unmultiplied();
        }
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            let language = state.settings.ui.language;
            state.settings = AppSettings::default();
            state.settings.ui.language = language;
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}

//! Shape selector and parameter editors
//!
//! Every parameter field accepts an expression; the value is applied as soon
//! as it evaluates, and the viewport rebuilds on the next frame.

use egui::{TextEdit, Ui};
use shared::{ShapeFamily, ShapeKind};

use shape_viewer_lib::i18n::{shape_name, t};
use shape_viewer_lib::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("panel.shape"));
    ui.separator();

    shape_selector(ui, state);
    ui.add_space(8.0);

    let Some(kind) = state.descriptor.kind() else {
        ui.colored_label(
            egui::Color32::from_rgb(230, 160, 80),
            format!("{}: '{}'", t("status.unknown_shape"), state.descriptor.shape),
        );
        return;
    };

    ui.horizontal(|ui| {
        ui.strong(t("panel.parameters"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button(t("panel.defaults")).clicked() {
                state.reset_params();
            }
        });
    });

    egui::Grid::new("shape_params")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            for spec in kind.params() {
                ui.label(spec.key);
                param_field(ui, state, spec.key, spec.optional);
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    ui.weak(t("panel.expr_hint"));
}

fn shape_selector(ui: &mut Ui, state: &mut AppState) {
    let selected = state
        .descriptor
        .kind()
        .map(shape_name)
        .unwrap_or(t("status.unknown_shape"));

    egui::ComboBox::from_id_salt("shape_combo")
        .selected_text(selected)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for (family, title) in [
                (ShapeFamily::Solid, t("menu.solids")),
                (ShapeFamily::Planar, t("menu.planar")),
            ] {
                ui.label(egui::RichText::new(title).weak());
                for kind in ShapeKind::ALL.into_iter().filter(|k| k.family() == family) {
                    let current = state.descriptor.kind() == Some(kind);
                    if ui.selectable_label(current, shape_name(kind)).clicked() {
                        state.select_shape(kind);
                    }
                }
                ui.separator();
            }
        });
}

fn param_field(ui: &mut Ui, state: &mut AppState, key: &str, optional: bool) {
    let mut text = state.param_inputs.get(key).cloned().unwrap_or_default();
    let error = state.input_errors.get(key).cloned();

    let mut edit = TextEdit::singleline(&mut text).desired_width(120.0);
    if optional {
        edit = edit.hint_text(t("panel.optional"));
    }
    if error.is_some() {
        edit = edit.text_color(egui::Color32::from_rgb(230, 90, 90));
    }

    let response = ui.add(edit);
    if response.changed() {
        if optional && text.trim().is_empty() {
            state.clear_param_input(key);
        } else {
            state.set_param_input(key, &text);
        }
    }
    if let Some(error) = error {
        response.on_hover_text(format!("{}: {error}", t("panel.expr_error")));
    }
}

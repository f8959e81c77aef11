//! Status bar: current shape, parameter problems, frame counter

use egui::Ui;

use shape_viewer_lib::i18n::{shape_name, t};
use shape_viewer_lib::state::AppState;

use crate::viewport::ViewportStatus;

pub fn show(ui: &mut Ui, state: &AppState, status: &ViewportStatus) {
    ui.horizontal_centered(|ui| {
        if !status.mounted {
            ui.weak(t("status.unmounted"));
            return;
        }

        match state.descriptor.kind() {
            Some(kind) => ui.label(format!("{}: {}", t("status.showing"), shape_name(kind))),
            None => ui.colored_label(
                egui::Color32::from_rgb(230, 160, 80),
                format!("{}: '{}'", t("status.unknown_shape"), state.descriptor.shape),
            ),
        };
        ui.separator();
        ui.weak(format!("{} {}", status.labels, t("status.dimensions")));

        if !status.problems.is_empty() {
            ui.separator();
            let details = status
                .problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            ui.colored_label(
                egui::Color32::from_rgb(255, 200, 100),
                format!("⚠ {}: {}", t("status.problems"), status.problems.len()),
            )
            .on_hover_text(details);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("{} {}", status.frames, t("status.frames")));
        });
    });
}

//! Application style configuration

use eframe::egui;

/// Text style sizes relative to the body font size
const TEXT_SCALES: [(egui::TextStyle, f32); 4] = [
    (egui::TextStyle::Body, 1.0),
    (egui::TextStyle::Button, 1.0),
    (egui::TextStyle::Small, 0.85),
    (egui::TextStyle::Heading, 1.3),
];

/// Dark theme with compact spacing, at the given font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();

    let radius = egui::CornerRadius::same(3);
    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = radius;
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.spacing.menu_margin = egui::Margin::same(4);

    style.visuals.panel_fill = egui::Color32::from_rgb(28, 28, 32);
    style.visuals.window_fill = egui::Color32::from_rgb(34, 34, 40);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(40, 80, 140);

    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    for (text_style, scale) in TEXT_SCALES {
        style
            .text_styles
            .insert(text_style, egui::FontId::proportional(font_size * scale));
    }
    style
        .text_styles
        .insert(egui::TextStyle::Monospace, egui::FontId::monospace(font_size));
}

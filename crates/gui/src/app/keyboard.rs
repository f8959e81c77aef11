//! Keyboard shortcut handling

use eframe::egui;

use shape_viewer_lib::state::AppState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // Home: reframe the camera for the current shape
        if i.key_pressed(egui::Key::Home) {
            state.camera_reset_requested = true;
        }
        // Ctrl+R: back to default parameters
        if i.modifiers.command && i.key_pressed(egui::Key::R) {
            state.reset_params();
        }
    });
}

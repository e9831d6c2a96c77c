//! Keyboard shortcut help overlay.

use eframe::egui;

const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play / Pause"),
    ("M", "Add annotation at the playhead"),
    ("← / →", "Skip 5 s back / forward"),
    ("Home / End", "Jump to start / end"),
    ("+ / −", "Zoom in / out"),
    ("0", "Reset zoom"),
    ("F1", "Toggle this help"),
];

/// Render the help window. Sets `*open = false` when dismissed.
pub fn render_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Keyboard Shortcuts")
        .open(open)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("help_grid")
                .num_columns(2)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    for (keys, action) in SHORTCUTS {
                        ui.monospace(*keys);
                        ui.label(*action);
                        ui.end_row();
                    }
                });
        });
}

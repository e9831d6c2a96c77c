//! Application settings and the settings window.

use eframe::egui;
use serde::{Deserialize, Serialize};

/// Application settings, persisted through eframe storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub font_size: f32,
    /// Minimum interval between overlay ticks, ms (~60 Hz default)
    pub tick_interval_ms: u64,
    /// Drift corrector cadence, ms
    pub drift_interval_ms: u64,
    /// Drift tolerance before the media transport is re-pinned, seconds
    pub drift_tolerance_s: f64,
    /// Pixels per second at zoom 1.0
    pub base_pixels_per_second: f32,
    /// Reload the last session document on startup
    pub reopen_last_session: bool,
    pub last_session: Option<std::path::PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size: 14.0,
            tick_interval_ms: 16,
            drift_interval_ms: 1000,
            drift_tolerance_s: 0.2,
            base_pixels_per_second: 10.0,
            reopen_last_session: false,
            last_session: None,
        }
    }
}

impl AppSettings {
    pub fn drift_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.drift_interval_ms.max(100))
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.clamp(4, 1000))
    }
}

/// Render the settings window. Sets `*open = false` when closed.
pub fn render_settings_window(ctx: &egui::Context, open: &mut bool, settings: &mut AppSettings) {
    egui::Window::new("Settings")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Interface");
            ui.checkbox(&mut settings.dark_mode, "Dark mode");
            ui.horizontal(|ui| {
                ui.label("Font size");
                ui.add(egui::Slider::new(&mut settings.font_size, 10.0..=22.0).fixed_decimals(0));
            });
            ui.checkbox(&mut settings.reopen_last_session, "Reopen last session on startup");

            ui.separator();
            ui.heading("Playback");
            ui.horizontal(|ui| {
                ui.label("Tick interval (ms)");
                ui.add(egui::Slider::new(&mut settings.tick_interval_ms, 8..=100));
            });
            ui.horizontal(|ui| {
                ui.label("Drift check (ms)");
                ui.add(egui::Slider::new(&mut settings.drift_interval_ms, 250..=5000));
            });
            ui.horizontal(|ui| {
                ui.label("Drift tolerance (s)");
                ui.add(
                    egui::Slider::new(&mut settings.drift_tolerance_s, 0.05..=1.0)
                        .fixed_decimals(2),
                );
            });

            ui.separator();
            ui.heading("Timeline");
            ui.horizontal(|ui| {
                ui.label("Base pixels/second");
                ui.add(
                    egui::Slider::new(&mut settings.base_pixels_per_second, 2.0..=60.0)
                        .fixed_decimals(0),
                );
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.drift_interval_ms, 1000);
        assert_eq!(settings.drift_tolerance_s, 0.2);
        assert_eq!(settings.tick_interval_ms, 16);
    }

    #[test]
    fn test_interval_floors() {
        let settings = AppSettings {
            drift_interval_ms: 1,
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(settings.drift_interval().as_millis() >= 100);
        assert!(settings.tick_interval().as_millis() >= 4);
    }
}

use debrief::cli::Args;
use debrief::config;
use debrief::core::events::{AppEvent, EventBus, ExportFormat};
use debrief::core::playback::PlaybackController;
use debrief::core::transport::SimulatedMedia;
use debrief::dialogs::{AnnotationDialog, AppSettings, render_settings_window};
use debrief::entities::{SessionData, loader};
use debrief::help;
use debrief::widgets;
use debrief::widgets::timeline::{TimelineConfig, TimelineState, ViewportState};

use clap::Parser;
use eframe::egui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Debounce before dirty annotations hit the sidecar.
const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
enum DockTab {
    Video,
    Timeline,
    Annotations,
    Session,
}

/// Main application state
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct DebriefApp {
    #[serde(skip)]
    session: SessionData,
    #[serde(skip)]
    playback: PlaybackController,
    #[serde(skip)]
    media: SimulatedMedia,
    timeline_state: TimelineState,
    #[serde(skip)]
    timeline_config: TimelineConfig,
    settings: AppSettings,
    #[serde(default = "DebriefApp::default_dock_state")]
    dock_state: DockState<DockTab>,
    #[serde(skip)]
    event_bus: EventBus,
    #[serde(skip)]
    annotation_dialog: AnnotationDialog,
    #[serde(skip)]
    show_help: bool,
    #[serde(skip)]
    show_settings: bool,
    #[serde(skip)]
    error_msg: Option<String>,
    #[serde(skip)]
    path_config: config::PathConfig,
    /// Drift settings currently applied to the controller
    #[serde(skip)]
    applied_drift: (u64, f64),
}

impl Default for DebriefApp {
    fn default() -> Self {
        let settings = AppSettings::default();
        let applied_drift = (settings.drift_interval_ms, settings.drift_tolerance_s);
        Self {
            session: SessionData::default(),
            playback: PlaybackController::new(0.0, Instant::now()),
            media: SimulatedMedia::new(),
            timeline_state: TimelineState::default(),
            timeline_config: TimelineConfig::default(),
            settings,
            dock_state: Self::default_dock_state(),
            event_bus: EventBus::new(),
            annotation_dialog: AnnotationDialog::default(),
            show_help: false,
            show_settings: false,
            error_msg: None,
            path_config: config::PathConfig::from_env_and_cli(None),
            applied_drift,
        }
    }
}

impl DebriefApp {
    fn default_dock_state() -> DockState<DockTab> {
        let mut dock_state = DockState::new(vec![DockTab::Video, DockTab::Session]);
        let [video, _timeline] = dock_state.main_surface_mut().split_below(
            NodeIndex::root(),
            0.55,
            vec![DockTab::Timeline],
        );
        let _ = dock_state
            .main_surface_mut()
            .split_right(video, 0.72, vec![DockTab::Annotations]);
        dock_state
    }

    /// Swap in a freshly loaded session: new controller, new transport, new
    /// caches. Everything playback-related is rebuilt rather than patched.
    fn install_session(&mut self, session: SessionData, now: Instant) {
        info!(
            "Installing session '{}' ({:.1}s)",
            session.display_name(),
            session.duration
        );
        self.playback = PlaybackController::new(session.duration, now);
        self.playback
            .configure_drift(self.settings.drift_interval(), self.settings.drift_tolerance_s);
        self.applied_drift = (self.settings.drift_interval_ms, self.settings.drift_tolerance_s);
        self.media = SimulatedMedia::new();
        self.timeline_state.waveforms.clear();
        self.timeline_state.scroll = Default::default();
        self.timeline_state.pane_offsets = Default::default();
        if let Some(path) = &session.session_path {
            self.settings.last_session = Some(path.clone());
        }
        self.session = session;
        self.error_msg = None;
    }

    fn load_session(&mut self, path: PathBuf, now: Instant) {
        match loader::load_session(&path) {
            Ok(session) => self.install_session(session, now),
            Err(e) => {
                error!("Failed to load session {}: {e:#}", path.display());
                self.error_msg = Some(format!("Failed to load {}: {e}", path.display()));
            }
        }
    }

    fn save_annotations(&mut self) {
        let path = self.session.annotation_path().or_else(|| {
            // Demo or unsaved session: ask where the sidecar should live
            rfd::FileDialog::new()
                .add_filter("Annotation sidecar", &["json"])
                .set_directory(&self.path_config.data_dir)
                .set_file_name("session.annot.json")
                .save_file()
        });
        let Some(path) = path else {
            return;
        };
        match loader::save_annotations(&path, &self.session.annotations) {
            Ok(()) => self.session.annotations.clear_dirty(),
            Err(e) => {
                error!("Annotation save failed: {e:#}");
                self.error_msg = Some(format!("Save failed: {e}"));
            }
        }
    }

    fn export_annotations(&mut self, format: ExportFormat) {
        let (filter, ext) = match format {
            ExportFormat::Json => ("JSON", "json"),
            ExportFormat::Csv => ("CSV", "csv"),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, &[ext])
            .set_file_name(format!("{}.{ext}", self.session.display_name()))
            .save_file()
        else {
            return;
        };
        let result = match format {
            ExportFormat::Json => loader::export_annotations_json(&path, &self.session.annotations),
            ExportFormat::Csv => loader::export_annotations_csv(&path, &self.session.annotations),
        };
        if let Err(e) = result {
            error!("Annotation export failed: {e:#}");
            self.error_msg = Some(format!("Export failed: {e}"));
        }
    }

    /// Apply the queued event batch. All playback/viewport transitions go
    /// through here, once per frame.
    fn apply_events(&mut self, now: Instant) {
        for event in self.event_bus.poll() {
            debug!("Applying {:?}", event);
            match event {
                AppEvent::TogglePlayPause => self.playback.toggle(&mut self.media, now),
                AppEvent::Play => self.playback.play(&mut self.media, now),
                AppEvent::Pause => self.playback.pause(&mut self.media, now),
                AppEvent::Seek(time) => {
                    self.playback.seek(time, &mut self.media, now);
                    self.timeline_state.scroll.suppress_follow(now);
                }
                AppEvent::StepBy(delta) => {
                    self.playback.step_by(delta, &mut self.media, now);
                    self.timeline_state.scroll.suppress_follow(now);
                }
                AppEvent::SetSpeed(speed) => self.playback.set_speed(speed, &mut self.media, now),
                AppEvent::JumpToStart => self.playback.jump_to_start(&mut self.media, now),
                AppEvent::JumpToEnd => self.playback.jump_to_end(&mut self.media, now),
                AppEvent::ZoomIn => {
                    let viewport = self.timeline_state.viewport.zoom_in();
                    self.timeline_state.set_viewport(viewport);
                }
                AppEvent::ZoomOut => {
                    let viewport = self.timeline_state.viewport.zoom_out();
                    self.timeline_state.set_viewport(viewport);
                }
                AppEvent::ZoomReset => {
                    let viewport = self.timeline_state.viewport.zoom_reset();
                    self.timeline_state.set_viewport(viewport);
                }
                AppEvent::OpenAnnotationDialog => {
                    // Pause-on-annotate is app policy, not a clock behavior
                    self.playback.pause(&mut self.media, now);
                    self.annotation_dialog.open_at(self.playback.current_time(now));
                }
                AppEvent::AddAnnotation(annotation) => {
                    self.session.annotations.add(annotation);
                }
                AppEvent::DeleteAnnotation(id) => {
                    if !self.session.annotations.remove(id) {
                        warn!("Annotation {id} already gone");
                    }
                }
                AppEvent::SaveAnnotations => self.save_annotations(),
                AppEvent::ExportAnnotations(format) => self.export_annotations(format),
                AppEvent::OpenSession(path) => self.load_session(path, now),
                AppEvent::OpenSessionDialog => {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Session document", &["json"])
                        .pick_file()
                    {
                        self.load_session(path, now);
                    }
                }
                AppEvent::OpenDemoSession => self.install_session(loader::demo_session(), now),
            }
        }
    }

    /// Write dirty annotations after the debounce window.
    fn autosave(&mut self, now: Instant) {
        let Some(path) = self.session.annotation_path() else {
            return;
        };
        if self
            .session
            .annotations
            .dirty_for(now)
            .is_some_and(|d| d >= AUTOSAVE_DELAY)
        {
            match loader::save_annotations(&path, &self.session.annotations) {
                Ok(()) => self.session.annotations.clear_dirty(),
                Err(e) => {
                    // Keep dirty; the next frame retries after the debounce
                    warn!("Auto-save failed: {e:#}");
                }
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // Don't steal keys from text fields or the annotation dialog
        if ctx.wants_keyboard_input() || self.annotation_dialog.is_open() {
            return;
        }
        let sender = self.event_bus.sender();
        ctx.input_mut(|input| {
            let none = egui::Modifiers::NONE;
            if input.consume_key(none, egui::Key::Space) {
                sender.emit(AppEvent::TogglePlayPause);
            }
            if input.consume_key(none, egui::Key::M) {
                sender.emit(AppEvent::OpenAnnotationDialog);
            }
            if input.consume_key(none, egui::Key::ArrowLeft) {
                sender.emit(AppEvent::StepBy(-5.0));
            }
            if input.consume_key(none, egui::Key::ArrowRight) {
                sender.emit(AppEvent::StepBy(5.0));
            }
            if input.consume_key(none, egui::Key::Home) {
                sender.emit(AppEvent::JumpToStart);
            }
            if input.consume_key(none, egui::Key::End) {
                sender.emit(AppEvent::JumpToEnd);
            }
            if input.consume_key(none, egui::Key::Plus) || input.consume_key(none, egui::Key::Equals) {
                sender.emit(AppEvent::ZoomIn);
            }
            if input.consume_key(none, egui::Key::Minus) {
                sender.emit(AppEvent::ZoomOut);
            }
            if input.consume_key(none, egui::Key::Num0) {
                sender.emit(AppEvent::ZoomReset);
            }
            if input.consume_key(none, egui::Key::F1) {
                self.show_help = !self.show_help;
            }
        });
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let sender = self.event_bus.sender();
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Session…").clicked() {
                        sender.emit(AppEvent::OpenSessionDialog);
                        ui.close();
                    }
                    if ui.button("Open Demo Session").clicked() {
                        sender.emit(AppEvent::OpenDemoSession);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Save Annotations").clicked() {
                        sender.emit(AppEvent::SaveAnnotations);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Settings…").clicked() {
                        self.show_settings = true;
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("Keyboard Shortcuts (F1)").clicked() {
                        self.show_help = true;
                        ui.close();
                    }
                });
            });
        });
    }

    /// Pick up settings changes that configure runtime components.
    fn apply_settings(&mut self, ctx: &egui::Context) {
        if self.settings.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
        let mut style = (*ctx.style()).clone();
        for (_, font_id) in style.text_styles.iter_mut() {
            font_id.size = self.settings.font_size;
        }
        ctx.set_style(style);

        let desired = (self.settings.drift_interval_ms, self.settings.drift_tolerance_s);
        if desired != self.applied_drift {
            self.playback
                .configure_drift(self.settings.drift_interval(), self.settings.drift_tolerance_s);
            self.applied_drift = desired;
            info!(
                "Drift corrector reconfigured: {}ms / {:.2}s",
                desired.0, desired.1
            );
        }

        if (self.settings.base_pixels_per_second
            - self.timeline_state.viewport.base_pixels_per_second)
            .abs()
            > f32::EPSILON
        {
            let viewport = ViewportState {
                base_pixels_per_second: self.settings.base_pixels_per_second,
                ..self.timeline_state.viewport
            };
            self.timeline_state.set_viewport(viewport);
        }
    }
}

struct DockTabs<'a> {
    app: &'a mut DebriefApp,
    now: Instant,
}

impl TabViewer for DockTabs<'_> {
    type Tab = DockTab;

    fn title(&mut self, tab: &mut DockTab) -> egui::WidgetText {
        match tab {
            DockTab::Video => "Video".into(),
            DockTab::Timeline => "Timeline".into(),
            DockTab::Annotations => "Annotations".into(),
            DockTab::Session => "Session".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut DockTab) {
        let sender = self.app.event_bus.sender();
        match tab {
            DockTab::Video => widgets::render_video(
                ui,
                &self.app.session,
                &self.app.playback,
                &self.app.media,
                self.now,
                &sender,
            ),
            DockTab::Timeline => widgets::timeline::render_timeline(
                ui,
                &self.app.session,
                &mut self.app.timeline_state,
                &self.app.timeline_config,
                &self.app.playback,
                self.now,
                &sender,
            ),
            DockTab::Annotations => widgets::render_annotations(ui, &self.app.session, &sender),
            DockTab::Session => widgets::render_session_info(ui, &self.app.session),
        }
    }
}

impl eframe::App for DebriefApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // The simulated transport progresses like a real element would
        // between frames; real decoders tick themselves.
        self.media.tick(now);

        self.apply_events(now);
        self.playback.update(&mut self.media, now);

        if self.playback.is_playing() {
            // Drift runs on its own coarse cadence, rate-limited internally;
            // the frame loop only gives it a chance to fire.
            self.playback.poll_drift(&mut self.media, now);
            ctx.request_repaint_after(self.settings.tick_interval());
        }

        self.autosave(now);
        self.apply_settings(ctx);
        self.render_menu_bar(ctx);

        widgets::render_status_bar(
            ctx,
            &self.session,
            &self.playback,
            &self.timeline_state,
            self.error_msg.as_deref(),
            now,
        );

        egui::CentralPanel::default().show(ctx, |ui| {
            let dock_style = egui_dock::Style::from_egui(ctx.style().as_ref());
            let mut dock_state =
                std::mem::replace(&mut self.dock_state, DebriefApp::default_dock_state());
            {
                let mut tabs = DockTabs { app: self, now };
                DockArea::new(&mut dock_state)
                    .style(dock_style)
                    .show_inside(ui, &mut tabs);
            }
            self.dock_state = dock_state;
        });

        // Process keyboard input after panels updated hover/focus state
        self.handle_keyboard(ctx);

        let sender = self.event_bus.sender();
        self.annotation_dialog.render(ctx, &sender);
        if self.show_settings {
            render_settings_window(ctx, &mut self.show_settings, &mut self.settings);
        }
        if self.show_help {
            help::render_help_window(ctx, &mut self.show_help);
        }

        // Drag-and-drop of session documents
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            if config::is_session_document(&path) {
                info!("Session document dropped: {}", path.display());
                self.load_session(path, now);
            } else {
                warn!("Ignoring dropped file {}", path.display());
            }
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            storage.set_string(eframe::APP_KEY, json);
            debug!("App state saved");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();

    // Create path configuration from CLI args and environment
    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file("debrief.log", &path_config));

        let file = std::fs::File::create(&log_path)?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }

    info!("Debrief session player starting...");
    debug!("Command-line args: {:?}", args);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "Debrief v{} • F1 for help",
                env!("CARGO_PKG_VERSION")
            ))
            .with_resizable(true)
            .with_drag_and_drop(true),
        persist_window: true,
        persistence_path: Some(config::config_file("debrief.json", &path_config)),
        ..Default::default()
    };

    let path_config_for_app = path_config.clone();
    eframe::run_native(
        "Debrief",
        native_options,
        Box::new(move |cc| {
            // Load persisted app state if available, otherwise create default
            let mut app: DebriefApp = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted state found, creating default app");
                    DebriefApp::default()
                });
            app.path_config = path_config_for_app;

            let now = Instant::now();

            // Session selection: CLI file > --demo > optional last session
            if let Some(path) = &args.session {
                app.load_session(path.clone(), now);
            } else if args.demo {
                app.install_session(loader::demo_session(), now);
            } else if app.settings.reopen_last_session {
                if let Some(path) = app.settings.last_session.clone() {
                    app.load_session(path, now);
                }
            }

            if let Some(speed) = args.speed {
                app.playback.set_speed(speed, &mut app.media, now);
            }
            if let Some(seek) = args.seek {
                app.playback.seek(seek, &mut app.media, now);
            }
            if args.autoplay {
                app.playback.play(&mut app.media, now);
            }

            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}

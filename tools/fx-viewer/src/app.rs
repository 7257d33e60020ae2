//! Viewer application with egui UI.

use std::time::{Duration, Instant};

use backdrop_fx::{
    EffectHost, EffectsConfig, FrameClock, FrameOutcome, GridRenderer, HostStats, InputEvent,
    PixelCanvas, PointerCapabilities, Rgb, TrailRenderer, Viewport,
};
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::frame_stats::FrameStats;
use crate::renderer::{self, CanvasLayer};
use crate::settings::{Backdrop, EffectMode, ViewerSettings};

/// Target frame interval while the effects animate.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct ViewerApp {
    settings: ViewerSettings,
    config: EffectsConfig,
    seed: Option<u64>,
    clock: FrameClock,

    trail: Option<EffectHost<TrailRenderer, PixelCanvas>>,
    grid: Option<EffectHost<GridRenderer, PixelCanvas>>,
    /// The trail was refused at the last mount (coarse pointer).
    trail_refused: bool,

    grid_layer: CanvasLayer,
    trail_layer: CanvasLayer,

    /// Canvas size last delivered to the hosts.
    viewport: Viewport,
    pointer_inside: bool,
    /// Text field contents for the accent color.
    accent_input: String,
    accent_error: Option<String>,

    frame_stats: FrameStats,
}

impl ViewerApp {
    pub fn new(settings: ViewerSettings, config: EffectsConfig, seed: Option<u64>) -> Self {
        let accent_input = config.theme.accent_color().to_string();
        let mut app = Self {
            settings,
            config,
            seed,
            clock: FrameClock::start(),
            trail: None,
            grid: None,
            trail_refused: false,
            grid_layer: CanvasLayer::new("grid"),
            trail_layer: CanvasLayer::new("trail"),
            viewport: Viewport::default(),
            pointer_inside: false,
            accent_input,
            accent_error: None,
            frame_stats: FrameStats::new(),
        };
        app.mount_effects();
        app
    }

    fn capabilities(&self) -> PointerCapabilities {
        if self.settings.coarse_pointer {
            PointerCapabilities::touch()
        } else {
            PointerCapabilities::fine()
        }
    }

    /// Tear down whatever is mounted and mount the effects for the current mode.
    fn mount_effects(&mut self) {
        self.unmount_effects();

        let caps = self.capabilities();
        let accent = self.config.theme.accent_color();
        let pulse = self.config.theme.pulse_color();
        let mode = self.settings.effect_mode;

        if mode.has_grid() {
            let grid = match self.seed {
                Some(seed) => GridRenderer::with_rng(
                    self.config.grid.clone(),
                    accent,
                    pulse,
                    StdRng::seed_from_u64(seed),
                ),
                None => GridRenderer::new(self.config.grid.clone(), accent, pulse),
            };
            let canvas = PixelCanvas::new(self.viewport.width, self.viewport.height);
            self.grid = EffectHost::mount_with_surface(grid, caps, canvas);
        }

        if mode.has_trail() {
            let trail = match self.seed {
                Some(seed) => TrailRenderer::with_rng(
                    self.config.trail.clone(),
                    accent,
                    &mut StdRng::seed_from_u64(seed.wrapping_add(1)),
                ),
                None => TrailRenderer::new(self.config.trail.clone(), accent),
            };
            let canvas = PixelCanvas::new(self.viewport.width, self.viewport.height);
            self.trail = EffectHost::mount_with_surface(trail, caps, canvas);
            self.trail_refused = self.trail.is_none();
        }

        log::info!(
            "Mounted {} (grid: {}, trail: {})",
            mode.label(),
            self.grid.is_some(),
            self.trail.is_some()
        );
    }

    fn unmount_effects(&mut self) {
        if let Some(mut host) = self.trail.take() {
            host.unmount();
        }
        if let Some(mut host) = self.grid.take() {
            host.unmount();
        }
        self.trail_refused = false;
        self.grid_layer.release();
        self.trail_layer.release();
        self.pointer_inside = false;
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Some(host) = &mut self.grid {
            host.handle_event(&event);
        }
        if let Some(host) = &mut self.trail {
            host.handle_event(&event);
        }
    }

    fn apply_accent(&mut self) {
        let token = self.accent_input.trim().to_string();
        match token.parse::<Rgb>() {
            Ok(color) => {
                self.accent_error = None;
                self.config.theme.accent = Some(color.to_string());
                self.dispatch(InputEvent::ThemeChanged(token));
            }
            Err(e) => {
                log::warn!("Ignoring accent color: {}", e);
                self.accent_error = Some(e.to_string());
            }
        }
    }

    /// Resize the canvases to match the panel, in canvas pixels.
    fn sync_viewport(&mut self, rect: egui::Rect) {
        let scale = self.settings.scale.max(1) as f32;
        let viewport = Viewport::new(
            (rect.width() / scale).round().max(0.0) as u32,
            (rect.height() / scale).round().max(0.0) as u32,
        );
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dispatch(InputEvent::Resize(viewport));
        }
    }

    /// Forward hover state as pointer move/leave events.
    fn sync_pointer(&mut self, response: &egui::Response, rect: egui::Rect) {
        match response.hover_pos() {
            Some(pos) => {
                self.pointer_inside = true;
                let p = renderer::screen_to_canvas(pos, rect, self.settings.scale);
                self.dispatch(InputEvent::PointerMove(p));
            }
            None if self.pointer_inside => {
                self.pointer_inside = false;
                self.dispatch(InputEvent::PointerLeave);
            }
            None => {}
        }
    }

    fn tick(&mut self, ctx: &egui::Context) {
        let now = self.clock.now();
        if let Some(host) = &mut self.grid {
            if host.tick(now) == FrameOutcome::Drawn {
                if let Some(canvas) = host.surface() {
                    self.grid_layer.upload(ctx, canvas);
                }
            }
        }
        if let Some(host) = &mut self.trail {
            if host.tick(now) == FrameOutcome::Drawn {
                if let Some(canvas) = host.surface() {
                    self.trail_layer.upload(ctx, canvas);
                }
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Effects");
        ui.add_space(4.0);

        let previous_mode = self.settings.effect_mode;
        egui::ComboBox::from_id_salt("effect_mode")
            .selected_text(self.settings.effect_mode.label())
            .show_ui(ui, |ui| {
                for mode in EffectMode::ALL {
                    ui.selectable_value(&mut self.settings.effect_mode, mode, mode.label());
                }
            });

        let previous_coarse = self.settings.coarse_pointer;
        ui.checkbox(&mut self.settings.coarse_pointer, "Touch device")
            .on_hover_text("Mount as if the primary pointer were a finger");

        if previous_mode != self.settings.effect_mode
            || previous_coarse != self.settings.coarse_pointer
        {
            self.mount_effects();
        }

        if ui.button("Remount").clicked() {
            self.mount_effects();
        }

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Theme");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Accent:");
            let response = ui.add(egui::TextEdit::singleline(&mut self.accent_input).desired_width(80.0));
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Apply").clicked() {
                self.apply_accent();
            }
        });
        if let Some(err) = &self.accent_error {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }

        ui.horizontal(|ui| {
            ui.label("Page:");
            egui::ComboBox::from_id_salt("backdrop")
                .selected_text(self.settings.backdrop.label())
                .show_ui(ui, |ui| {
                    for backdrop in [Backdrop::Dark, Backdrop::Light] {
                        ui.selectable_value(&mut self.settings.backdrop, backdrop, backdrop.label());
                    }
                });
        });

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Playback");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Downscale:");
            ui.add(egui::DragValue::new(&mut self.settings.scale).speed(0.05).range(1..=4));
        })
        .response
        .on_hover_text("Rasterize at 1/N resolution");

        ui.checkbox(&mut self.settings.paused, "Paused");
        ui.checkbox(&mut self.settings.show_stats, "Show stats");
    }

    fn stats_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let fps = match self.frame_stats.fps() {
                Some(fps) => format!("{:.1}", fps),
                None => "--".to_string(),
            };
            ui.label(format!("FPS: {}", fps));
            ui.separator();
            ui.label(format!("Canvas: {}x{}", self.viewport.width, self.viewport.height));

            if let Some(host) = &self.grid {
                ui.separator();
                ui.label(format!("Pulses: {}", host.effect().pulses().len()));
                ui.label(stats_label("grid", host.stats()));
            }
            match &self.trail {
                Some(host) => {
                    ui.separator();
                    ui.label(format!("Trail: {} pts", host.effect().len()));
                    ui.label(stats_label("trail", host.stats()));
                }
                None if self.trail_refused => {
                    ui.separator();
                    ui.label("Trail: off (coarse pointer)");
                }
                None => {}
            }
        });
    }
}

fn stats_label(name: &str, stats: HostStats) -> String {
    format!(
        "({} drawn {}, skipped {})",
        name, stats.frames_drawn, stats.frames_skipped
    )
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame_stats.record(Instant::now());

        egui::SidePanel::left("controls")
            .default_width(180.0)
            .show(ctx, |ui| self.controls(ui));

        if self.settings.show_stats {
            egui::TopBottomPanel::bottom("stats").show(ctx, |ui| self.stats_bar(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let available_size = ui.available_size();
                let (response, painter) = ui.allocate_painter(available_size, egui::Sense::hover());
                let rect = response.rect;

                self.sync_viewport(rect);
                self.sync_pointer(&response, rect);
                if !self.settings.paused {
                    self.tick(ctx);
                }

                painter.rect_filled(rect, 0.0, self.settings.backdrop.color());
                self.grid_layer.paint(&painter, rect);
                self.trail_layer.paint(&painter, rect);
            });

        if !self.settings.paused {
            ctx.request_repaint_after(FRAME_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.unmount_effects();
    }
}

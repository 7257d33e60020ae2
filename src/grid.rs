//! Perspective grid backdrop renderer.
//!
//! Draws a pseudo-3D floor grid converging on a vanishing point that follows
//! the pointer horizontally. Layers, back to front:
//!
//! - column lines, bent near the pointer by a traveling sine warp
//! - row lines, spaced by a power law so they bunch up at the horizon
//! - energy pulses sliding from the horizon toward the viewer
//! - a soft glow under the pointer
//! - a faint horizon band

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::config::GridConfig;
use crate::host::Effect;
use crate::surface::{ColorStop, LinearGradient, Paint, Path, RadialGradient, Surface};
use crate::types::{FrameInstant, InputEvent, Point2, Viewport};

/// A highlight traveling down one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub column: usize,
    /// 0 at the horizon, 1 at the bottom edge.
    pub progress: f32,
    /// Progress added per frame.
    pub speed: f32,
}

impl Pulse {
    pub fn new(column: usize, speed: f32) -> Self {
        Self {
            column,
            progress: 0.0,
            speed,
        }
    }

    /// Advance one frame. Returns false once the pulse reached the viewer.
    pub fn advance(&mut self) -> bool {
        self.progress += self.speed;
        self.progress < 1.0
    }
}

/// Per-frame grid layout. Derived from the viewport and pointer, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub width: f32,
    pub height: f32,
    pub vanishing_point: Point2,
    columns: usize,
    spread: f32,
}

impl GridGeometry {
    /// Lay out the grid for a viewport and a pointer normalized to 0-1.
    pub fn compute(viewport: Viewport, pointer: Point2, config: &GridConfig) -> Self {
        let width = viewport.width as f32;
        let height = viewport.height as f32;
        let vanishing_point = Point2::new(
            width * 0.5 + (pointer.x - 0.5) * width * config.pointer_follow,
            height * config.horizon,
        );
        Self {
            width,
            height,
            vanishing_point,
            columns: config.columns,
            spread: config.spread,
        }
    }

    /// Screen x of column `col` at height `y`.
    ///
    /// The grid widens linearly with distance below the horizon, reaching
    /// `spread * width` at the bottom edge.
    pub fn column_x(&self, col: usize, y: f32) -> f32 {
        let depth = self.height - self.vanishing_point.y;
        let frac = if depth > 0.0 {
            (y - self.vanishing_point.y) / depth
        } else {
            0.0
        };
        let spread = self.width * self.spread * frac;
        let step = spread / (self.columns.max(2) - 1) as f32;
        self.vanishing_point.x - spread / 2.0 + col as f32 * step
    }

    /// Screen y at fraction `frac` of the way from the horizon to the bottom.
    pub fn depth_y(&self, frac: f32) -> f32 {
        self.vanishing_point.y + (self.height - self.vanishing_point.y) * frac
    }
}

/// Perspective grid effect state.
pub struct GridRenderer {
    config: GridConfig,
    rng: StdRng,
    viewport: Viewport,
    /// Pointer normalized to the viewport.
    pointer: Point2,
    pointer_on_surface: bool,
    time: f32,
    pulses: Vec<Pulse>,
    grid_color: Rgb,
    pulse_color: Rgb,
}

impl GridRenderer {
    pub fn new(config: GridConfig, grid_color: Rgb, pulse_color: Rgb) -> Self {
        Self::with_rng(config, grid_color, pulse_color, StdRng::from_entropy())
    }

    /// Create a renderer whose pulse spawning is driven by `rng`.
    ///
    /// An invalid config is corrected with [`GridConfig::sanitized`] and
    /// logged; the renderer never refuses to build.
    pub fn with_rng(config: GridConfig, grid_color: Rgb, pulse_color: Rgb, rng: StdRng) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}, correcting grid config", e);
                config.sanitized()
            }
        };
        Self {
            config,
            rng,
            viewport: Viewport::default(),
            pointer: Point2::new(0.5, 0.5),
            pointer_on_surface: true,
            time: 0.0,
            pulses: Vec::new(),
            grid_color,
            pulse_color,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Normalized pointer position.
    pub fn pointer(&self) -> Point2 {
        self.pointer
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn grid_color(&self) -> Rgb {
        self.grid_color
    }

    pub fn set_colors(&mut self, grid_color: Rgb, pulse_color: Rgb) {
        self.grid_color = grid_color;
        self.pulse_color = pulse_color;
    }

    /// Layout for the current viewport and pointer.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::compute(self.viewport, self.pointer, &self.config)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Pointer moved to a surface position (pixels).
    pub fn pointer_move(&mut self, p: Point2) {
        self.pointer = self.viewport.normalize(p);
        self.pointer_on_surface = true;
    }

    /// The vanishing point keeps its last offset; only the glow goes away.
    pub fn pointer_leave(&mut self) {
        self.pointer_on_surface = false;
    }

    /// Start a pulse at the horizon of `column`.
    pub fn spawn_pulse_at(&mut self, column: usize, speed: f32) {
        self.pulses.push(Pulse::new(column.min(self.config.columns.saturating_sub(1)), speed));
    }

    /// Start a pulse on a uniformly chosen column.
    pub fn spawn_pulse(&mut self) {
        let column = self.rng.gen_range(0..self.config.columns);
        let (lo, hi) = (self.config.pulse_speed_min, self.config.pulse_speed_max);
        let speed = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
        self.pulses.push(Pulse::new(column, speed));
    }

    /// Advance every pulse one frame and drop the finished ones.
    pub fn step_pulses(&mut self) {
        self.pulses.retain_mut(Pulse::advance);
    }

    /// Advance the simulation by one frame: time and pulses.
    pub fn advance(&mut self) {
        self.time += self.config.time_step;
        self.step_pulses();
    }

    /// Roll for a new pulse. Runs after drawing, so a new pulse is first
    /// drawn on the next frame at `progress == speed`.
    pub fn maybe_spawn(&mut self) -> bool {
        let spawn = self.rng.gen::<f32>() < self.config.spawn_probability;
        if spawn {
            self.spawn_pulse();
        }
        spawn
    }

    /// Clear the surface and draw every layer.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();
        let geo = self.geometry();
        self.draw_columns(&geo, surface);
        self.draw_rows(&geo, surface);
        self.draw_pulses(&geo, surface);
        if self.pointer_on_surface {
            self.draw_glow(&geo, surface);
        }
        self.draw_horizon(&geo, surface);
    }

    fn draw_columns(&self, geo: &GridGeometry, surface: &mut dyn Surface) {
        let t = self.time;
        let vp = geo.vanishing_point;
        let (w, h) = (geo.width, geo.height);
        let mouse_x = self.pointer.x * w;
        // No warp while the pointer is up near the horizon.
        let warp_gate = ((self.pointer.y - 0.3) / 0.7).max(0.0);

        for c in 0..self.config.columns {
            let x_bottom = geo.column_x(c, h);
            let dist = (x_bottom - mouse_x).abs() / w;
            let warp = (dist * 12.0 - t * 3.0).sin()
                * self.config.warp_amplitude
                * (1.0 - dist * 2.5).max(0.0)
                * warp_gate;
            let x_warped = x_bottom + warp;

            let base = 0.12 + 0.05 * (t * 1.5 + c as f32 * 0.4).sin();
            let paint = Paint::Linear(LinearGradient {
                from: vp,
                to: Point2::new(x_warped, h),
                stops: vec![
                    ColorStop::new(0.0, self.grid_color.with_alpha(0.0)),
                    ColorStop::new(0.3, self.grid_color.with_alpha(base)),
                    ColorStop::new(1.0, self.grid_color.with_alpha(base * 1.6)),
                ],
            });
            let path = Path::Quadratic {
                from: vp,
                control: Point2::new((vp.x + x_warped) * 0.5, vp.y + (h - vp.y) * 0.5 + warp * 0.4),
                to: Point2::new(x_warped, h),
            };
            surface.stroke_path(&path, 0.8 + (1.0 - dist) * 0.4, &paint);
        }
    }

    fn draw_rows(&self, geo: &GridGeometry, surface: &mut dyn Surface) {
        let rows = self.config.rows;
        let last_col = self.config.columns - 1;
        for r in 1..=rows {
            let frac = (r as f32 / rows as f32).powf(self.config.row_exponent);
            let y = geo.depth_y(frac);
            let x_left = geo.column_x(0, y);
            let x_right = geo.column_x(last_col, y);

            let alpha = 0.06 + 0.04 * (self.time * 2.0 - r as f32 * 0.5).sin();
            let paint = Paint::Linear(LinearGradient {
                from: Point2::new(x_left, y),
                to: Point2::new(x_right, y),
                stops: vec![
                    ColorStop::new(0.0, self.grid_color.with_alpha(0.0)),
                    ColorStop::new(0.15, self.grid_color.with_alpha(alpha)),
                    ColorStop::new(0.85, self.grid_color.with_alpha(alpha)),
                    ColorStop::new(1.0, self.grid_color.with_alpha(0.0)),
                ],
            });
            let path = Path::Line {
                from: Point2::new(x_left, y),
                to: Point2::new(x_right, y),
            };
            surface.stroke_path(&path, 0.7, &paint);
        }
    }

    fn draw_pulses(&self, geo: &GridGeometry, surface: &mut dyn Surface) {
        for pulse in &self.pulses {
            let y = geo.depth_y(pulse.progress.powf(self.config.pulse_exponent));
            let center = Point2::new(geo.column_x(pulse.column, y), y);
            let alpha = (1.0 - pulse.progress) * 0.85;
            let radius = (2.5 + pulse.progress * 3.0) * 3.0;

            let paint = Paint::Radial(RadialGradient {
                center,
                radius,
                stops: vec![
                    ColorStop::new(0.0, Rgb::WHITE.with_alpha(alpha)),
                    ColorStop::new(0.4, self.pulse_color.with_alpha(alpha * 0.7)),
                    ColorStop::new(1.0, self.pulse_color.with_alpha(0.0)),
                ],
            });
            surface.fill_circle(center, radius, &paint);
        }
    }

    fn draw_glow(&self, geo: &GridGeometry, surface: &mut dyn Surface) {
        let center = Point2::new(self.pointer.x * geo.width, self.pointer.y * geo.height);
        let radius = self.config.glow_radius;
        let paint = Paint::Radial(RadialGradient {
            center,
            radius,
            stops: vec![
                ColorStop::new(0.0, self.grid_color.with_alpha(0.12)),
                ColorStop::new(0.5, self.grid_color.with_alpha(0.04)),
                ColorStop::new(1.0, self.grid_color.with_alpha(0.0)),
            ],
        });
        surface.fill_circle(center, radius, &paint);
    }

    fn draw_horizon(&self, geo: &GridGeometry, surface: &mut dyn Surface) {
        let y = geo.vanishing_point.y;
        let band = self.config.horizon_band;
        let paint = Paint::Linear(LinearGradient {
            from: Point2::new(0.0, y - band),
            to: Point2::new(0.0, y + band),
            stops: vec![
                ColorStop::new(0.0, self.grid_color.with_alpha(0.0)),
                ColorStop::new(0.5, self.grid_color.with_alpha(0.18)),
                ColorStop::new(1.0, self.grid_color.with_alpha(0.0)),
            ],
        });
        let path = Path::Line {
            from: Point2::new(0.0, y),
            to: Point2::new(geo.width, y),
        };
        surface.stroke_path(&path, 1.0, &paint);
    }
}

impl Effect for GridRenderer {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMove(p) => self.pointer_move(*p),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Resize(viewport) => self.resize(*viewport),
            InputEvent::ThemeChanged(token) => {
                self.grid_color = Rgb::resolve(Some(token.as_str()), Rgb::DEFAULT_ACCENT);
            }
        }
    }

    fn render(&mut self, _now: FrameInstant, surface: &mut dyn Surface) {
        // The surface is authoritative for size if a resize raced the frame.
        let size = surface.size();
        if size != self.viewport {
            self.viewport = size;
        }
        self.advance();
        self.draw(surface);
        self.maybe_spawn();
    }
}

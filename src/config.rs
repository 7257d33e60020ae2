//! Tuning and theme configuration for the effects.
//!
//! Defaults reproduce the stock look. With the `serde` feature enabled,
//! [`EffectsConfig`] can be loaded from JSON; missing fields keep their
//! defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Trail particle renderer tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrailConfig {
    /// Maximum number of live trail points.
    pub capacity: usize,
    /// Lifetime of a trail point in milliseconds.
    pub fade_ms: u64,
    /// Radius of each micro-dot in pixels.
    pub dot_radius: f32,
    /// Scatter radius of the dot cluster at the head of the trail.
    pub head_spread: f32,
    /// Per-frame interpolation factor of the smoothed pointer.
    pub lerp: f32,
    /// Squared distance the smoothed pointer must move before a new point is recorded.
    pub min_dist_sq: f32,
    /// Micro-dots drawn around each trail point.
    pub dots_per_point: usize,
    /// Points fainter than this are not drawn.
    pub min_alpha: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 90,
            fade_ms: 650,
            dot_radius: 0.9,
            head_spread: 12.0,
            lerp: 0.13,
            min_dist_sq: 2.0,
            dots_per_point: 10,
            min_alpha: 0.015,
        }
    }
}

impl TrailConfig {
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::invalid_config("trail capacity must be at least 1"));
        }
        if self.fade_ms == 0 {
            return Err(Error::invalid_config("trail fade_ms must be positive"));
        }
        if self.dots_per_point == 0 {
            return Err(Error::invalid_config("trail dots_per_point must be at least 1"));
        }
        if !(self.lerp > 0.0 && self.lerp <= 1.0) {
            return Err(Error::invalid_config(format!(
                "trail lerp must be in (0, 1], got {}",
                self.lerp
            )));
        }
        if !(self.min_dist_sq >= 0.0) || !(self.dot_radius > 0.0) || !(self.head_spread >= 0.0) {
            return Err(Error::invalid_config(
                "trail min_dist_sq, dot_radius and head_spread must be non-negative",
            ));
        }
        Ok(())
    }

    /// Replace every value `validate` rejects with a usable one. Counts are
    /// raised to their minimum, the rest fall back to the stock defaults.
    pub fn sanitized(self) -> Self {
        let stock = Self::default();
        Self {
            capacity: self.capacity.max(1),
            fade_ms: self.fade_ms.max(1),
            dots_per_point: self.dots_per_point.max(1),
            lerp: if self.lerp > 0.0 && self.lerp <= 1.0 {
                self.lerp
            } else {
                stock.lerp
            },
            min_dist_sq: if self.min_dist_sq >= 0.0 {
                self.min_dist_sq
            } else {
                stock.min_dist_sq
            },
            dot_radius: if self.dot_radius > 0.0 {
                self.dot_radius
            } else {
                stock.dot_radius
            },
            head_spread: if self.head_spread >= 0.0 {
                self.head_spread
            } else {
                stock.head_spread
            },
            min_alpha: self.min_alpha,
        }
    }
}

/// Perspective grid renderer tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Converging column lines.
    pub columns: usize,
    /// Horizontal row lines.
    pub rows: usize,
    /// Vanishing point height as a fraction of the viewport height.
    pub horizon: f32,
    /// How far the vanishing point follows the pointer horizontally (fraction of width).
    pub pointer_follow: f32,
    /// Width of the grid at the bottom edge as a fraction of the viewport width.
    pub spread: f32,
    /// Power-law exponent of row spacing; larger compresses rows toward the horizon.
    pub row_exponent: f32,
    /// Power-law exponent of pulse travel.
    pub pulse_exponent: f32,
    /// Time accumulator increment per frame.
    pub time_step: f32,
    /// Peak sideways displacement of a warped column in pixels.
    pub warp_amplitude: f32,
    /// Probability of spawning a pulse on any frame.
    pub spawn_probability: f32,
    pub pulse_speed_min: f32,
    pub pulse_speed_max: f32,
    /// Radius of the pointer glow in pixels.
    pub glow_radius: f32,
    /// Half-height of the horizon fade band in pixels.
    pub horizon_band: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 14,
            rows: 10,
            horizon: 0.38,
            pointer_follow: 0.15,
            spread: 0.9,
            row_exponent: 1.8,
            pulse_exponent: 0.6,
            time_step: 0.008,
            warp_amplitude: 18.0,
            spawn_probability: 0.04,
            pulse_speed_min: 0.003,
            pulse_speed_max: 0.007,
            glow_radius: 120.0,
            horizon_band: 8.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.columns < 2 {
            return Err(Error::invalid_config("grid needs at least 2 columns"));
        }
        if self.rows == 0 {
            return Err(Error::invalid_config("grid needs at least 1 row"));
        }
        if !(0.0..1.0).contains(&self.horizon) {
            return Err(Error::invalid_config(format!(
                "grid horizon must be in [0, 1), got {}",
                self.horizon
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(Error::invalid_config("grid spawn_probability must be in [0, 1]"));
        }
        if !(self.pulse_speed_min > 0.0) || self.pulse_speed_max < self.pulse_speed_min {
            return Err(Error::invalid_config(format!(
                "grid pulse speed range {}..{} is invalid",
                self.pulse_speed_min, self.pulse_speed_max
            )));
        }
        if !(self.row_exponent > 0.0) || !(self.pulse_exponent > 0.0) {
            return Err(Error::invalid_config("grid exponents must be positive"));
        }
        Ok(())
    }

    /// Replace every value `validate` rejects with a usable one. Counts are
    /// raised to their minimum, the rest fall back to the stock defaults.
    pub fn sanitized(self) -> Self {
        let stock = Self::default();
        let pulse_speed_min = if self.pulse_speed_min > 0.0 {
            self.pulse_speed_min
        } else {
            stock.pulse_speed_min
        };
        let pulse_speed_max = if self.pulse_speed_max >= pulse_speed_min {
            self.pulse_speed_max
        } else {
            pulse_speed_min
        };
        Self {
            columns: self.columns.max(2),
            rows: self.rows.max(1),
            horizon: if (0.0..1.0).contains(&self.horizon) {
                self.horizon
            } else {
                stock.horizon
            },
            spawn_probability: if self.spawn_probability.is_nan() {
                stock.spawn_probability
            } else {
                self.spawn_probability.clamp(0.0, 1.0)
            },
            pulse_speed_min,
            pulse_speed_max,
            row_exponent: if self.row_exponent > 0.0 {
                self.row_exponent
            } else {
                stock.row_exponent
            },
            pulse_exponent: if self.pulse_exponent > 0.0 {
                self.pulse_exponent
            } else {
                stock.pulse_exponent
            },
            ..self
        }
    }
}

/// Theme color tokens, as hex strings (`#rgb` or `#rrggbb`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThemeConfig {
    /// Accent color shared by the trail dots and grid lines.
    pub accent: Option<String>,
    /// Grid pulse color.
    pub pulse: Option<String>,
}

impl ThemeConfig {
    /// Accent color, falling back to cyan.
    pub fn accent_color(&self) -> Rgb {
        Rgb::resolve(self.accent.as_deref(), Rgb::DEFAULT_ACCENT)
    }

    /// Pulse color, falling back to magenta.
    pub fn pulse_color(&self) -> Rgb {
        Rgb::resolve(self.pulse.as_deref(), Rgb::DEFAULT_PULSE)
    }
}

/// Complete configuration for both effects.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectsConfig {
    pub trail: TrailConfig,
    pub grid: GridConfig,
    pub theme: ThemeConfig,
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<()> {
        self.trail.validate()?;
        self.grid.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EffectsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded effects config from {}", path.display());
        Ok(config)
    }
}

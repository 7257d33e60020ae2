//! Theme colors and hex token parsing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Cyan accent used when no theme token is available (`#06b6d4`).
    pub const DEFAULT_ACCENT: Rgb = Rgb::new(6, 182, 212);
    /// Magenta used for grid energy pulses.
    pub const DEFAULT_PULSE: Rgb = Rgb::new(220, 50, 200);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rgb` or `#rrggbb` token. The leading `#` is optional and
    /// surrounding whitespace is ignored.
    pub fn from_hex(token: &str) -> Result<Self> {
        let hex = token.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_color(token));
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(Error::invalid_color(token)),
        };

        let n = u32::from_str_radix(&expanded, 16).map_err(|_| Error::invalid_color(token))?;
        Ok(Rgb::new(
            ((n >> 16) & 0xff) as u8,
            ((n >> 8) & 0xff) as u8,
            (n & 0xff) as u8,
        ))
    }

    /// Resolve an optional theme token, falling back to `fallback` when the
    /// token is missing, empty or unparsable.
    pub fn resolve(token: Option<&str>, fallback: Rgb) -> Rgb {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => Rgb::from_hex(t).unwrap_or_else(|e| {
                log::debug!("{}, using fallback {}", e, fallback);
                fallback
            }),
            None => fallback,
        }
    }

    /// This color with the given alpha.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            r: self.r as f32 / 255.0,
            g: self.g as f32 / 255.0,
            b: self.b as f32 / 255.0,
            a: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::DEFAULT_ACCENT
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s)
    }
}

/// A color with straight (non-premultiplied) alpha, channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_long_form() {
        assert_eq!(Rgb::from_hex("#06b6d4").unwrap(), Rgb::DEFAULT_ACCENT);
        assert_eq!(Rgb::from_hex("DC32C8").unwrap(), Rgb::DEFAULT_PULSE);
    }

    #[test]
    fn test_expands_short_form() {
        assert_eq!(Rgb::from_hex("#0fa").unwrap(), Rgb::new(0x00, 0xff, 0xaa));
        assert_eq!(Rgb::from_hex("  #fff ").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_rejects_bad_tokens() {
        for token in ["", "#", "#12", "#12345", "#1234567", "#ggg", "rgb(1,2,3)", "#+12345"] {
            let err = Rgb::from_hex(token).unwrap_err();
            assert!(err.is_invalid_color(), "{:?} should be rejected", token);
        }
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(Rgb::resolve(None, Rgb::DEFAULT_ACCENT), Rgb::DEFAULT_ACCENT);
        assert_eq!(Rgb::resolve(Some("  "), Rgb::DEFAULT_ACCENT), Rgb::DEFAULT_ACCENT);
        assert_eq!(Rgb::resolve(Some("oops"), Rgb::WHITE), Rgb::WHITE);
        assert_eq!(Rgb::resolve(Some("#000"), Rgb::WHITE), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgb::new(1, 2, 254);
        assert_eq!(c.to_string(), "#0102fe");
        assert_eq!(c.to_string().parse::<Rgb>().unwrap(), c);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgb::WHITE.with_alpha(1.7).a, 1.0);
        assert_eq!(Rgb::WHITE.with_alpha(-0.2).a, 0.0);
    }
}

//! Shared geometry, timing and input types.
//!
//! Coordinates are surface pixels with the origin at the top-left corner,
//! x growing right and y growing down (the same convention as an HTML canvas).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A 2-D position or offset in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(&self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation from `self` toward `target` by `t`.
    pub fn lerp(&self, target: Point2, t: f32) -> Point2 {
        Point2 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Viewport size in CSS/surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Normalize a surface position against this viewport (0-1 on each axis).
    ///
    /// An empty viewport maps everything to the center.
    pub fn normalize(&self, p: Point2) -> Point2 {
        if self.is_empty() {
            return Point2::new(0.5, 0.5);
        }
        Point2::new(p.x / self.width as f32, p.y / self.height as f32)
    }
}

/// A point in frame time, measured in microseconds since the host mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameInstant(pub u64);

impl FrameInstant {
    /// Create a frame instant from whole milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1000))
    }

    /// Create a frame instant from a duration since mount.
    pub fn from_duration(d: Duration) -> Self {
        Self(d.as_micros().min(u64::MAX as u128) as u64)
    }

    /// Returns the microseconds since mount.
    pub fn micros(&self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self` (zero if `earlier` is later).
    pub fn saturating_since(&self, earlier: FrameInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for FrameInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl std::ops::Sub<Duration> for FrameInstant {
    type Output = Self;
    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_sub(rhs.as_micros() as u64))
    }
}

impl std::ops::AddAssign<Duration> for FrameInstant {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 = self.0.saturating_add(rhs.as_micros() as u64);
    }
}

/// Pointer capability checks reported by the host.
///
/// Each check is optional: `None` means the host could not run it. Unknown
/// checks never count as evidence of a coarse pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerCapabilities {
    /// Whether the environment exposes touch events.
    pub touch_events: Option<bool>,
    /// Maximum simultaneous touch points reported by the device.
    pub max_touch_points: Option<u32>,
    /// Whether the primary pointer is coarse (finger rather than mouse).
    pub coarse_pointer: Option<bool>,
}

impl PointerCapabilities {
    /// Capabilities of a desktop host with a mouse.
    pub fn fine() -> Self {
        Self {
            touch_events: Some(false),
            max_touch_points: Some(0),
            coarse_pointer: Some(false),
        }
    }

    /// Capabilities of a touch-first device.
    pub fn touch() -> Self {
        Self {
            touch_events: Some(true),
            max_touch_points: Some(5),
            coarse_pointer: Some(true),
        }
    }

    /// Returns true if any check reports a touch or coarse pointer.
    pub fn is_coarse(&self) -> bool {
        self.touch_events.unwrap_or(false)
            || self.max_touch_points.unwrap_or(0) > 0
            || self.coarse_pointer.unwrap_or(false)
    }
}

/// Input delivered by the host to a mounted effect.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to the given surface position.
    PointerMove(Point2),
    /// The pointer left the surface.
    PointerLeave,
    /// The viewport was resized.
    Resize(Viewport),
    /// The theme accent color changed to the given hex token.
    ThemeChanged(String),
}

/// What happened during one host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The effect advanced and redrew the surface.
    Drawn,
    /// No usable surface; the frame was skipped and will be retried.
    Skipped,
    /// The host was unmounted; nothing happened.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp_moves_fraction_of_gap() {
        let p = Point2::new(0.0, 10.0).lerp(Point2::new(100.0, 20.0), 0.13);
        assert!((p.x - 13.0).abs() < 1e-4);
        assert!((p.y - 11.3).abs() < 1e-4);
    }

    #[test]
    fn test_point_distance_sq() {
        assert_eq!(Point2::new(1.0, 1.0).distance_sq(Point2::new(4.0, 5.0)), 25.0);
    }

    #[test]
    fn test_viewport_normalize() {
        let vp = Viewport::new(1920, 1080);
        let n = vp.normalize(Point2::new(960.0, 270.0));
        assert_eq!(n, Point2::new(0.5, 0.25));
        assert_eq!(Viewport::default().normalize(Point2::new(3.0, 4.0)), Point2::new(0.5, 0.5));
    }

    #[test]
    fn test_frame_instant_arithmetic() {
        let t = FrameInstant::from_millis(650);
        assert_eq!(t.micros(), 650_000);
        let later = t + Duration::from_millis(10);
        assert_eq!(later.saturating_since(t), Duration::from_millis(10));
        assert_eq!(t.saturating_since(later), Duration::ZERO);
        assert_eq!(t - Duration::from_secs(5), FrameInstant(0));
    }

    #[test]
    fn test_capabilities_unknown_checks_are_not_coarse() {
        assert!(!PointerCapabilities::default().is_coarse());
        assert!(!PointerCapabilities::fine().is_coarse());
        assert!(PointerCapabilities::touch().is_coarse());

        let only_touch_points = PointerCapabilities {
            max_touch_points: Some(1),
            ..Default::default()
        };
        assert!(only_touch_points.is_coarse());
    }
}

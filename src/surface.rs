//! Drawing surface trait and paint types.
//!
//! This module provides the [`Surface`] trait that every render target must
//! implement. It is deliberately the small subset of a 2-D canvas context
//! that the effects need: clear, filled circles and stroked lines/curves,
//! painted with a solid color or a linear/radial gradient.

use crate::color::Rgba;
use crate::types::{Point2, Viewport};

// =============================================================================
// Paint
// =============================================================================

/// A gradient color stop. `offset` is in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Gradient along the segment `from -> to`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Point2,
    pub to: Point2,
    pub stops: Vec<ColorStop>,
}

/// Gradient radiating from `center`, reaching its last stop at `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

/// How a shape is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// Highest alpha this paint can produce. Lets surfaces skip invisible work.
    pub fn max_alpha(&self) -> f32 {
        let stops = match self {
            Paint::Solid(c) => return c.a,
            Paint::Linear(g) => &g.stops,
            Paint::Radial(g) => &g.stops,
        };
        stops.iter().map(|s| s.color.a).fold(0.0, f32::max)
    }
}

// =============================================================================
// Path
// =============================================================================

/// An open stroke path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Path {
    Line { from: Point2, to: Point2 },
    Quadratic { from: Point2, control: Point2, to: Point2 },
}

impl Path {
    /// Point at parameter `t` in 0.0-1.0.
    pub fn point_at(&self, t: f32) -> Point2 {
        match *self {
            Path::Line { from, to } => from.lerp(to, t),
            Path::Quadratic { from, control, to } => {
                let u = 1.0 - t;
                Point2::new(
                    u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
                    u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
                )
            }
        }
    }
}

// =============================================================================
// Surface Trait
// =============================================================================

/// A 2-D drawing target sized to the viewport.
///
/// Implementations must treat every call as infallible: out-of-bounds or
/// degenerate geometry is clipped or ignored, never an error.
pub trait Surface {
    /// Current pixel size.
    fn size(&self) -> Viewport;

    /// Resynchronize the pixel size to the viewport. Contents may be lost.
    fn resize(&mut self, viewport: Viewport);

    /// Whether a drawing context is available this frame.
    ///
    /// A host skips the frame (and retries on the next one) when this
    /// returns false.
    fn is_ready(&self) -> bool {
        !self.size().is_empty()
    }

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point2, radius: f32, paint: &Paint);

    /// Stroke an open path with the given line width.
    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Viewport {
        (**self).size()
    }

    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, paint: &Paint) {
        (**self).fill_circle(center, radius, paint)
    }

    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint) {
        (**self).stroke_path(path, width, paint)
    }
}

//! A surface that records draw calls instead of rasterizing them.
//!
//! Useful for asserting what an effect drew on a frame and for hosts that
//! replay the draw list onto their own canvas.

use crate::surface::{Paint, Path, Surface};
use crate::types::{Point2, Viewport};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle {
        center: Point2,
        radius: f32,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        width: f32,
        paint: Paint,
    },
}

/// Records the draw calls since the last `clear()`.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Viewport,
    ready: bool,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Viewport::new(width, height),
            ready: true,
            commands: Vec::new(),
        }
    }

    /// Simulate the drawing context appearing or going away.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Commands recorded since the last clear (the clear itself included).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Circles drawn since the last clear.
    pub fn circles(&self) -> impl Iterator<Item = (Point2, f32, &Paint)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillCircle {
                center,
                radius,
                paint,
            } => Some((*center, *radius, paint)),
            _ => None,
        })
    }

    /// Strokes drawn since the last clear.
    pub fn strokes(&self) -> impl Iterator<Item = (&Path, f32, &Paint)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::StrokePath { path, width, paint } => Some((path, *width, paint)),
            _ => None,
        })
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
    }

    fn is_ready(&self) -> bool {
        self.ready && !self.size.is_empty()
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint) {
        self.commands.push(DrawCommand::StrokePath {
            path: *path,
            width,
            paint: paint.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new(10, 10);
        let paint = Paint::Solid(Rgb::WHITE.with_alpha(1.0));
        surface.fill_circle(Point2::new(1.0, 1.0), 1.0, &paint);
        surface.clear();
        surface.fill_circle(Point2::new(2.0, 2.0), 1.0, &paint);

        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(surface.circles().next().unwrap().0, Point2::new(2.0, 2.0));
    }

    #[test]
    fn test_readiness() {
        let mut surface = RecordingSurface::new(10, 10);
        assert!(surface.is_ready());
        surface.set_ready(false);
        assert!(!surface.is_ready());
        surface.set_ready(true);
        surface.resize(Viewport::new(0, 10));
        assert!(!surface.is_ready());
    }
}

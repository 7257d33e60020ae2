//! Software rasterizer surface.
//!
//! [`PixelCanvas`] implements [`Surface`] on a `tiny_skia::Pixmap` so effects
//! can be rendered without a GPU or a browser. The crate's own [`Paint`] and
//! [`Path`] values are converted to tiny-skia shaders and paths at this
//! boundary. Hosts upload the premultiplied RGBA8 buffer from [`PixelCanvas::data`]
//! as a texture.

use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LinearGradient, Paint as SkiaPaint, PathBuilder,
    Pixmap, Point, RadialGradient, Shader, SpreadMode, Stroke, Transform,
};

use crate::color::Rgba;
use crate::surface::{ColorStop, Paint, Path, Surface};
use crate::types::{Point2, Viewport};

/// Premultiplied RGBA8 surface.
///
/// A zero-sized canvas holds no pixmap; every draw call on it is a no-op.
pub struct PixelCanvas {
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let pixmap = Pixmap::new(width, height);
        if pixmap.is_none() && width > 0 && height > 0 {
            log::warn!("Cannot allocate a {}x{} pixel canvas", width, height);
        }
        Self {
            pixmap,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// The backing pixmap, `None` while the canvas is empty.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Premultiplied RGBA8 bytes, row-major. Empty for an empty canvas.
    pub fn data(&self) -> &[u8] {
        match &self.pixmap {
            Some(pixmap) => pixmap.data(),
            None => &[],
        }
    }

    /// Premultiplied color (0.0-1.0) at a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        let px = pixmap.pixel(u32::try_from(x).ok()?, u32::try_from(y).ok()?)?;
        Some([px.red(), px.green(), px.blue(), px.alpha()].map(|c| c as f32 / 255.0))
    }

    /// Check if any pixel has visible alpha (sampling every 16th pixel).
    pub fn has_content(&self) -> bool {
        self.data().chunks_exact(4).step_by(16).any(|px| px[3] > 0)
    }
}

fn skia_point(p: Point2) -> Point {
    Point::from_xy(p.x, p.y)
}

fn skia_color(c: Rgba) -> Color {
    Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(Color::TRANSPARENT)
}

fn skia_stops(stops: &[ColorStop]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop::new(s.offset, skia_color(s.color)))
        .collect()
}

/// `None` when the gradient is degenerate (no stops, zero radius).
fn skia_paint(paint: &Paint) -> Option<SkiaPaint<'static>> {
    let shader = match paint {
        Paint::Solid(c) => Shader::SolidColor(skia_color(*c)),
        Paint::Linear(g) => LinearGradient::new(
            skia_point(g.from),
            skia_point(g.to),
            skia_stops(&g.stops),
            SpreadMode::Pad,
            Transform::identity(),
        )?,
        Paint::Radial(g) => RadialGradient::new(
            skia_point(g.center),
            skia_point(g.center),
            g.radius,
            skia_stops(&g.stops),
            SpreadMode::Pad,
            Transform::identity(),
        )?,
    };
    Some(SkiaPaint {
        shader,
        anti_alias: true,
        ..Default::default()
    })
}

fn skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    match *path {
        Path::Line { from, to } => {
            pb.move_to(from.x, from.y);
            pb.line_to(to.x, to.y);
        }
        Path::Quadratic { from, control, to } => {
            pb.move_to(from.x, from.y);
            pb.quad_to(control.x, control.y, to.x, to.y);
        }
    }
    pb.finish()
}

impl Surface for PixelCanvas {
    fn size(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.size() {
            return;
        }
        log::debug!("Resizing pixel canvas to {}x{}", viewport.width, viewport.height);
        *self = PixelCanvas::new(viewport.width, viewport.height);
    }

    fn is_ready(&self) -> bool {
        self.pixmap.is_some()
    }

    fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, paint: &Paint) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if radius <= 0.0 || paint.max_alpha() <= 0.0 {
            return;
        }
        let (Some(circle), Some(paint)) = (
            PathBuilder::from_circle(center.x, center.y, radius),
            skia_paint(paint),
        ) else {
            return;
        };
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if width <= 0.0 || paint.max_alpha() <= 0.0 {
            return;
        }
        let (Some(path), Some(paint)) = (skia_path(path), skia_paint(paint)) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Butt,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

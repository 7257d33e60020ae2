//! egui presentation of effect canvases.

use backdrop_fx::PixelCanvas;
use eframe::egui::{self, Color32, Pos2, Rect};

/// One transparent effect layer, uploaded as a texture each frame.
pub struct CanvasLayer {
    name: &'static str,
    texture: Option<egui::TextureHandle>,
}

impl CanvasLayer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            texture: None,
        }
    }

    /// Upload the canvas contents, reusing the texture after the first frame.
    pub fn upload(&mut self, ctx: &egui::Context, canvas: &PixelCanvas) {
        if canvas.width() == 0 || canvas.height() == 0 {
            return;
        }
        let image = to_color_image(canvas);
        if let Some(texture) = &mut self.texture {
            texture.set(image, egui::TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture(self.name, image, egui::TextureOptions::LINEAR));
        }
    }

    /// Drop the texture so nothing is drawn for this layer.
    pub fn release(&mut self) {
        self.texture = None;
    }

    /// Stretch the layer over `rect`.
    pub fn paint(&self, painter: &egui::Painter, rect: Rect) {
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }
}

/// Convert a canvas to an egui image. Both sides store premultiplied RGBA8,
/// so the pixmap bytes go through unchanged.
pub fn to_color_image(canvas: &PixelCanvas) -> egui::ColorImage {
    egui::ColorImage::from_rgba_premultiplied(
        [canvas.width(), canvas.height()],
        canvas.data(),
    )
}

/// Map a screen position inside `rect` to canvas pixels at `scale`.
pub fn screen_to_canvas(pos: Pos2, rect: Rect, scale: u32) -> backdrop_fx::Point2 {
    let scale = scale.max(1) as f32;
    backdrop_fx::Point2::new((pos.x - rect.min.x) / scale, (pos.y - rect.min.y) / scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_fx::{Paint, Point2, Rgb, Surface};

    #[test]
    fn test_screen_to_canvas_applies_offset_and_scale() {
        let rect = Rect::from_min_max(Pos2::new(200.0, 0.0), Pos2::new(1000.0, 600.0));
        let p = screen_to_canvas(Pos2::new(400.0, 100.0), rect, 2);
        assert_eq!(p, Point2::new(100.0, 50.0));
    }

    #[test]
    fn test_color_image_matches_canvas_size() {
        let mut canvas = PixelCanvas::new(8, 4);
        canvas.fill_circle(
            Point2::new(4.0, 2.0),
            2.0,
            &Paint::Solid(Rgb::WHITE.with_alpha(1.0)),
        );
        let image = to_color_image(&canvas);
        assert_eq!(image.size, [8, 4]);
        assert_eq!(image.pixels[2 * 8 + 4], Color32::WHITE);
    }
}

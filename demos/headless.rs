//! Render the effects without a window.
//!
//! Sweeps a synthetic pointer across the canvas at 60 Hz and reports what
//! each frame drew. With `--out`, the final composited frame is written as a
//! PNG over a dark page color.
//!
//! Run with: `cargo run --example headless -- --frames 180 --out frame.png`

use std::error::Error;
use std::path::{Path, PathBuf};

use backdrop_fx::{
    EffectHost, EffectsConfig, FrameInstant, FrameOutcome, GridRenderer, InputEvent, PixelCanvas,
    Point2, PointerCapabilities, TrailRenderer,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

/// Page color behind the transparent layers.
const PAGE: [u8; 3] = [9, 9, 11];

#[derive(Parser)]
#[command(name = "headless", about = "Render backdrop effects to a file")]
struct Args {
    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Seed for scatter and pulses
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Accent color token
    #[arg(long)]
    accent: Option<String>,

    /// Write the last frame here as PNG
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Pointer position on a slow figure-eight over the lower half.
fn pointer_at(frame: u64, width: u32, height: u32) -> Point2 {
    let t = frame as f32 / 60.0;
    Point2::new(
        width as f32 * (0.5 + 0.35 * (t * 1.3).sin()),
        height as f32 * (0.7 + 0.2 * (t * 2.6).sin()),
    )
}

/// Composite the layers over the page color and save the result.
fn write_png(path: &Path, layers: &[&PixelCanvas]) -> Result<(), Box<dyn Error>> {
    let (w, h) = (layers[0].width() as u32, layers[0].height() as u32);
    let mut frame = Pixmap::new(w, h).ok_or("empty canvas")?;
    frame.fill(Color::from_rgba8(PAGE[0], PAGE[1], PAGE[2], 255));
    for layer in layers.iter().filter_map(|l| l.pixmap()) {
        frame.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
    frame.save_png(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = EffectsConfig::default();
    config.theme.accent = args.accent.clone();
    config.validate()?;

    let accent = config.theme.accent_color();
    let caps = PointerCapabilities::fine();

    let grid = GridRenderer::with_rng(
        config.grid.clone(),
        accent,
        config.theme.pulse_color(),
        StdRng::seed_from_u64(args.seed),
    );
    let trail = TrailRenderer::with_rng(
        config.trail.clone(),
        accent,
        &mut StdRng::seed_from_u64(args.seed.wrapping_add(1)),
    );

    let Some(mut grid) =
        EffectHost::mount_with_surface(grid, caps, PixelCanvas::new(args.width, args.height))
    else {
        return Ok(());
    };
    let Some(mut trail) =
        EffectHost::mount_with_surface(trail, caps, PixelCanvas::new(args.width, args.height))
    else {
        return Ok(());
    };

    for frame in 0..args.frames {
        let now = FrameInstant(frame * 16_667);
        let event = InputEvent::PointerMove(pointer_at(frame, args.width, args.height));
        grid.handle_event(&event);
        trail.handle_event(&event);

        let outcomes = [grid.tick(now), trail.tick(now)];
        let drawn = outcomes.iter().all(|o| *o == FrameOutcome::Drawn);
        if frame % 30 == 0 {
            log::info!(
                "frame {:>4}: drawn={} trail points={} pulses={}",
                frame,
                drawn,
                trail.effect().len(),
                grid.effect().pulses().len()
            );
        }
    }

    if let (Some(path), Some(grid_canvas), Some(trail_canvas)) =
        (&args.out, grid.surface(), trail.surface())
    {
        write_png(path, &[grid_canvas, trail_canvas])?;
        log::info!("Wrote {}", path.display());
    }

    grid.unmount();
    trail.unmount();
    Ok(())
}

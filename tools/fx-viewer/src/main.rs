//! fx-viewer - runs the backdrop effects in a desktop window.
//!
//! Stands in for the web page the effects decorate: the central panel is the
//! viewport, hovering it drives the pointer, and resizing the window resizes
//! the canvases.

mod app;
mod frame_stats;
mod renderer;
mod settings;

use std::path::PathBuf;

use backdrop_fx::EffectsConfig;
use clap::Parser;
use eframe::egui;

use app::ViewerApp;
use settings::{EffectMode, ViewerSettings};

#[derive(Parser)]
#[command(name = "fx-viewer", about = "Pointer-reactive backdrop effects viewer")]
struct Args {
    /// Effects to mount
    #[arg(short, long, value_enum, default_value_t = EffectMode::Both)]
    effect: EffectMode,

    /// JSON file with trail/grid/theme settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Accent color token (#rgb or #rrggbb), overrides the config file
    #[arg(short, long)]
    accent: Option<String>,

    /// Mount as a touch-first device (the trail is not mounted)
    #[arg(long)]
    coarse_pointer: bool,

    /// Seed for the scatter table and pulse spawning
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Rasterize at 1/N resolution
    #[arg(long, default_value_t = 1)]
    scale: u32,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match EffectsConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => EffectsConfig::default(),
    };
    if let Some(accent) = args.accent {
        config.theme.accent = Some(accent);
    }

    let settings = ViewerSettings {
        effect_mode: args.effect,
        scale: args.scale.clamp(1, 4),
        coarse_pointer: args.coarse_pointer,
        ..Default::default()
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_title(format!("fx-viewer - {}", args.effect.label())),
        ..Default::default()
    };

    let seed = args.seed;
    eframe::run_native(
        "fx-viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(settings, config, seed)))),
    )
}

//! Pointer-reactive animated backdrops.
//!
//! This crate provides two full-viewport decorative effects that follow the
//! pointer, plus the control loop that drives them:
//!
//! - **Trail** ([`TrailRenderer`]) - a fading trail of scattered micro-dots
//!   behind a smoothed pointer
//! - **Grid** ([`GridRenderer`]) - a perspective floor grid with a moving
//!   vanishing point, pointer warp and traveling pulses
//!
//! Effects draw through the [`Surface`] trait. [`PixelCanvas`] rasterizes into a
//! `tiny_skia::Pixmap` and [`RecordingSurface`] records draw calls; embedders can
//! implement [`Surface`] for their own 2-D context.
//!
//! # Lifecycle
//!
//! An [`EffectHost`] mounts one effect, receives [`InputEvent`]s and is
//! ticked once per display frame:
//!
//! ```
//! use backdrop_fx::{
//!     EffectHost, FrameInstant, FrameOutcome, GridConfig, GridRenderer, InputEvent, Point2,
//!     PointerCapabilities, RecordingSurface, Rgb,
//! };
//!
//! let grid = GridRenderer::new(GridConfig::default(), Rgb::DEFAULT_ACCENT, Rgb::DEFAULT_PULSE);
//! let mut host =
//!     EffectHost::mount_with_surface(grid, PointerCapabilities::fine(), RecordingSurface::new(800, 600))
//!         .unwrap();
//!
//! host.handle_event(&InputEvent::PointerMove(Point2::new(400.0, 450.0)));
//! assert_eq!(host.tick(FrameInstant::from_millis(16)), FrameOutcome::Drawn);
//!
//! host.unmount();
//! assert_eq!(host.tick(FrameInstant::from_millis(32)), FrameOutcome::Cancelled);
//! ```
//!
//! # Coordinate System
//!
//! Surface pixels, origin top-left, y down. The grid normalizes the pointer
//! to 0-1 on each axis internally.
//!
//! # Features
//!
//! - `serde`: Serialize/deserialize configuration and data types, and load
//!   [`EffectsConfig`] from JSON

pub mod color;
pub mod config;
mod error;
pub mod grid;
pub mod host;
pub mod raster;
pub mod recording;
pub mod scatter;
pub mod surface;
pub mod trail;
pub mod types;

// Error types
pub use error::{Error, Result};

// Effects and their host
pub use grid::{GridGeometry, GridRenderer, Pulse};
pub use host::{Effect, EffectHost, FrameClock, HostStats};
pub use trail::{PointerTracker, TrailPoint, TrailRenderer};

// Drawing
pub use raster::PixelCanvas;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{ColorStop, LinearGradient, Paint, Path, RadialGradient, Surface};

// Configuration and shared types
pub use color::{Rgb, Rgba};
pub use config::{EffectsConfig, GridConfig, ThemeConfig, TrailConfig};
pub use types::{FrameInstant, FrameOutcome, InputEvent, Point2, PointerCapabilities, Viewport};

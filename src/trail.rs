//! Cursor trail particle renderer.
//!
//! Keeps a bounded FIFO of recent (smoothed) pointer positions. Every point
//! draws a cluster of micro-dots scattered inside a disk whose radius grows
//! from nothing at the tail to `head_spread` at the head, so the trail reads
//! as a wide cloud at the cursor thinning out to a single line of dots.

use rand::Rng;
use std::collections::VecDeque;

use crate::color::Rgb;
use crate::config::TrailConfig;
use crate::host::Effect;
use crate::scatter::ScatterTable;
use crate::surface::{Paint, Surface};
use crate::types::{FrameInstant, InputEvent, Point2};

/// One recorded pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Point2,
    pub created_at: FrameInstant,
    /// Round-robin index into the scatter table.
    pub slot: usize,
}

/// Raw pointer position plus its smoothed follower.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    raw: Option<Point2>,
    smoothed: Option<Point2>,
}

impl PointerTracker {
    /// Last observed position, `None` while the pointer is off the surface.
    pub fn raw(&self) -> Option<Point2> {
        self.raw
    }

    pub fn smoothed(&self) -> Option<Point2> {
        self.smoothed
    }

    /// Record a pointer event. The first observation snaps the smoothed head.
    pub fn observe(&mut self, p: Point2) {
        self.raw = Some(p);
        if self.smoothed.is_none() {
            self.smoothed = Some(p);
        }
    }

    /// The pointer left the surface.
    pub fn leave(&mut self) {
        self.raw = None;
        self.smoothed = None;
    }

    /// Move the smoothed head a fixed fraction toward the raw position.
    ///
    /// Returns the new head while the pointer is on the surface.
    pub fn step(&mut self, lerp: f32) -> Option<Point2> {
        let raw = self.raw?;
        let head = self.smoothed.unwrap_or(raw).lerp(raw, lerp);
        self.smoothed = Some(head);
        Some(head)
    }
}

/// Cursor trail effect state.
pub struct TrailRenderer {
    config: TrailConfig,
    scatter: ScatterTable,
    pointer: PointerTracker,
    points: VecDeque<TrailPoint>,
    next_slot: usize,
    color: Rgb,
}

impl TrailRenderer {
    /// Create a renderer with a freshly sampled scatter table.
    pub fn new(config: TrailConfig, color: Rgb) -> Self {
        Self::with_rng(config, color, &mut rand::thread_rng())
    }

    /// Create a renderer drawing the scatter table from `rng`.
    ///
    /// An invalid config is corrected with [`TrailConfig::sanitized`] and
    /// logged; the renderer never refuses to build.
    pub fn with_rng<R: Rng + ?Sized>(config: TrailConfig, color: Rgb, rng: &mut R) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}, correcting trail config", e);
                config.sanitized()
            }
        };
        let scatter = ScatterTable::generate(config.capacity, config.dots_per_point, rng);
        Self {
            points: VecDeque::with_capacity(config.capacity + 1),
            config,
            scatter,
            pointer: PointerTracker::default(),
            next_slot: 0,
            color,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn scatter(&self) -> &ScatterTable {
        &self.scatter
    }

    /// Live points, oldest (tail) first.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &TrailPoint> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn pointer_move(&mut self, p: Point2) {
        self.pointer.observe(p);
    }

    /// Forget the trail and mark the pointer off-surface.
    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
        self.points.clear();
    }

    /// Advance the simulation by one frame: smooth, record, evict, prune.
    pub fn advance(&mut self, now: FrameInstant) {
        if let Some(head) = self.pointer.step(self.config.lerp) {
            let moved_enough = self
                .points
                .back()
                .map_or(true, |last| head.distance_sq(last.position) > self.config.min_dist_sq);
            if moved_enough {
                let slot = self.next_slot % self.config.capacity;
                self.next_slot = self.next_slot.wrapping_add(1);
                self.points.push_back(TrailPoint {
                    position: head,
                    created_at: now,
                    slot,
                });
                while self.points.len() > self.config.capacity {
                    self.points.pop_front();
                }
            }
        }

        // Oldest first, so expired points are always a prefix.
        let fade = self.config.fade_duration();
        while let Some(front) = self.points.front() {
            if now.saturating_since(front.created_at) >= fade {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }

    /// Clear the surface and draw the current trail.
    pub fn draw(&self, now: FrameInstant, surface: &mut dyn Surface) {
        surface.clear();

        let total = self.points.len();
        let fade_ms = self.config.fade_ms as f32;

        for (i, point) in self.points.iter().enumerate() {
            let elapsed_ms = now.saturating_since(point.created_at).as_secs_f32() * 1000.0;
            let age = 1.0 - elapsed_ms / fade_ms;
            let progress = trail_progress(i, total);
            let alpha = progress.sqrt() * age;
            if alpha < self.config.min_alpha {
                continue;
            }

            let spread = self.config.head_spread * progress;
            for (d, offset) in self.scatter.slot(point.slot).iter().enumerate() {
                let paint = Paint::Solid(self.color.with_alpha(alpha * dot_jitter(d, i)));
                let center = Point2::new(
                    point.position.x + offset.x * spread,
                    point.position.y + offset.y * spread,
                );
                surface.fill_circle(center, self.config.dot_radius, &paint);
            }
        }
    }
}

/// Position along the trail: 0 at the oldest point, 1 at the newest.
pub fn trail_progress(index: usize, total: usize) -> f32 {
    index as f32 / total.saturating_sub(1).max(1) as f32
}

/// Deterministic per-dot alpha multiplier in 0.55-0.955.
pub fn dot_jitter(dot: usize, point: usize) -> f32 {
    0.55 + 0.45 * ((dot * 7 + point) % 10) as f32 / 10.0
}

impl Effect for TrailRenderer {
    fn name(&self) -> &'static str {
        "trail"
    }

    fn requires_fine_pointer(&self) -> bool {
        true
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMove(p) => self.pointer_move(*p),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::ThemeChanged(token) => {
                self.color = Rgb::resolve(Some(token.as_str()), Rgb::DEFAULT_ACCENT);
            }
            InputEvent::Resize(_) => {}
        }
    }

    fn render(&mut self, now: FrameInstant, surface: &mut dyn Surface) {
        self.advance(now);
        self.draw(now, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    /// Renderer whose smoothed head lands on the raw pointer every frame.
    fn renderer(config: TrailConfig) -> TrailRenderer {
        let config = TrailConfig { lerp: 1.0, ..config };
        TrailRenderer::with_rng(config, Rgb::DEFAULT_ACCENT, &mut StdRng::seed_from_u64(42))
    }

    /// Move 5px per frame, one frame per millisecond, recording a point each frame.
    fn drag(trail: &mut TrailRenderer, frames: usize, start: FrameInstant) {
        let mut now = start;
        for i in 0..frames {
            trail.pointer_move(Point2::new(10.0 + i as f32 * 5.0, 10.0));
            trail.advance(now);
            now += Duration::from_millis(1);
        }
    }

    #[test]
    fn test_first_move_snaps_smoothed_head() {
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.step(0.13), None);
        tracker.observe(Point2::new(100.0, 50.0));
        assert_eq!(tracker.smoothed(), Some(Point2::new(100.0, 50.0)));

        tracker.observe(Point2::new(200.0, 50.0));
        let head = tracker.step(0.13).unwrap();
        assert!((head.x - 113.0).abs() < 1e-3);
    }

    #[test]
    fn test_capacity_bounds_trail() {
        let config = TrailConfig {
            fade_ms: 60_000,
            ..Default::default()
        };
        let capacity = config.capacity;
        let mut trail = renderer(config);
        drag(&mut trail, capacity * 3, FrameInstant(0));
        assert_eq!(trail.len(), capacity);
    }

    #[test]
    fn test_eviction_is_fifo() {
        let config = TrailConfig {
            capacity: 5,
            fade_ms: 60_000,
            ..Default::default()
        };
        let mut trail = renderer(config);
        drag(&mut trail, 8, FrameInstant(0));

        let created: Vec<u64> = trail.points().map(|p| p.created_at.micros()).collect();
        // Points 0..3 were evicted oldest-first; 3..8 remain in order.
        assert_eq!(created, vec![3_000, 4_000, 5_000, 6_000, 7_000]);
        let slots: Vec<usize> = trail.points().map(|p| p.slot).collect();
        assert_eq!(slots, vec![3, 4, 0, 1, 2]);
    }

    #[test]
    fn test_points_fade_out_after_fade_duration() {
        let mut trail = renderer(TrailConfig::default());
        trail.pointer_move(Point2::new(300.0, 300.0));
        let t0 = FrameInstant::from_millis(1_000);
        trail.advance(t0);
        assert_eq!(trail.len(), 1);

        trail.advance(t0 + Duration::from_millis(649));
        assert_eq!(trail.len(), 1);

        trail.advance(t0 + Duration::from_millis(651));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_sub_threshold_moves_record_one_point() {
        let mut trail = renderer(TrailConfig::default());
        let t0 = FrameInstant(0);
        trail.pointer_move(Point2::new(100.0, 100.0));
        trail.advance(t0);
        trail.pointer_move(Point2::new(101.0, 100.0));
        for i in 1..120 {
            trail.advance(t0 + Duration::from_millis(i));
        }
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_pointer_leave_clears_trail() {
        let mut trail = renderer(TrailConfig::default());
        drag(&mut trail, 10, FrameInstant(0));
        trail.pointer_move(Point2::new(500.0, 500.0));
        assert!(!trail.is_empty());

        trail.pointer_leave();
        assert!(trail.is_empty());
        assert_eq!(trail.pointer().raw(), None);

        // Nothing is recorded while the pointer is away.
        trail.advance(FrameInstant::from_millis(100));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_scatter_is_stable_across_frames() {
        let mut trail = renderer(TrailConfig::default());
        drag(&mut trail, 20, FrameInstant(0));
        let now = FrameInstant::from_millis(25);
        let mut surface = RecordingSurface::new(800, 600);

        trail.render(now, &mut surface);
        let first: Vec<Point2> = surface.circles().map(|(c, _, _)| c).collect();
        trail.render(now + Duration::from_millis(16), &mut surface);
        let second: Vec<Point2> = surface.circles().map(|(c, _, _)| c).collect();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_head_is_wide_and_tail_is_invisible() {
        let mut trail = renderer(TrailConfig::default());
        drag(&mut trail, 30, FrameInstant(0));
        let mut surface = RecordingSurface::new(800, 600);
        trail.draw(FrameInstant::from_millis(30), &mut surface);

        let head = trail.points().last().unwrap().position;
        let dots_per_point = trail.config().dots_per_point;
        let circles: Vec<(Point2, f32, &Paint)> = surface.circles().collect();
        // Tail point (progress 0) has alpha 0 and is skipped.
        assert_eq!(circles.len() % dots_per_point, 0);
        assert!(circles.len() < trail.len() * dots_per_point);

        let head_dots = &circles[circles.len() - dots_per_point..];
        for (center, radius, _) in head_dots {
            assert!(center.distance_sq(head).sqrt() <= 12.0 + 1e-3);
            assert_eq!(*radius, 0.9);
        }
    }

    #[test]
    fn test_alpha_helpers() {
        assert_eq!(trail_progress(0, 1), 0.0);
        assert_eq!(trail_progress(4, 5), 1.0);
        assert_eq!(trail_progress(2, 5), 0.5);
        assert_eq!(dot_jitter(0, 0), 0.55);
        assert!((dot_jitter(1, 2) - 0.955).abs() < 1e-6);
        assert_eq!(dot_jitter(0, 10), 0.55);
    }

    #[test]
    fn test_theme_change_updates_color() {
        let mut trail = renderer(TrailConfig::default());
        trail.handle_event(&InputEvent::ThemeChanged("#ff0000".into()));
        assert_eq!(trail.color(), Rgb::new(255, 0, 0));
        trail.handle_event(&InputEvent::ThemeChanged("garbage".into()));
        assert_eq!(trail.color(), Rgb::DEFAULT_ACCENT);
    }

    #[test]
    fn test_dot_alpha_combines_progress_age_and_jitter() {
        let mut trail = renderer(TrailConfig::default());
        let t0 = FrameInstant(0);
        for (i, ms) in [0u64, 100, 200].into_iter().enumerate() {
            trail.pointer_move(Point2::new(100.0 + i as f32 * 50.0, 100.0));
            trail.advance(t0 + Duration::from_millis(ms));
        }
        assert_eq!(trail.len(), 3);

        let mut surface = RecordingSurface::new(800, 600);
        trail.draw(t0 + Duration::from_millis(300), &mut surface);
        let alphas: Vec<f32> = surface
            .circles()
            .map(|(_, _, paint)| match paint {
                Paint::Solid(c) => c.a,
                other => panic!("trail dots are solid, got {:?}", other),
            })
            .collect();
        // The tail has progress 0 and is skipped entirely.
        assert_eq!(alphas.len(), 20);

        // (index, progress, elapsed ms)
        let drawn = [(1, 0.5_f32, 200.0_f32), (2, 1.0, 100.0)];
        for (n, (i, progress, elapsed)) in drawn.into_iter().enumerate() {
            for d in 0..10 {
                let expected = progress.sqrt() * (1.0 - elapsed / 650.0) * dot_jitter(d, i);
                let actual = alphas[n * 10 + d];
                assert!(
                    (actual - expected).abs() < 1e-4,
                    "point {} dot {}: {} != {}",
                    i,
                    d,
                    actual,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_zero_capacity_config_is_corrected() {
        let config = TrailConfig {
            capacity: 0,
            dots_per_point: 0,
            ..Default::default()
        };
        let mut trail = renderer(config);
        assert_eq!(trail.config().capacity, 1);
        assert_eq!(trail.config().dots_per_point, 1);

        drag(&mut trail, 10, FrameInstant(0));
        assert_eq!(trail.len(), 1);

        let mut surface = RecordingSurface::new(200, 50);
        trail.draw(FrameInstant::from_millis(10), &mut surface);
        assert!(surface.circles().count() <= 1);
    }
}

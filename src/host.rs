//! Mount/tick/unmount lifecycle shared by every effect.
//!
//! The host is a plain state machine driven by the embedder's frame
//! callback. It owns one [`Effect`] and an optional [`Surface`]:
//!
//! - [`EffectHost::mount`] refuses effects that need a fine pointer on
//!   coarse-pointer devices; nothing is allocated in that case.
//! - [`EffectHost::tick`] runs one frame. With no surface, or a surface
//!   that is not ready, the frame is skipped and retried on the next tick.
//! - [`EffectHost::unmount`] is terminal. Later ticks and events are no-ops,
//!   so a frame request that was already in flight does nothing.
//!
//! The host never owns a thread; the embedder decides when frames happen.

use std::time::Instant;

use crate::surface::Surface;
use crate::types::{FrameInstant, FrameOutcome, InputEvent, PointerCapabilities, Viewport};

/// An animated backdrop driven by an [`EffectHost`].
pub trait Effect {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether the effect is pointless without a hovering pointer.
    fn requires_fine_pointer(&self) -> bool {
        false
    }

    /// React to one input event. Called in delivery order, never during render.
    fn handle_event(&mut self, event: &InputEvent);

    /// Advance the simulation to `now` and redraw the whole surface.
    fn render(&mut self, now: FrameInstant, surface: &mut dyn Surface);
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn requires_fine_pointer(&self) -> bool {
        (**self).requires_fine_pointer()
    }

    fn handle_event(&mut self, event: &InputEvent) {
        (**self).handle_event(event)
    }

    fn render(&mut self, now: FrameInstant, surface: &mut dyn Surface) {
        (**self).render(now, surface)
    }
}

/// Frame counters of a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Frames that advanced and redrew the effect.
    pub frames_drawn: u64,
    /// Frames skipped because no usable surface was available.
    pub frames_skipped: u64,
}

/// Drives one effect against one surface.
pub struct EffectHost<E: Effect, S: Surface> {
    effect: E,
    surface: Option<S>,
    viewport: Viewport,
    running: bool,
    stats: HostStats,
}

impl<E: Effect, S: Surface> EffectHost<E, S> {
    /// Mount `effect`, or return `None` when the device cannot drive it.
    pub fn mount(effect: E, caps: PointerCapabilities) -> Option<Self> {
        if effect.requires_fine_pointer() && caps.is_coarse() {
            log::info!("Not mounting {}: coarse pointer device", effect.name());
            return None;
        }
        log::debug!("Mounted {}", effect.name());
        Some(Self {
            effect,
            surface: None,
            viewport: Viewport::default(),
            running: true,
            stats: HostStats::default(),
        })
    }

    /// Mount `effect` and attach `surface` right away.
    pub fn mount_with_surface(effect: E, caps: PointerCapabilities, surface: S) -> Option<Self> {
        let mut host = Self::mount(effect, caps)?;
        host.attach_surface(surface);
        Some(host)
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Last viewport delivered through a resize.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    /// Attach a drawing surface, replacing any previous one.
    ///
    /// The surface adopts its own size as the viewport, and the effect is
    /// told about it with a resize.
    pub fn attach_surface(&mut self, surface: S) -> Option<S> {
        let size = surface.size();
        let previous = self.surface.replace(surface);
        if self.running {
            self.handle_event(&InputEvent::Resize(size));
        }
        previous
    }

    /// Remove the surface. Ticks skip until one is attached again.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    /// Deliver an input event.
    ///
    /// A resize also resizes the attached surface before the effect sees it,
    /// so the next frame draws at the new size.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if !self.running {
            return;
        }
        if let InputEvent::Resize(viewport) = event {
            self.viewport = *viewport;
            if let Some(surface) = self.surface.as_mut() {
                surface.resize(*viewport);
            }
        }
        self.effect.handle_event(event);
    }

    /// Run one frame at `now`.
    pub fn tick(&mut self, now: FrameInstant) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Cancelled;
        }
        let Some(surface) = self.surface.as_mut().filter(|s| s.is_ready()) else {
            log::trace!("{}: no drawing surface, skipping frame", self.effect.name());
            self.stats.frames_skipped += 1;
            return FrameOutcome::Skipped;
        };
        self.effect.render(now, surface);
        self.stats.frames_drawn += 1;
        FrameOutcome::Drawn
    }

    /// Stop the host. Pending and future ticks become no-ops.
    pub fn unmount(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::debug!(
            "Unmounted {} after {} frames ({} skipped)",
            self.effect.name(),
            self.stats.frames_drawn,
            self.stats.frames_skipped
        );
    }

    /// Unmount and hand back the effect and surface.
    pub fn into_parts(mut self) -> (E, Option<S>) {
        self.unmount();
        (self.effect, self.surface)
    }
}

/// Converts wall-clock instants into [`FrameInstant`]s relative to a start time.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn with_origin(origin: Instant) -> Self {
        Self { origin }
    }

    /// Frame timestamp for `instant`; instants before the origin map to zero.
    pub fn at(&self, instant: Instant) -> FrameInstant {
        FrameInstant::from_duration(instant.saturating_duration_since(self.origin))
    }

    pub fn now(&self) -> FrameInstant {
        self.at(Instant::now())
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;
    use crate::types::Point2;
    use std::time::Duration;

    /// Counts calls and remembers the last event.
    #[derive(Default)]
    struct CountingEffect {
        fine_only: bool,
        renders: usize,
        events: Vec<InputEvent>,
    }

    impl Effect for CountingEffect {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn requires_fine_pointer(&self) -> bool {
            self.fine_only
        }

        fn handle_event(&mut self, event: &InputEvent) {
            self.events.push(event.clone());
        }

        fn render(&mut self, _now: FrameInstant, surface: &mut dyn Surface) {
            self.renders += 1;
            surface.clear();
        }
    }

    fn fine_only() -> CountingEffect {
        CountingEffect {
            fine_only: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_coarse_pointer_refuses_fine_only_effect() {
        let host = EffectHost::<_, RecordingSurface>::mount(fine_only(), PointerCapabilities::touch());
        assert!(host.is_none());

        let host = EffectHost::<_, RecordingSurface>::mount(fine_only(), PointerCapabilities::fine());
        assert!(host.is_some());
    }

    #[test]
    fn test_coarse_pointer_accepts_other_effects() {
        let host =
            EffectHost::<_, RecordingSurface>::mount(CountingEffect::default(), PointerCapabilities::touch());
        assert!(host.is_some());
    }

    #[test]
    fn test_ticks_skip_without_surface() {
        let mut host =
            EffectHost::<_, RecordingSurface>::mount(CountingEffect::default(), PointerCapabilities::fine())
                .unwrap();
        assert_eq!(host.tick(FrameInstant(0)), FrameOutcome::Skipped);
        assert_eq!(host.effect().renders, 0);

        host.attach_surface(RecordingSurface::new(100, 50));
        assert_eq!(host.tick(FrameInstant(16_000)), FrameOutcome::Drawn);
        assert_eq!(host.effect().renders, 1);
        assert_eq!(
            host.stats(),
            HostStats {
                frames_drawn: 1,
                frames_skipped: 1
            }
        );
    }

    #[test]
    fn test_ticks_skip_while_surface_not_ready() {
        let mut host = EffectHost::mount_with_surface(
            CountingEffect::default(),
            PointerCapabilities::fine(),
            RecordingSurface::new(100, 50),
        )
        .unwrap();
        host.surface_mut().unwrap().set_ready(false);
        assert_eq!(host.tick(FrameInstant(0)), FrameOutcome::Skipped);
        host.surface_mut().unwrap().set_ready(true);
        assert_eq!(host.tick(FrameInstant(1)), FrameOutcome::Drawn);
    }

    #[test]
    fn test_unmount_cancels_ticks_and_events() {
        let mut host = EffectHost::mount_with_surface(
            CountingEffect::default(),
            PointerCapabilities::fine(),
            RecordingSurface::new(100, 50),
        )
        .unwrap();
        host.unmount();
        assert!(!host.is_running());
        assert_eq!(host.tick(FrameInstant(0)), FrameOutcome::Cancelled);

        let before = host.effect().events.len();
        host.handle_event(&InputEvent::PointerMove(Point2::new(1.0, 1.0)));
        assert_eq!(host.effect().events.len(), before);
        assert_eq!(host.effect().renders, 0);

        // Idempotent.
        host.unmount();
        assert_eq!(host.tick(FrameInstant(1)), FrameOutcome::Cancelled);
    }

    #[test]
    fn test_resize_reaches_surface_before_effect() {
        let mut host = EffectHost::mount_with_surface(
            CountingEffect::default(),
            PointerCapabilities::fine(),
            RecordingSurface::new(100, 50),
        )
        .unwrap();
        assert_eq!(host.effect().events, vec![InputEvent::Resize(Viewport::new(100, 50))]);

        host.handle_event(&InputEvent::Resize(Viewport::new(640, 480)));
        assert_eq!(host.surface().unwrap().size(), Viewport::new(640, 480));
        assert_eq!(host.viewport(), Viewport::new(640, 480));
        assert_eq!(host.effect().events.len(), 2);
    }

    #[test]
    fn test_detach_returns_surface() {
        let mut host = EffectHost::mount_with_surface(
            CountingEffect::default(),
            PointerCapabilities::fine(),
            RecordingSurface::new(10, 10),
        )
        .unwrap();
        assert!(host.detach_surface().is_some());
        assert_eq!(host.tick(FrameInstant(0)), FrameOutcome::Skipped);
    }

    #[test]
    fn test_frame_clock_is_relative_to_origin() {
        let origin = Instant::now();
        let clock = FrameClock::with_origin(origin);
        assert_eq!(clock.at(origin), FrameInstant(0));
        assert_eq!(
            clock.at(origin + Duration::from_millis(16)),
            FrameInstant::from_millis(16)
        );
    }
}

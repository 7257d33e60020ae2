//! Rolling frame rate measurement.
//!
//! Keeps the intervals between recent frames and averages them. The
//! displayed value is recomputed at a fixed cadence so the label does not
//! flicker every frame.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of frame intervals averaged.
const WINDOW: usize = 120;

/// How often the displayed estimate is refreshed.
const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Gaps longer than this (window hidden, debugger pause) reset the window.
const MAX_GAP: Duration = Duration::from_secs(1);

pub struct FrameStats {
    intervals: VecDeque<Duration>,
    last_frame: Option<Instant>,
    last_estimate: Option<f32>,
    last_update: Option<Instant>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            intervals: VecDeque::with_capacity(WINDOW + 1),
            last_frame: None,
            last_estimate: None,
            last_update: None,
        }
    }

    /// Record a frame presented at `now`.
    pub fn record(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            let dt = now.saturating_duration_since(last);
            if dt > MAX_GAP {
                self.intervals.clear();
            } else {
                self.intervals.push_back(dt);
                while self.intervals.len() > WINDOW {
                    self.intervals.pop_front();
                }
            }
        }
        self.last_frame = Some(now);

        let due = self
            .last_update
            .map_or(true, |t| now.saturating_duration_since(t) >= UPDATE_INTERVAL);
        if due {
            self.last_estimate = self.compute_fps();
            self.last_update = Some(now);
        }
    }

    /// Frames per second, `None` until enough frames were seen.
    pub fn fps(&self) -> Option<f32> {
        self.last_estimate
    }

    fn compute_fps(&self) -> Option<f32> {
        if self.intervals.len() < 2 {
            return None;
        }
        let total: Duration = self.intervals.iter().sum();
        if total.is_zero() {
            return None;
        }
        Some(self.intervals.len() as f32 / total.as_secs_f32())
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

//! Fixed-step accumulator turning host frame times into simulation ticks.
use std::time::Duration;

use crate::constants::{
    DEFAULT_TICK_HZ, LOG_CLOCK_BACKLOG, LOG_CLOCK_INVALID, MAX_TICKS_PER_FRAME,
};

/// Splits variable frame durations into whole fixed ticks.
///
/// Leftover time carries into the next frame. When a single frame would need
/// more than `max_ticks` ticks the excess backlog is dropped rather than
/// replayed, so a stalled host never triggers a burst of progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
    max_ticks: u32,
    ticks: u64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_HZ)
    }
}

impl FixedStep {
    /// Clock ticking `hz` times per second. A rate of zero falls back to the
    /// default rate.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        let hz = if hz == 0 { DEFAULT_TICK_HZ } else { hz };
        Self {
            step: Duration::from_nanos(1_000_000_000 / u64::from(hz)),
            accumulator: Duration::ZERO,
            max_ticks: MAX_TICKS_PER_FRAME,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = if max_ticks == 0 { 1 } else { max_ticks };
        self
    }

    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Length of one tick in seconds, the `dt` fed to progression.
    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Ticks produced since creation.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.ticks
    }

    /// Time banked toward the next tick.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Bank a frame and return how many fixed ticks to run now.
    pub fn accumulate(&mut self, frame: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(frame);
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            log::debug!(
                "{LOG_CLOCK_BACKLOG} dropped={:?} after_ticks={ticks}",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }
        self.ticks = self.ticks.saturating_add(u64::from(ticks));
        ticks
    }

    /// [`Self::accumulate`] for hosts that report frame time as seconds.
    /// Negative or non-finite frames produce no ticks.
    pub fn accumulate_secs(&mut self, frame_secs: f32) -> u32 {
        match Duration::try_from_secs_f32(frame_secs) {
            Ok(frame) => self.accumulate(frame),
            Err(err) => {
                log::warn!("{LOG_CLOCK_INVALID} frame={frame_secs} reason={err}");
                0
            }
        }
    }
}

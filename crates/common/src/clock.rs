//! Clocks and frame pacing for the playback loop.
//!
//! Playback advances project time by wall-clock deltas between frame
//! callbacks. This module provides:
//! - A [`Clock`] abstraction returning monotonic time since an epoch
//! - A real clock backed by [`Instant`] and a manual clock for tests
//! - A frame rate controller for pacing advance steps

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source measured from a fixed epoch.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch. Never decreases.
    fn now(&self) -> Duration;

    /// Wall-clock time at the epoch (RFC 3339), when the clock has one.
    fn epoch_wall(&self) -> Option<&str> {
        None
    }
}

/// A clock anchored to the moment it was started.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    /// The instant the clock started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl MonotonicClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn epoch_wall(&self) -> Option<&str> {
        Some(&self.epoch_wall)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move time forward by a number of seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs.max(0.0)));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Seconds between two clock readings, zero if `later` precedes `earlier`.
pub fn secs_between(earlier: Duration, later: Duration) -> f64 {
    later.saturating_sub(earlier).as_secs_f64()
}

/// Frame rate controller for pacing advance steps.
#[derive(Debug)]
pub struct FrameRateController {
    target_interval: Duration,
    last_tick: Option<Duration>,
}

impl FrameRateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self::with_interval(frame_interval(target_hz))
    }

    /// Create a controller that ticks at most once per `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            target_interval: interval,
            last_tick: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now: Duration) -> bool {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                true
            }
            Some(last) if now >= last + self.target_interval => {
                self.last_tick = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Target interval between ticks.
    pub fn interval(&self) -> Duration {
        self.target_interval
    }
}

/// Interval between frames at `hz` (a zero rate is treated as 1 Hz).
pub fn frame_interval(hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / hz.max(1) as u64)
}

//! Tick counting and frame timing.
//!
//! Timestamps are microseconds from a [`TimeSource`]. Raw measurements are not
//! trusted to be monotonic: a non-positive interval reports a delta time of
//! exactly zero, and derived throughput degrades to zero instead of dividing
//! by zero.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Source of timestamps in microseconds.
pub trait TimeSource {
    fn now_micros(&self) -> i64;
}

/// Microseconds since construction, from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicTime {
    fn now_micros(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_micros()).unwrap_or(i64::MAX)
    }
}

/// Hand-driven time source. Clones share the same timestamp.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Arc<AtomicI64>,
}

impl ManualTime {
    pub fn new(start_micros: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_micros)),
        }
    }

    pub fn set_micros(&self, micros: i64) {
        self.now.store(micros, Ordering::Relaxed);
    }

    pub fn advance_micros(&self, micros: i64) {
        self.now.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance_micros(ms * 1000);
    }
}

impl TimeSource for ManualTime {
    fn now_micros(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Tick counter and frame timing state.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    tick: u64,
    started_at: Option<i64>,
    last_tick_at: Option<i64>,
    delta_time: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the run-start timestamp.
    pub fn start(&mut self, now: i64) {
        self.started_at = Some(now);
        self.last_tick_at = Some(now);
        self.delta_time = 0.0;
    }

    /// Mark the start of a tick and return its delta time in seconds.
    pub fn begin_tick(&mut self, now: i64) -> f32 {
        let raw = self.last_tick_at.map_or(0, |prev| now.saturating_sub(prev));
        self.delta_time = if raw <= 0 {
            0.0
        } else {
            (raw as f64 / MICROS_PER_SEC) as f32
        };
        self.last_tick_at = Some(now);
        self.delta_time
    }

    /// Mark a tick as completed.
    pub fn end_tick(&mut self) {
        self.tick += 1;
    }

    /// Completed ticks since start.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds between the starts of the last two ticks, never negative.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds since the run started, or 0 before start.
    pub fn elapsed_secs(&self, now: i64) -> f64 {
        match self.started_at {
            Some(start) if now > start => (now - start) as f64 / MICROS_PER_SEC,
            _ => 0.0,
        }
    }

    /// Completed ticks per elapsed second, or 0 when no time has elapsed.
    pub fn fps(&self, now: i64) -> f64 {
        let elapsed = self.elapsed_secs(now);
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.tick as f64 / elapsed
    }
}

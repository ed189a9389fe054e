//! Optional frame-rate cap.

use std::time::Duration;

/// Computes how long to sleep so a tick lasts at least one frame budget.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget_micros: i64,
}

impl FramePacer {
    /// `None` when `target_fps` is zero.
    pub fn new(target_fps: u32) -> Option<Self> {
        if target_fps == 0 {
            return None;
        }
        Some(Self {
            budget_micros: 1_000_000 / i64::from(target_fps),
        })
    }

    pub fn budget(&self) -> Duration {
        Duration::from_micros(self.budget_micros.unsigned_abs())
    }

    /// Sleep needed after a tick that started at `started` and ended at `now`.
    pub fn remaining(&self, started: i64, now: i64) -> Option<Duration> {
        let spent = now.saturating_sub(started).max(0);
        let left = self.budget_micros - spent;
        (left > 0).then(|| Duration::from_micros(left.unsigned_abs()))
    }
}

//! Input source collaborator.

use tui_retro_types::{Axis, Key};

/// Non-blocking key source read once per tick.
pub trait InputSource {
    /// Start listening. Called once, when the loop starts.
    fn listen(&mut self) {}

    /// Latch the key recorded for `tick`, discarding stale samples.
    fn begin_tick(&mut self, _tick: u64) {}

    /// Most recent key recorded for the current tick.
    fn poll_key(&self) -> Option<Key>;

    fn is_key_down(&self, key: Key) -> bool {
        self.poll_key() == Some(key)
    }

    /// -1, 0 or +1 along `axis` for the current key.
    fn axis(&self, axis: Axis) -> f32 {
        self.poll_key().map_or(0.0, |k| k.axis_value(axis))
    }
}

/// Input source that never reports a key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_key(&self) -> Option<Key> {
        None
    }
}

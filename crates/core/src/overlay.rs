//! Direct cell writes from host code, for HUD text and scores.
//!
//! Writes are staged and applied to the working grid after compositing, so
//! they win over entities painted in the same tick. A staged character equal
//! to what the surface already shows causes no output write. Text stays on
//! screen until something else paints over it.

use parking_lot::Mutex;

use crate::grid::WorkingGrid;

#[derive(Debug, Default)]
pub struct Overlay {
    pending: Mutex<Vec<(i32, i32, char)>>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `ch` at (x, y). Off-grid cells are dropped when applied.
    pub fn set_cell(&self, ch: char, x: i32, y: i32) {
        self.pending.lock().push((x, y, ch));
    }

    /// Stage `text` starting at (x, y), left to right or top to bottom.
    pub fn put_str(&self, x: i32, y: i32, text: &str, horizontal: bool) {
        let mut pending = self.pending.lock();
        for (i, ch) in text.chars().enumerate() {
            let i = i32::try_from(i).unwrap_or(i32::MAX);
            let (cx, cy) = if horizontal {
                (x.saturating_add(i), y)
            } else {
                (x, y.saturating_add(i))
            };
            pending.push((cx, cy, ch));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Paint staged writes into `working` and clear them. Returns how many were staged.
    pub(crate) fn apply(&self, working: &mut WorkingGrid) -> usize {
        let mut pending = self.pending.lock();
        for &(x, y, ch) in pending.iter() {
            working.set_clipped(x, y, Some(ch));
        }
        let staged = pending.len();
        pending.clear();
        staged
    }
}

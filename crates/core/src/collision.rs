//! Overlap bookkeeping between solid, masked sprites.
//!
//! This records which entities overlap; it never resolves or prevents an
//! overlap. Each tick, masked cells are claimed in composition order. Every
//! pair of distinct entities claiming the same cell records an overlap. Pairs
//! are then compared against the previous tick to produce enter / stay / exit
//! events.

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPhase {
    Enter,
    Stay,
    Exit,
}

/// Overlap state change between two entities. `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
    pub phase: CollisionPhase,
}

pub struct CollisionTracker {
    width: u16,
    height: u16,
    // (cell index, claimant) for the frame being built.
    claims: Vec<(usize, EntityId)>,
    current: Vec<(EntityId, EntityId)>,
    previous: Vec<(EntityId, EntityId)>,
    events: Vec<CollisionEvent>,
}

impl CollisionTracker {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            claims: Vec::new(),
            current: Vec::new(),
            previous: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.claims.clear();
        self.current.clear();
    }

    /// Claim grid cell (x, y) for `id`. Cells outside the grid are ignored.
    pub fn claim(&mut self, id: EntityId, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        let cell = (y as usize) * usize::from(self.width) + x as usize;
        self.claims.push((cell, id));
    }

    /// Close the frame and compute this tick's events.
    pub fn end_frame(&mut self) {
        self.claims.sort_unstable();
        self.claims.dedup();

        // Claims of one cell are contiguous and sorted by id.
        let mut start = 0;
        while start < self.claims.len() {
            let cell = self.claims[start].0;
            let mut end = start + 1;
            while end < self.claims.len() && self.claims[end].0 == cell {
                end += 1;
            }
            for i in start..end {
                for j in i + 1..end {
                    self.current.push((self.claims[i].1, self.claims[j].1));
                }
            }
            start = end;
        }

        self.current.sort_unstable();
        self.current.dedup();

        self.events.clear();
        for &(a, b) in &self.current {
            let phase = if self.previous.binary_search(&(a, b)).is_ok() {
                CollisionPhase::Stay
            } else {
                CollisionPhase::Enter
            };
            self.events.push(CollisionEvent { a, b, phase });
        }
        for &(a, b) in &self.previous {
            if self.current.binary_search(&(a, b)).is_err() {
                self.events.push(CollisionEvent {
                    a,
                    b,
                    phase: CollisionPhase::Exit,
                });
            }
        }

        std::mem::swap(&mut self.previous, &mut self.current);
    }

    /// Events produced by the last [`end_frame`](Self::end_frame).
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Pairs overlapping as of the last completed frame, sorted.
    pub fn overlaps(&self) -> &[(EntityId, EntityId)] {
        &self.previous
    }
}

//! What host callbacks see of the running loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tui_retro_core::{Clock, InputSource, Overlay, Registry};
use tui_retro_types::{Axis, Key};

/// Cloneable exit request flag.
///
/// The loop checks it at the top of every iteration, so the tick in flight
/// always completes.
#[derive(Debug, Clone, Default)]
pub struct ExitHandle(Arc<AtomicBool>);

impl ExitHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Borrowed view of the engine handed to [`Game`](crate::Game) callbacks.
pub struct Context<'a> {
    registry: &'a Registry,
    input: &'a dyn InputSource,
    clock: &'a Clock,
    exit: &'a ExitHandle,
    overlay: &'a Overlay,
    grid: (u16, u16),
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        input: &'a dyn InputSource,
        clock: &'a Clock,
        exit: &'a ExitHandle,
        overlay: &'a Overlay,
        grid: (u16, u16),
    ) -> Self {
        Self {
            registry,
            input,
            clock,
            exit,
            overlay,
            grid,
        }
    }

    /// Grid columns.
    pub fn width(&self) -> u16 {
        self.grid.0
    }

    /// Grid rows.
    pub fn height(&self) -> u16 {
        self.grid.1
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Index of the tick being run. Starts at 0.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Seconds since the previous tick started.
    pub fn delta_time(&self) -> f32 {
        self.clock.delta_time()
    }

    pub fn poll_key(&self) -> Option<Key> {
        self.input.poll_key()
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.is_key_down(key)
    }

    pub fn axis(&self, axis: Axis) -> f32 {
        self.input.axis(axis)
    }

    /// Write `ch` at (x, y) over whatever the next frame composites there.
    /// Off-grid cells are dropped. The character stays on screen until
    /// something draws over it; repeat the call each tick to keep it on top.
    pub fn set_cell(&self, ch: char, x: i32, y: i32) {
        self.overlay.set_cell(ch, x, y);
    }

    /// Write `text` from (x, y), left to right when `horizontal`, else top
    /// to bottom. Same lifetime and clipping as [`set_cell`](Self::set_cell).
    pub fn put_str(&self, x: i32, y: i32, text: &str, horizontal: bool) {
        self.overlay.put_str(x, y, text, horizontal);
    }

    /// Stop the loop after the current tick.
    pub fn exit(&self) {
        self.exit.request();
    }

    pub fn exit_handle(&self) -> ExitHandle {
        self.exit.clone()
    }
}

//! Output surface collaborator.

use std::io;

/// Destination of flushed cells.
///
/// Implementations must ignore out-of-bounds coordinates.
pub trait OutputSurface {
    /// Write one character at a grid coordinate.
    fn write_cell(&mut self, ch: char, x: u16, y: u16);

    /// Push everything written this tick to the device.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Show a status line (window title on terminals).
    fn set_title(&mut self, _title: &str) {}
}

impl<S: OutputSurface + ?Sized> OutputSurface for &mut S {
    fn write_cell(&mut self, ch: char, x: u16, y: u16) {
        (**self).write_cell(ch, x, y);
    }

    fn present(&mut self) -> io::Result<()> {
        (**self).present()
    }

    fn set_title(&mut self, title: &str) {
        (**self).set_title(title);
    }
}

/// One recorded `write_cell` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWrite {
    pub ch: char,
    pub x: u16,
    pub y: u16,
}

/// Surface that records every in-bounds write. Useful for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u16,
    height: u16,
    writes: Vec<CellWrite>,
    title: Option<String>,
    presents: usize,
}

impl RecordingSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> &[CellWrite] {
        &self.writes
    }

    /// Drop recorded writes, keeping the allocation.
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    pub fn take_writes(&mut self) -> Vec<CellWrite> {
        std::mem::take(&mut self.writes)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn presents(&self) -> usize {
        self.presents
    }
}

impl OutputSurface for RecordingSurface {
    fn write_cell(&mut self, ch: char, x: u16, y: u16) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.writes.push(CellWrite { ch, x, y });
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_surface_drops_out_of_bounds_writes() {
        let mut s = RecordingSurface::new(2, 2);
        s.write_cell('a', 1, 1);
        s.write_cell('b', 2, 0);
        s.write_cell('c', 0, 5);
        assert_eq!(s.writes(), &[CellWrite { ch: 'a', x: 1, y: 1 }]);
    }
}

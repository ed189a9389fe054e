//! Diff renderer: flushes only the cells that changed since the last flush.
//!
//! The renderer owns the flushed baseline. After a composite it walks the
//! working grid, sends every changed cell to the output surface, and commits
//! it into the baseline. Cells untouched this tick are never sent, so
//! flushing an unchanged frame performs zero writes.

use tui_retro_types::BLANK;

use crate::grid::{CharGrid, WorkingGrid};
use crate::surface::OutputSurface;

pub struct DiffRenderer {
    flushed: CharGrid,
    // Next flush rewrites every cell.
    full: bool,
}

impl DiffRenderer {
    /// A renderer whose baseline is an all-blank surface.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            flushed: CharGrid::blank(width, height),
            full: false,
        }
    }

    /// What the output surface currently shows.
    pub fn flushed(&self) -> &CharGrid {
        &self.flushed
    }

    /// Stop trusting the surface to show the baseline, e.g. after a failed
    /// present. The next flush writes every cell.
    pub fn invalidate(&mut self) {
        self.full = true;
    }

    /// Send changed cells of `working` to `out` and commit them.
    ///
    /// Cells are visited row by row, left to right, so surfaces can coalesce
    /// adjacent writes. Returns the number of cells written.
    pub fn flush(&mut self, working: &WorkingGrid, out: &mut dyn OutputSurface) -> usize {
        let w = working.width().min(self.flushed.width());
        let h = working.height().min(self.flushed.height());

        if std::mem::take(&mut self.full) {
            return self.flush_full(working, out);
        }

        let mut writes = 0;
        for y in 0..h {
            for x in 0..w {
                let Some(Some(ch)) = working.get(x, y) else {
                    continue;
                };
                if self.flushed.get(x, y) == Some(ch) {
                    continue;
                }
                out.write_cell(ch, x, y);
                self.flushed.set(x, y, ch);
                writes += 1;
            }
        }
        writes
    }

    fn flush_full(&mut self, working: &WorkingGrid, out: &mut dyn OutputSurface) -> usize {
        let mut writes = 0;
        for y in 0..self.flushed.height() {
            for x in 0..self.flushed.width() {
                let ch = match working.get(x, y) {
                    Some(Some(ch)) => ch,
                    _ => self.flushed.get(x, y).unwrap_or(BLANK),
                };
                out.write_cell(ch, x, y);
                self.flushed.set(x, y, ch);
                writes += 1;
            }
        }
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::surface::{CellWrite, RecordingSurface};

    #[test]
    fn writes_only_changed_cells_then_nothing() {
        let mut working: WorkingGrid = Grid::new(10, 5, None);
        working.set(2, 1, Some('A'));
        working.set(3, 1, Some('B'));

        let mut diff = DiffRenderer::new(10, 5);
        let mut out = RecordingSurface::new(10, 5);
        assert_eq!(diff.flush(&working, &mut out), 2);
        assert_eq!(
            out.writes(),
            &[
                CellWrite { ch: 'A', x: 2, y: 1 },
                CellWrite { ch: 'B', x: 3, y: 1 }
            ]
        );

        out.clear();
        assert_eq!(diff.flush(&working, &mut out), 0);
        assert!(out.writes().is_empty());
        assert_eq!(diff.flushed().row_string(1), "  AB      ");
    }

    #[test]
    fn untouched_cells_are_not_changes() {
        let mut diff = DiffRenderer::new(3, 1);
        let mut out = RecordingSurface::new(3, 1);
        let mut working: WorkingGrid = Grid::new(3, 1, Some('x'));
        diff.flush(&working, &mut out);

        working.fill(None);
        out.clear();
        assert_eq!(diff.flush(&working, &mut out), 0);
        assert_eq!(diff.flushed().row_string(0), "xxx");
    }

    #[test]
    fn blank_matching_baseline_is_not_resent() {
        let mut diff = DiffRenderer::new(2, 1);
        let mut out = RecordingSurface::new(2, 1);
        let working: WorkingGrid = Grid::new(2, 1, Some(' '));
        assert_eq!(diff.flush(&working, &mut out), 0);
    }

    #[test]
    fn invalidate_rewrites_every_cell_once() {
        let mut diff = DiffRenderer::new(3, 1);
        let mut out = RecordingSurface::new(3, 1);
        let mut working: WorkingGrid = Grid::new(3, 1, None);
        working.set(0, 0, Some('a'));
        diff.flush(&working, &mut out);

        diff.invalidate();
        working.fill(None);
        working.set(2, 0, Some('c'));
        out.clear();
        assert_eq!(diff.flush(&working, &mut out), 3);
        let chars: String = out.writes().iter().map(|w| w.ch).collect();
        assert_eq!(chars, "a c");

        out.clear();
        assert_eq!(diff.flush(&working, &mut out), 0);
    }

    #[test]
    fn writes_follow_row_major_order() {
        let mut diff = DiffRenderer::new(3, 2);
        let mut out = RecordingSurface::new(3, 2);
        let mut working: WorkingGrid = Grid::new(3, 2, None);
        working.set(0, 1, Some('c'));
        working.set(2, 0, Some('b'));
        working.set(0, 0, Some('a'));
        diff.flush(&working, &mut out);

        let order: Vec<char> = out.writes().iter().map(|w| w.ch).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }
}

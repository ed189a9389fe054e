//! Fixed-size 2D cell buffers.

use tui_retro_types::BLANK;

/// Row-major grid of `Copy` cells with a fixed width and height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u16,
    height: u16,
    cells: Vec<T>,
}

/// Last-flushed characters.
pub type CharGrid = Grid<char>;

/// Cells painted during the current tick. `None` means untouched this tick,
/// which the diff treats as "no change".
pub type WorkingGrid = Grid<Option<char>>;

impl<T: Copy> Grid<T> {
    pub fn new(width: u16, height: u16, fill: T) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<T> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: T) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Set a cell addressed by signed coordinates; out-of-grid writes are dropped.
    #[inline]
    pub fn set_clipped(&mut self, x: i32, y: i32, cell: T) {
        if x < 0 || y < 0 || x > u16::MAX as i32 || y > u16::MAX as i32 {
            return;
        }
        self.set(x as u16, y as u16, cell);
    }

    pub fn fill(&mut self, cell: T) {
        self.cells.fill(cell);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, cell: T) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.set_clipped(x.saturating_add(dx), y.saturating_add(dy), cell);
            }
        }
    }
}

impl CharGrid {
    pub fn blank(width: u16, height: u16) -> Self {
        Self::new(width, height, BLANK)
    }

    /// Row `y` as a string, for tests and debugging.
    pub fn row_string(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut g = CharGrid::blank(3, 2);
        g.set(3, 0, 'X');
        g.set_clipped(-1, 0, 'X');
        g.set_clipped(0, 2, 'X');
        assert!(g.cells().iter().all(|&c| c == ' '));
        assert_eq!(g.get(3, 0), None);
    }

    #[test]
    fn fill_rect_clips_partially_visible_rects() {
        let mut g: WorkingGrid = Grid::new(4, 3, None);
        g.fill_rect(-1, 1, 3, 5, Some('#'));
        assert_eq!(g.get(0, 1), Some(Some('#')));
        assert_eq!(g.get(1, 2), Some(Some('#')));
        assert_eq!(g.get(2, 1), Some(None));
        assert_eq!(g.get(0, 0), Some(None));
    }

    #[test]
    fn row_string_reads_a_row() {
        let mut g = CharGrid::blank(4, 1);
        g.set(1, 0, 'h');
        g.set(2, 0, 'i');
        assert_eq!(g.row_string(0), " hi ");
    }
}

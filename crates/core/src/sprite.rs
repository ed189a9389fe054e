//! Character sprites with an optional collision mask.

use tui_retro_types::BLANK;

use crate::error::SpriteError;

/// A rectangular grid of characters plus an optional, same-shaped collision mask.
///
/// Cells are stored row-major. Width and height derive from the grid shape; a
/// sprite with no cells is not drawable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: usize,
    height: usize,
    cells: Vec<char>,
    mask: Option<Vec<bool>>,
    solid: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            mask: None,
            solid: true,
        }
    }
}

impl Sprite {
    /// Build a sprite from rows of characters.
    ///
    /// All rows must have the same length.
    pub fn new(rows: Vec<Vec<char>>) -> Result<Self, SpriteError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, chars) in rows.into_iter().enumerate() {
            if chars.len() != width {
                return Err(SpriteError::RaggedRows {
                    row,
                    expected: width,
                    found: chars.len(),
                });
            }
            cells.extend(chars);
        }

        // A zero-width grid has no cells regardless of its row count.
        let height = if width == 0 { 0 } else { height };
        Ok(Self {
            width,
            height,
            cells,
            mask: None,
            solid: true,
        })
    }

    /// Build a sprite from string rows, one character per cell.
    pub fn from_rows(rows: &[&str]) -> Result<Self, SpriteError> {
        Self::new(rows.iter().map(|r| r.chars().collect()).collect())
    }

    /// Attach a collision mask. Its shape must equal the character grid's.
    pub fn with_mask(mut self, mask: Vec<Vec<bool>>) -> Result<Self, SpriteError> {
        let found_h = mask.len();
        let found_w = mask.first().map_or(0, Vec::len);
        let ragged = mask.iter().any(|r| r.len() != found_w);
        if ragged || found_w != self.width || found_h != self.height {
            return Err(SpriteError::MaskShape {
                expected: (self.width, self.height),
                found: (found_w, found_h),
            });
        }
        self.mask = Some(mask.into_iter().flatten().collect());
        Ok(self)
    }

    /// Attach a mask generated from the cells: every cell collides unless its
    /// character is in `excluded`.
    pub fn with_generated_mask(mut self, excluded: &[char]) -> Self {
        self.mask = Some(self.cells.iter().map(|c| !excluded.contains(c)).collect());
        self
    }

    /// Generate a collision mask for `rows`, excluding the blank character.
    pub fn generate_mask(rows: &[Vec<char>]) -> Vec<Vec<bool>> {
        Self::generate_mask_excluding(rows, &[BLANK])
    }

    /// Generate a collision mask for `rows`, excluding every character in `excluded`.
    pub fn generate_mask_excluding(rows: &[Vec<char>], excluded: &[char]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|row| row.iter().map(|c| !excluded.contains(c)).collect())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    #[inline(always)]
    fn idx(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Whether the mask marks (x, y) as colliding. False without a mask.
    pub fn collides_at(&self, x: usize, y: usize) -> bool {
        match (&self.mask, self.idx(x, y)) {
            (Some(mask), Some(i)) => mask[i],
            _ => false,
        }
    }

    /// Row `y` of the character grid.
    pub fn row(&self, y: usize) -> &[char] {
        if y >= self.height {
            return &[];
        }
        &self.cells[y * self.width..(y + 1) * self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_derives_shape() {
        let s = Sprite::from_rows(&["AB", "CD", "EF"]).unwrap();
        assert_eq!(s.width(), 2);
        assert_eq!(s.height(), 3);
        assert_eq!(s.get(1, 2), Some('F'));
        assert_eq!(s.get(2, 0), None);
        assert_eq!(s.row(1), &['C', 'D']);
        assert!(s.is_solid());
        assert!(!s.has_mask());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Sprite::from_rows(&["ABC", "D"]).unwrap_err();
        assert_eq!(
            err,
            SpriteError::RaggedRows {
                row: 1,
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn mask_shape_mismatch_is_rejected_at_construction() {
        let s = Sprite::from_rows(&["AB"]).unwrap();
        let err = s.with_mask(vec![vec![true], vec![false]]).unwrap_err();
        assert_eq!(
            err,
            SpriteError::MaskShape {
                expected: (2, 1),
                found: (1, 2)
            }
        );
    }

    #[test]
    fn generated_mask_skips_excluded_chars() {
        let s = Sprite::from_rows(&["A B", "#.#"])
            .unwrap()
            .with_generated_mask(&[' ', '.']);
        assert!(s.collides_at(0, 0));
        assert!(!s.collides_at(1, 0));
        assert!(!s.collides_at(1, 1));
        assert!(s.collides_at(2, 1));
        assert!(!s.collides_at(5, 5));
    }

    #[test]
    fn static_mask_generation_defaults_to_blank() {
        let rows = vec![vec!['x', ' '], vec![' ', 'y']];
        assert_eq!(
            Sprite::generate_mask(&rows),
            vec![vec![true, false], vec![false, true]]
        );
        let s = Sprite::new(rows.clone())
            .unwrap()
            .with_mask(Sprite::generate_mask(&rows))
            .unwrap();
        assert!(s.collides_at(1, 1));
    }

    #[test]
    fn default_sprite_is_empty() {
        let s = Sprite::default();
        assert!(s.is_empty());
        assert_eq!(s.width(), 0);
        assert_eq!(s.height(), 0);
        assert!(Sprite::from_rows(&["", ""]).unwrap().is_empty());
    }
}

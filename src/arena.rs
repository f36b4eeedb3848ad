//! Arena: the grid of settled cells, collision test, merge and line sweep.

use crate::error::GameError;
use crate::piece::{Cell, Matrix};
use std::collections::VecDeque;

pub const DEFAULT_WIDTH: usize = 12;
pub const DEFAULT_HEIGHT: usize = 20;

/// Board-relative offset of a shape matrix's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Fixed-size grid. y=0 is top; rows are stored [0..height].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        let rows = (0..height).map(|_| vec![0; width]).collect();
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&c| c == 0))
    }

    /// Reset every cell to 0.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    /// Signed lookup; anything outside the board reads as occupied.
    fn occupied_at(&self, x: i32, y: i32) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return true;
        };
        self.get(x, y).is_none_or(|c| c != 0)
    }

    /// True if any nonzero matrix cell lands on a wall, the floor, the ceiling
    /// or a settled cell when the matrix is placed at `pos`.
    pub fn collides(&self, matrix: &Matrix, pos: Position) -> bool {
        matrix
            .occupied()
            .any(|(x, y, _)| self.occupied_at(x as i32 + pos.x, y as i32 + pos.y))
    }

    /// Write `color` into every cell covered by the matrix at `pos`.
    pub fn merge(&mut self, matrix: &Matrix, pos: Position, color: Cell) {
        for (x, y, _) in matrix.occupied() {
            let (gx, gy) = (x as i32 + pos.x, y as i32 + pos.y);
            if let (Ok(gx), Ok(gy)) = (usize::try_from(gx), usize::try_from(gy)) {
                self.set(gx, gy, color);
            }
        }
    }

    /// Remove full rows from the bottom up to row 1, pushing an empty row on top
    /// for each. Row 0 is never checked. Returns the number of rows removed.
    pub fn sweep(&mut self) -> usize {
        let mut removed = 0;
        let mut y = self.height - 1;
        while y > 0 {
            if self.rows[y].iter().all(|&c| c != 0) {
                if let Some(mut row) = self.rows.remove(y) {
                    row.fill(0);
                    self.rows.push_front(row);
                    removed += 1;
                }
                // Same index again: the row above has shifted into it.
                continue;
            }
            y -= 1;
        }
        removed
    }
}

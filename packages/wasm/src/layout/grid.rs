//! Shuffled grid placement.
//!
//! The safe area is tiled into square cells sized so that even the largest
//! (focused) node fits a cell without touching its neighbours. Cell centers
//! are drawn in random order and node `i` takes cell `i mod cells`.
//!
//! Spacing comes entirely from the cell geometry; there is no second pass that
//! resolves overlap. When there are more nodes than cells, nodes share cell
//! centers.

use rand::Rng;
use rand::seq::index;
use tracing::warn;

use super::viewport::SafeArea;
use crate::geometry::{Position, clamp};

/// Grid placer for one safe area and cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlacer {
    safe: SafeArea,
    cell_size: f32,
}

impl GridPlacer {
    pub fn new(safe: SafeArea, cell_size: f32) -> Self {
        Self {
            safe,
            cell_size: cell_size.max(1.0),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of columns and rows, each at least one.
    pub fn grid_dims(&self) -> (usize, usize) {
        let cols = (self.safe.width() / self.cell_size).floor().max(1.0) as usize;
        let rows = (self.safe.height() / self.cell_size).floor().max(1.0) as usize;
        (cols, rows)
    }

    /// Total cells, saturating for absurdly large areas.
    pub fn cell_count(&self) -> usize {
        let (cols, rows) = self.grid_dims();
        cols.saturating_mul(rows)
    }

    /// Center of the cell at row-major `index`.
    pub fn cell_center(&self, index: usize) -> Position {
        let (cols, _) = self.grid_dims();
        let (col, row) = (index % cols, index / cols);
        let x = self.safe.left + self.cell_size * (col as f32 + 0.5);
        let y = self.safe.top + self.cell_size * (row as f32 + 0.5);
        // Only bites when the safe area is narrower than one cell.
        Position::new(
            clamp(x, self.safe.left, self.safe.right),
            clamp(y, self.safe.top, self.safe.bottom),
        )
    }

    /// Place `count` nodes.
    ///
    /// Zero nodes yield nothing and a single node sits at the center of the
    /// safe area. Otherwise `count` distinct cells are drawn uniformly (the
    /// prefix of a shuffle, without building the whole grid) and node `i`
    /// takes pick `i mod picks`.
    pub fn place<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Position> {
        match count {
            0 => return Vec::new(),
            1 => return vec![self.safe.center()],
            _ => {}
        }

        let cells = self.cell_count();
        if count > cells {
            warn!(nodes = count, cells, "more nodes than grid cells; some nodes share a cell");
        }

        let picked = index::sample(rng, cells, count.min(cells));
        picked
            .into_iter()
            .cycle()
            .take(count)
            .map(|cell| self.cell_center(cell))
            .collect()
    }
}

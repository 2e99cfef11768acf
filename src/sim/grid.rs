/// The board: a fixed `columns x rows` layout of bits.
///
/// Cells are stored row-major. `active_count` is maintained incrementally
/// and must always equal a live recount; the board is cleared exactly when
/// it reaches zero.

use rand::Rng;

use crate::config::GridConfig;
use crate::domain::cell::{Cell, ClickResult};
use crate::domain::countdown::Countdown;
use crate::ui::canvas::Canvas;

/// Vertical offset of the first row, in cells. Leaves room for the timer bar.
const TOP_MARGIN: f32 = 2.5;

/// One bit cleared by a click.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellHit {
    pub col: usize,
    pub row: usize,
    pub corrupted: bool,
}

#[derive(Clone, Debug)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<Cell>,
    active_count: usize,
}

impl Grid {
    /// Lay out a freshly randomized board. Bit `(col, row)` sits at
    /// `(size * (col + 1), size * (row + 2.5))`.
    pub fn build<R: Rng + ?Sized>(cfg: &GridConfig, rng: &mut R) -> Self {
        let size = cfg.cell_size;
        let mut cells = Vec::with_capacity(cfg.columns * cfg.rows);
        for row in 0..cfg.rows {
            for col in 0..cfg.columns {
                let x = size * (col as f32 + 1.0);
                let y = size * (row as f32 + TOP_MARGIN);
                cells.push(Cell::random(x, y, size, cfg.corruption_odds, rng));
            }
        }
        Grid::from_cells(cfg.columns, cfg.rows, size, cells)
    }

    /// Wrap pre-built cells (row-major, `columns * rows` of them).
    pub fn from_cells(columns: usize, rows: usize, cell_size: f32, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), columns * rows);
        let mut grid = Grid { columns, rows, cell_size, cells, active_count: 0 };
        grid.active_count = grid.recount();
        grid
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[allow(dead_code)]
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.columns && row < self.rows {
            self.cells.get(row * self.columns + col)
        } else {
            None
        }
    }

    #[allow(dead_code)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Count active bits from scratch.
    pub fn recount(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.active_count == 0
    }

    /// Offer the click to every bit. Edges are inclusive, so a point on a
    /// shared border clears both neighbours. Each corrupted hit costs the
    /// countdown one penalty.
    pub fn handle_click(&mut self, x: f32, y: f32, countdown: &mut Countdown) -> Vec<CellHit> {
        let mut hits = Vec::new();
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let result = cell.click(x, y);
            if !result.hit() {
                continue;
            }
            self.active_count -= 1;
            let corrupted = result == ClickResult::DeactivatedCorrupted;
            if corrupted {
                countdown.penalize();
            }
            hits.push(CellHit {
                col: i % self.columns,
                row: i / self.columns,
                corrupted,
            });
        }
        hits
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, countdown: &Countdown) {
        for cell in &self.cells {
            cell.render(canvas);
        }
        countdown.render(canvas, self.cell_size);
    }
}

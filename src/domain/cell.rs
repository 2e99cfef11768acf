/// A single bit on the board.
///
/// Bits only ever go one way: active → inactive. The `corrupted` flag is
/// rolled once at creation and only matters while the bit is active; after
/// that it survives purely as a visual tell.

use rand::Rng;

use crate::domain::geometry::{self, Rect};
use crate::ui::canvas::Canvas;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickResult {
    /// Point missed, or the bit was already cleared.
    None,
    Deactivated,
    DeactivatedCorrupted,
}

impl ClickResult {
    pub fn hit(self) -> bool {
        self != ClickResult::None
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Cell {
    rect: Rect,
    active: bool,
    corrupted: bool,
}

impl Cell {
    /// Roll a fresh bit: a fair coin for `active`, then a
    /// 1-in-`corruption_odds` draw for `corrupted`.
    pub fn random<R: Rng + ?Sized>(x: f32, y: f32, size: f32, corruption_odds: u32, rng: &mut R) -> Self {
        let active = rng.random_bool(0.5);
        let corrupted = active && rng.random_ratio(1, corruption_odds.max(1));
        Cell::with_state(x, y, size, active, corrupted)
    }

    pub fn with_state(x: f32, y: f32, size: f32, active: bool, corrupted: bool) -> Self {
        Cell {
            rect: Rect::new(x, y, size, size),
            active,
            corrupted: active && corrupted,
        }
    }

    #[allow(dead_code)]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[allow(dead_code)]
    pub fn is_corrupted(&self) -> bool {
        self.corrupted
    }

    pub fn point_inside(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }

    /// Deactivate the bit if it is active and `(x, y)` lands on it.
    /// The caller owns the bookkeeping (active count, timer penalty).
    pub fn click(&mut self, x: f32, y: f32) -> ClickResult {
        if !self.active || !self.point_inside(x, y) {
            return ClickResult::None;
        }
        self.active = false;
        if self.corrupted {
            ClickResult::DeactivatedCorrupted
        } else {
            ClickResult::Deactivated
        }
    }

    /// Active bits draw in the base colour. A cleared bit draws nothing,
    /// unless it was corrupted, in which case it leaves a red mark.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if self.active {
            canvas.set_draw_color(geometry::BIT);
            canvas.fill_rect(self.rect);
        } else if self.corrupted {
            canvas.set_draw_color(geometry::CORRUPTED_TELL);
            canvas.fill_rect(self.rect);
        }
    }
}

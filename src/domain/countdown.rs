/// The shared time budget for a round.
///
/// `remaining` never increases except through `reset()`. It drains a fixed
/// amount per second while positive and loses a fraction of itself on every
/// corrupted click. The bar drawn on screen is exactly `remaining` units wide.

use crate::config::TimerConfig;
use crate::domain::geometry::{self, Rect};
use crate::ui::canvas::Canvas;

/// Decay is specified per twelfth of a second of game clock.
const DECAY_DIVISOR: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    remaining: f32,
    initial: f32,
    decay_rate: f32,
    clock_scale: f32,
    penalty_divisor: f32,
}

impl Countdown {
    pub fn new(cfg: &TimerConfig) -> Self {
        Countdown {
            remaining: cfg.initial,
            initial: cfg.initial,
            decay_rate: cfg.decay_rate,
            clock_scale: cfg.clock_scale,
            penalty_divisor: cfg.penalty_divisor,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Drain `dt` seconds worth of time. Stops draining once at or below
    /// zero; the last tick may overshoot below zero.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= self.decay_rate / DECAY_DIVISOR * dt * self.clock_scale;
        }
    }

    /// Cut a fixed fraction of what is left.
    pub fn penalize(&mut self) {
        self.remaining -= self.remaining / self.penalty_divisor;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }

    /// Bar sitting above the grid, one cell in from the left edge.
    pub fn bar(&self, cell_size: f32) -> Rect {
        Rect::new(
            cell_size,
            cell_size * 2.0 / 3.0,
            self.remaining.max(0.0),
            cell_size,
        )
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, cell_size: f32) {
        canvas.set_draw_color(geometry::TIMER_BAR);
        canvas.fill_rect(self.bar(cell_size));
    }
}

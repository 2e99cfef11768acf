/// Shared geometry and colour primitives.
///
/// All positions are in logical surface units (the 270x600 playfield of the
/// default layout). The renderer decides how a logical unit maps to the
/// terminal.

/// Axis-aligned rectangle in logical units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Containment test, inclusive on all four edges.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.w && y <= self.y + self.h
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

// ── Palette ──

pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);
pub const BIT: Rgb = Rgb::new(255, 255, 255);
/// Left behind by a corrupted bit after it was cleared.
pub const CORRUPTED_TELL: Rgb = Rgb::new(255, 0, 0);
pub const TIMER_BAR: Rgb = Rgb::new(255, 255, 255);
pub const MENU_MARKER: Rgb = Rgb::new(255, 255, 0);
pub const CLEARED_MARKER: Rgb = Rgb::new(0, 255, 0);
pub const EXPIRED_MARKER: Rgb = Rgb::new(255, 0, 0);
pub const TITLE_TEXT: Rgb = Rgb::new(0, 255, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 30.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(40.0, 50.0));
        assert!(r.contains(25.0, 35.0));
    }

    #[test]
    fn contains_rejects_outside() {
        let r = Rect::new(10.0, 20.0, 30.0, 30.0);
        assert!(!r.contains(9.9, 35.0));
        assert!(!r.contains(40.1, 35.0));
        assert!(!r.contains(25.0, 19.9));
        assert!(!r.contains(25.0, 50.1));
    }
}

/// Drawing surface abstraction.
///
/// The game only ever talks to a `Canvas`: pick a colour, fill rectangles,
/// blit the title banner, present. Everything is expressed in logical
/// surface units; the backend owns the mapping onto real output.

use std::io;

use crate::domain::geometry::{Rect, Rgb};

pub trait Canvas {
    /// Fill the whole surface with the current draw colour.
    fn clear(&mut self);
    fn set_draw_color(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect);
    fn draw_texture(&mut self, texture: &Texture, x: f32, y: f32);
    fn present(&mut self) -> io::Result<()>;

    /// Current logical ↔ device mapping, used to translate mouse input.
    fn viewport(&self) -> Viewport {
        Viewport::IDENTITY
    }
}

/// Title banner handle. Owned by whoever loads it; the terminal backend
/// draws `label` centred inside a `width` x `height` box.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

const TITLE_HEIGHT: f32 = 47.0;
/// Gap between the title banner's top edge and the bottom of the surface.
const TITLE_BOTTOM_OFFSET: f32 = 55.0;
/// Space below the last grid row reserved for the title.
const FOOTER: f32 = 75.0;

/// Logical surface dimensions for a given grid layout.
///
/// The default 7x15 grid of 30-unit bits gives the classic 270x600 field.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn for_layout(columns: usize, rows: usize, cell_size: f32) -> Self {
        Surface {
            width: cell_size * (columns as f32 + 2.0),
            height: cell_size * (rows as f32 + 2.5) + FOOTER,
        }
    }

    /// Where the title banner goes: bottom strip, full width.
    pub fn title_origin(&self) -> (f32, f32) {
        (0.0, self.height - TITLE_BOTTOM_OFFSET)
    }

    pub fn title_texture(&self, label: &str, color: Rgb) -> Texture {
        Texture {
            label: label.to_string(),
            width: self.width,
            height: TITLE_HEIGHT,
            color,
        }
    }
}

/// Mapping between logical units and device cells.
///
/// `device = logical * scale + offset`. For the terminal backend one device
/// cell is one character cell, and the surface is centred in the window.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    pub const IDENTITY: Viewport = Viewport { scale_x: 1.0, scale_y: 1.0, offset_x: 0.0, offset_y: 0.0 };

    /// Fit `surface` into `cols` x `rows` device cells, keeping its aspect
    /// ratio. `cell_aspect` is a device cell's height over its width
    /// (about 2 for a terminal glyph).
    pub fn fit(surface: Surface, cols: usize, rows: usize, cell_aspect: f32) -> Self {
        let cols = cols.max(1) as f32;
        let rows = rows.max(1) as f32;
        // Logical units per device column
        let unit = (surface.width / cols)
            .max(surface.height / (rows * cell_aspect))
            .max(f32::EPSILON);
        let scale_x = 1.0 / unit;
        let scale_y = 1.0 / (unit * cell_aspect);
        Viewport {
            scale_x,
            scale_y,
            offset_x: ((cols - surface.width * scale_x) / 2.0).max(0.0).floor(),
            offset_y: ((rows - surface.height * scale_y) / 2.0).max(0.0).floor(),
        }
    }

    /// Centre of device cell `(col, row)` in logical units.
    pub fn to_logical(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5 - self.offset_x) / self.scale_x,
            (row as f32 + 0.5 - self.offset_y) / self.scale_y,
        )
    }

    /// Device columns `[lo, hi)` covered by the logical span `[x, x + w]`.
    /// Never empty, so thin shapes stay visible.
    pub fn columns(&self, x: f32, w: f32) -> (usize, usize) {
        span(x, w, self.scale_x, self.offset_x)
    }

    /// Device rows `[lo, hi)` covered by the logical span `[y, y + h]`.
    pub fn rows(&self, y: f32, h: f32) -> (usize, usize) {
        span(y, h, self.scale_y, self.offset_y)
    }
}

fn span(start: f32, len: f32, scale: f32, offset: f32) -> (usize, usize) {
    let lo = (start * scale + offset).round().max(0.0) as usize;
    let hi = ((start + len) * scale + offset).round().max(0.0) as usize;
    (lo, hi.max(lo + 1))
}

// ── Test double ──

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Rgb),
    Fill(Rgb, Rect),
    Texture(String, f32, f32),
    Present,
}

/// Canvas that records every call, for asserting on what a scene draws.
#[cfg(test)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    color: Rgb,
}

#[cfg(test)]
impl RecordingCanvas {
    pub fn new() -> Self {
        RecordingCanvas { ops: Vec::new(), color: Rgb::new(0, 0, 0) }
    }

    /// All rectangles filled with `color`, in draw order.
    pub fn fills_with(&self, color: Rgb) -> Vec<Rect> {
        self.ops.iter()
            .filter_map(|op| match op {
                DrawOp::Fill(c, r) if *c == color => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn textures(&self) -> Vec<(String, f32, f32)> {
        self.ops.iter()
            .filter_map(|op| match op {
                DrawOp::Texture(label, x, y) => Some((label.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear(self.color));
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Fill(self.color, rect));
    }

    fn draw_texture(&mut self, texture: &Texture, x: f32, y: f32) {
        self.ops.push(DrawOp::Texture(texture.label.clone(), x, y));
    }

    fn present(&mut self) -> io::Result<()> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }
}

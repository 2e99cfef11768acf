/// Terminal backend for `Canvas`: double-buffered, diff-based.
///
/// How it works:
///   1. Draw calls paint character cells in the `front` buffer
///   2. `present()` compares each cell with `back` (previous frame)
///   3. Only cells that changed are emitted, batched with `queue!`
///   4. One flush, then front/back swap
///
/// Logical rectangles are mapped to character cells through a `Viewport`
/// that keeps the playfield's aspect ratio and centres it in the terminal.
/// It is recomputed whenever the terminal is resized.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::geometry::{Rect, Rgb};
use crate::ui::canvas::{Canvas, Surface, Texture, Viewport};

/// A terminal glyph is roughly twice as tall as it is wide.
const GLYPH_ASPECT: f32 = 2.0;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Sentinel used to invalidate the back buffer so every position is diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn blank(bg: Color) -> Self {
        Cell { ch: ' ', fg: Color::White, bg }
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::blank(Color::Black); w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::blank(Color::Black); w * h];
        }
    }

    fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::blank(Color::Black)
        }
    }

    /// Paint the background of every cell in `[x0, x1) x [y0, y1)`.
    fn fill_area(&mut self, (x0, x1): (usize, usize), (y0, y1): (usize, usize), bg: Color) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.set(x, y, Cell::blank(bg));
            }
        }
    }

    /// Write a string at (x, y), keeping each cell's existing background.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            let cx = x + i;
            if cx >= self.width { break; }
            let bg = self.get(cx, y).bg;
            self.set(cx, y, Cell { ch, fg, bg });
        }
    }
}

// ── TerminalCanvas ──

pub struct TerminalCanvas {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    surface: Surface,
    viewport: Viewport,
    color: Color,
}

impl TerminalCanvas {
    pub fn new(surface: Surface) -> Self {
        TerminalCanvas {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            surface,
            viewport: Viewport::IDENTITY,
            color: Color::Black,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        self.sync_size()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Pick up terminal resizes; forces a full repaint when the size changed.
    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.front.width || th != self.front.height {
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.back.fill(Cell::INVALID);
            self.viewport = Viewport::fit(self.surface, tw, th, GLYPH_ASPECT);
            log::debug!("renderer: terminal {tw}x{th}, viewport {:?}", self.viewport);
            queue!(self.writer, Clear(ClearType::All))?;
        }
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                // Position cursor if it isn't already right here
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }

                // Set colors only if changed
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Canvas for TerminalCanvas {
    fn clear(&mut self) {
        if let Err(e) = self.sync_size() {
            log::warn!("renderer: resize check failed: {e}");
        }
        self.front.fill(Cell::blank(self.color));
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.color = term_color(color);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let cols = self.viewport.columns(rect.x, rect.w);
        let rows = self.viewport.rows(rect.y, rect.h);
        self.front.fill_area(cols, rows, self.color);
    }

    /// The title is drawn as its label, centred in the texture's box.
    fn draw_texture(&mut self, texture: &Texture, x: f32, y: f32) {
        let (c0, c1) = self.viewport.columns(x, texture.width);
        let (r0, r1) = self.viewport.rows(y, texture.height);
        let row = r0 + (r1 - r0) / 2;
        let len = texture.label.chars().count();
        let col = c0 + (c1 - c0).saturating_sub(len) / 2;
        self.front.put_str(col, row, &texture.label, term_color(texture.color));
    }

    fn present(&mut self) -> io::Result<()> {
        self.flush_diff()?;
        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_area_clips_to_buffer() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill_area((2, 10), (1, 10), Color::Red);
        assert_eq!(fb.get(1, 1).bg, Color::Black);
        assert_eq!(fb.get(2, 1).bg, Color::Red);
        assert_eq!(fb.get(3, 2).bg, Color::Red);
        assert_eq!(fb.get(3, 0).bg, Color::Black);
    }

    #[test]
    fn put_str_keeps_background() {
        let mut fb = FrameBuffer::new(5, 1);
        fb.fill_area((0, 5), (0, 1), Color::Blue);
        fb.put_str(3, 0, "abc", Color::Green);
        assert_eq!(fb.get(3, 0), Cell { ch: 'a', fg: Color::Green, bg: Color::Blue });
        assert_eq!(fb.get(4, 0).ch, 'b');
        // Clipped at the right edge
        assert_eq!(fb.get(5, 0), Cell::blank(Color::Black));
    }

    #[test]
    fn resize_resets_cells() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.fill(Cell::INVALID);
        fb.resize(3, 1);
        assert_eq!(fb.cells.len(), 3);
        assert!(fb.cells.iter().all(|c| *c == Cell::blank(Color::Black)));
    }
}

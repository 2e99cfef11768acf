/// Input and timing sources for the frame driver.
///
/// Terminal events are drained without blocking once per frame and reduced
/// to the three shapes the game cares about: quit, key down, mouse down.
/// Mouse positions arrive in terminal cells and are mapped back to logical
/// surface units through the canvas viewport.

use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind, poll,
};

use crate::ui::canvas::Viewport;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputEvent {
    Quit,
    KeyDown(KeyCode),
    /// Left button pressed, in logical surface units.
    MouseDown { x: f32, y: f32 },
}

pub trait EventSource {
    /// Everything that arrived since the last call, oldest first.
    fn poll_events(&mut self, viewport: &Viewport) -> Vec<InputEvent>;
}

pub trait Clock {
    /// Seconds since the previous call (or since creation, on the first call).
    fn elapsed_seconds(&mut self) -> f32;
}

// ── Terminal ──

pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll_events(&mut self, viewport: &Viewport) -> Vec<InputEvent> {
        let mut events = Vec::new();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(ev) = translate_key(key) {
                        events.push(ev);
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    if let Some(ev) = translate_mouse(mouse, viewport) {
                        events.push(ev);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("input: event read failed: {e}");
                    break;
                }
            }
        }

        events
    }
}

/// Raw mode swallows SIGINT, so Ctrl+C is reported as a quit request.
fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
    if ctrl_c {
        Some(InputEvent::Quit)
    } else {
        Some(InputEvent::KeyDown(key.code))
    }
}

fn translate_mouse(mouse: MouseEvent, viewport: &Viewport) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (x, y) = viewport.to_logical(mouse.column, mouse.row);
            Some(InputEvent::MouseDown { x, y })
        }
        _ => None,
    }
}

// ── Wall clock ──

pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock { last: Instant::now() }
    }
}

impl Clock for WallClock {
    fn elapsed_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

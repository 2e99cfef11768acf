/// The frame loop.
///
/// One iteration, always in this order:
///   1. Drain input: quit/Escape stop the loop, mouse presses go to the scene
///   2. Measure elapsed time since the previous frame
///   3. Update the scene
///   4. Clear, render, present
///
/// A stop request still finishes the current frame; the loop exits before
/// starting the next one.

use std::io;
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::domain::geometry;
use crate::sim::event::GameEvent;
use crate::sim::scene::SceneController;
use crate::ui::canvas::Canvas;
use crate::ui::input::{Clock, EventSource, InputEvent};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct FrameDriver<C, E, K> {
    controller: SceneController,
    canvas: C,
    events: E,
    clock: K,
    frame_sleep: Duration,
}

impl<C: Canvas, E: EventSource, K: Clock> FrameDriver<C, E, K> {
    pub fn new(controller: SceneController, canvas: C, events: E, clock: K, frame_sleep: Duration) -> Self {
        FrameDriver { controller, canvas, events, clock, frame_sleep }
    }

    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Run frames until a quit request.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if self.run_frame()? == Flow::Stop {
                return Ok(());
            }
            if !self.frame_sleep.is_zero() {
                std::thread::sleep(self.frame_sleep);
            }
        }
    }

    pub fn run_frame(&mut self) -> io::Result<Flow> {
        let mut flow = Flow::Continue;

        let viewport = self.canvas.viewport();
        for input in self.events.poll_events(&viewport) {
            if flow == Flow::Stop {
                break;
            }
            match input {
                InputEvent::Quit | InputEvent::KeyDown(KeyCode::Esc) => {
                    log::info!("quit requested");
                    flow = Flow::Stop;
                }
                InputEvent::KeyDown(_) => {}
                InputEvent::MouseDown { x, y } => {
                    log::trace!("mouse down at ({x:.1}, {y:.1})");
                    let events = self.controller.handle_mouse_down(x, y);
                    log_events(&events);
                }
            }
        }

        let dt = self.clock.elapsed_seconds();
        let events = self.controller.update(dt);
        log_events(&events);

        self.canvas.set_draw_color(geometry::BACKGROUND);
        self.canvas.clear();
        self.controller.render(&mut self.canvas);
        self.canvas.present()?;

        Ok(flow)
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::RoundStarted { round, active } => {
                log::info!("round {round} started with {active} active bits");
            }
            GameEvent::CellCleared { col, row, corrupted } => {
                log::debug!("cleared bit ({col}, {row}){}", if *corrupted { " [corrupted]" } else { "" });
            }
            GameEvent::TimePenalized { remaining } => {
                log::debug!("corruption penalty, {remaining:.1} left");
            }
            GameEvent::RoundCleared { round } => log::info!("round {round} cleared"),
            GameEvent::TimeExpired { round } => log::info!("round {round} lost: time expired"),
            GameEvent::ReturnedToMenu => log::info!("back to menu"),
        }
    }
}

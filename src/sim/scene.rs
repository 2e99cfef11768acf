/// Scene state machine: Menu → Play → End → Menu.
///
/// The controller owns every piece of mutable game state (board, clock,
/// RNG, round counter). The frame driver is its only caller and hands it
/// input, elapsed time and a canvas, in that order, once per frame.
///
/// Transition table:
///
/// | scene | trigger                 | next                 |
/// |-------|-------------------------|----------------------|
/// | Menu  | mouse down              | Play (fresh round)   |
/// | Play  | board cleared on update | End(Cleared)         |
/// | Play  | clock expired on update | End(TimeExpired)     |
/// | End   | mouse down              | Menu                 |
///
/// Leaving Play always primes a fresh board and a full clock right away,
/// so Play state is already reset while the End screen is showing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{GameConfig, GridConfig};
use crate::domain::countdown::Countdown;
use crate::domain::geometry::{self, Rect, Rgb};
use crate::ui::canvas::{Canvas, Surface, Texture};
use super::event::GameEvent;
use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// Every active bit was cleared.
    Cleared,
    /// The countdown ran out mid-round.
    TimeExpired,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scene {
    Menu,
    Play,
    End(Outcome),
}

pub struct SceneController {
    scene: Scene,
    grid: Grid,
    countdown: Countdown,
    grid_cfg: GridConfig,
    rng: Pcg32,
    title: Texture,
    title_origin: (f32, f32),
    round: u32,
}

impl SceneController {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        // Placeholder board until the first Menu click. It consumes one board
        // of draws, so round 1 uses the second layout from `seed`.
        let grid_cfg = config.grid.clone();
        let surface = Surface::for_layout(grid_cfg.columns, grid_cfg.rows, grid_cfg.cell_size);

        SceneController {
            scene: Scene::Menu,
            grid: Grid::build(&grid_cfg, &mut rng),
            countdown: Countdown::new(&config.timer),
            title: surface.title_texture(&config.general.title, geometry::TITLE_TEXT),
            title_origin: surface.title_origin(),
            grid_cfg,
            rng,
            round: 0,
        }
    }

    #[allow(dead_code)]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    #[allow(dead_code)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[allow(dead_code)]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Number of rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn handle_mouse_down(&mut self, x: f32, y: f32) -> Vec<GameEvent> {
        match self.scene {
            Scene::Menu => {
                let started = self.start_round();
                self.scene = Scene::Play;
                vec![started]
            }
            Scene::Play => {
                let mut events = Vec::new();
                for hit in self.grid.handle_click(x, y, &mut self.countdown) {
                    events.push(GameEvent::CellCleared {
                        col: hit.col,
                        row: hit.row,
                        corrupted: hit.corrupted,
                    });
                    if hit.corrupted {
                        events.push(GameEvent::TimePenalized {
                            remaining: self.countdown.remaining(),
                        });
                    }
                }
                events
            }
            Scene::End(_) => {
                self.scene = Scene::Menu;
                vec![GameEvent::ReturnedToMenu]
            }
        }
    }

    /// Advance the clock by `dt` seconds. Only Play has anything to advance.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.scene != Scene::Play {
            return vec![];
        }

        self.countdown.tick(dt);

        let outcome = if self.grid.is_cleared() {
            Outcome::Cleared
        } else if self.countdown.is_expired() {
            Outcome::TimeExpired
        } else {
            return vec![];
        };

        self.scene = Scene::End(outcome);
        let round = self.round;
        self.prime_round();

        match outcome {
            Outcome::Cleared => vec![GameEvent::RoundCleared { round }],
            Outcome::TimeExpired => vec![GameEvent::TimeExpired { round }],
        }
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self.scene {
            Scene::Menu => self.render_marker(canvas, geometry::MENU_MARKER),
            Scene::Play => self.grid.render(canvas, &self.countdown),
            Scene::End(Outcome::Cleared) => self.render_marker(canvas, geometry::CLEARED_MARKER),
            Scene::End(Outcome::TimeExpired) => self.render_marker(canvas, geometry::EXPIRED_MARKER),
        }
        let (x, y) = self.title_origin;
        canvas.draw_texture(&self.title, x, y);
    }

    /// The single-square "start"/"restart" marker.
    pub fn marker(&self) -> Rect {
        let s = self.grid_cfg.cell_size;
        Rect::new(s * 4.0, s * 7.0, s, s)
    }

    // ── Internal ──

    fn render_marker<C: Canvas + ?Sized>(&self, canvas: &mut C, color: Rgb) {
        canvas.set_draw_color(color);
        canvas.fill_rect(self.marker());
    }

    fn start_round(&mut self) -> GameEvent {
        self.prime_round();
        self.round += 1;
        GameEvent::RoundStarted {
            round: self.round,
            active: self.grid.active_count(),
        }
    }

    /// Fresh board, full clock.
    fn prime_round(&mut self) {
        self.grid = Grid::build(&self.grid_cfg, &mut self.rng);
        self.countdown.reset();
    }

    #[cfg(test)]
    pub(crate) fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;
    use crate::ui::canvas::RecordingCanvas;

    fn controller() -> SceneController {
        SceneController::new(&GameConfig::default(), 2024)
    }

    fn one_bit(corrupted: bool) -> Grid {
        Grid::from_cells(1, 1, 30.0, vec![Cell::with_state(0.0, 0.0, 30.0, true, corrupted)])
    }

    #[test]
    fn starts_in_menu() {
        let sc = controller();
        assert_eq!(sc.scene(), Scene::Menu);
        assert_eq!(sc.round(), 0);
    }

    #[test]
    fn menu_click_starts_fresh_round() {
        let mut sc = controller();
        let events = sc.handle_mouse_down(0.0, 0.0);
        assert_eq!(sc.scene(), Scene::Play);
        assert_eq!(sc.round(), 1);
        assert_eq!(sc.countdown().remaining(), 210.0);
        assert_eq!(sc.grid().active_count(), sc.grid().recount());
        assert_eq!(
            events,
            vec![GameEvent::RoundStarted { round: 1, active: sc.grid().active_count() }]
        );
    }

    #[test]
    fn first_round_uses_second_layout_from_seed() {
        let cfg = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        let _placeholder = Grid::build(&cfg.grid, &mut rng);
        let expected = Grid::build(&cfg.grid, &mut rng);

        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        assert_eq!(sc.grid().cells(), expected.cells());
    }

    #[test]
    fn clearing_board_ends_round_and_primes_next() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.set_grid(one_bit(false));

        let events = sc.handle_mouse_down(15.0, 15.0);
        assert_eq!(events, vec![GameEvent::CellCleared { col: 0, row: 0, corrupted: false }]);
        // Transition happens on update, not on the click itself
        assert_eq!(sc.scene(), Scene::Play);

        let events = sc.update(0.016);
        assert_eq!(sc.scene(), Scene::End(Outcome::Cleared));
        assert_eq!(events, vec![GameEvent::RoundCleared { round: 1 }]);
        // Next round already primed
        assert_eq!(sc.grid().columns(), 7);
        assert_eq!(sc.grid().rows(), 15);
        assert_eq!(sc.countdown().remaining(), 210.0);
    }

    #[test]
    fn corrupted_click_reports_penalty() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.set_grid(one_bit(true));
        let events = sc.handle_mouse_down(1.0, 1.0);
        assert_eq!(events.len(), 2);
        match events[1] {
            GameEvent::TimePenalized { remaining } => assert!((remaining - 175.0).abs() < 1e-4),
            ref other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn expiry_ends_round_without_crashing() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.set_grid(one_bit(false));

        assert!(sc.update(10.0).is_empty());
        assert_eq!(sc.scene(), Scene::Play);

        // 210 / 2.5 = 84 seconds of clock in total
        let events = sc.update(80.0);
        assert_eq!(sc.scene(), Scene::End(Outcome::TimeExpired));
        assert_eq!(events, vec![GameEvent::TimeExpired { round: 1 }]);
        assert_eq!(sc.countdown().remaining(), 210.0);
    }

    #[test]
    fn cleared_beats_expiry_on_same_frame() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.set_grid(one_bit(false));
        sc.handle_mouse_down(15.0, 15.0);
        sc.update(500.0);
        assert_eq!(sc.scene(), Scene::End(Outcome::Cleared));
    }

    #[test]
    fn end_click_returns_to_menu() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.set_grid(one_bit(false));
        sc.handle_mouse_down(15.0, 15.0);
        sc.update(0.0);

        let events = sc.handle_mouse_down(999.0, 999.0);
        assert_eq!(sc.scene(), Scene::Menu);
        assert_eq!(events, vec![GameEvent::ReturnedToMenu]);

        sc.handle_mouse_down(0.0, 0.0);
        assert_eq!(sc.scene(), Scene::Play);
        assert_eq!(sc.round(), 2);
    }

    #[test]
    fn update_outside_play_is_inert() {
        let mut sc = controller();
        let before = sc.countdown().clone();
        assert!(sc.update(1000.0).is_empty());
        assert_eq!(sc.scene(), Scene::Menu);
        assert_eq!(sc.countdown(), &before);
    }

    #[test]
    fn render_per_scene() {
        let mut sc = controller();

        let mut canvas = RecordingCanvas::new();
        sc.render(&mut canvas);
        assert_eq!(
            canvas.fills_with(geometry::MENU_MARKER),
            vec![Rect::new(120.0, 210.0, 30.0, 30.0)]
        );
        assert_eq!(canvas.textures(), vec![("CORRUPTED BITS".to_string(), 0.0, 545.0)]);

        sc.handle_mouse_down(0.0, 0.0);
        let mut canvas = RecordingCanvas::new();
        sc.render(&mut canvas);
        assert!(canvas.fills_with(geometry::MENU_MARKER).is_empty());
        assert_eq!(canvas.fills_with(geometry::BIT).len(), sc.grid().active_count() + 1);
        assert_eq!(canvas.textures().len(), 1);

        sc.set_grid(one_bit(false));
        sc.update(100.0);
        let mut canvas = RecordingCanvas::new();
        sc.render(&mut canvas);
        assert_eq!(canvas.fills_with(geometry::EXPIRED_MARKER).len(), 1);
        assert!(canvas.fills_with(geometry::CLEARED_MARKER).is_empty());
    }

    #[test]
    fn render_is_idempotent() {
        let mut sc = controller();
        sc.handle_mouse_down(0.0, 0.0);
        sc.handle_mouse_down(45.0, 90.0);
        sc.update(1.5);

        let grid_before = sc.grid().cells().to_vec();
        let countdown_before = sc.countdown().clone();
        let scene_before = sc.scene();

        let mut a = RecordingCanvas::new();
        let mut b = RecordingCanvas::new();
        sc.render(&mut a);
        sc.render(&mut b);

        assert_eq!(a.ops, b.ops);
        assert_eq!(sc.grid().cells(), &grid_before[..]);
        assert_eq!(sc.countdown(), &countdown_before);
        assert_eq!(sc.scene(), scene_before);
    }
}

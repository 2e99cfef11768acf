/// Entry point: load config, set up the terminal, run the frame loop.

mod config;
mod domain;
mod driver;
mod sim;
mod ui;

use std::time::Duration;

use config::GameConfig;
use driver::FrameDriver;
use sim::scene::SceneController;
use ui::canvas::Surface;
use ui::input::{TerminalEvents, WallClock};
use ui::renderer::TerminalCanvas;

fn main() {
    // Silent unless RUST_LOG is set; redirect stderr to keep the screen clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let config = GameConfig::load();
    let seed = config.general.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed}");

    let grid = &config.grid;
    let mut canvas = TerminalCanvas::new(Surface::for_layout(grid.columns, grid.rows, grid.cell_size));

    if let Err(e) = canvas.init() {
        let _ = canvas.cleanup();
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let mut driver = FrameDriver::new(
        SceneController::new(&config, seed),
        canvas,
        TerminalEvents,
        WallClock::new(),
        Duration::from_millis(config.general.frame_sleep_ms),
    );

    let result = driver.run();

    if let Err(e) = driver.canvas_mut().cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }

    println!("Rounds played: {}", driver.controller().round());
}

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete,
/// and replaces values that would make the game unplayable.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub timer: TimerConfig,
    pub grid: GridConfig,
    pub general: GeneralConfig,
}

/// Countdown tuning. `remaining` starts at `initial` and loses
/// `decay_rate / 12 * clock_scale` units per second.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerConfig {
    pub initial: f32,
    pub decay_rate: f32,
    pub clock_scale: f32,
    /// A corrupted click removes `remaining / penalty_divisor`.
    pub penalty_divisor: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
    pub cell_size: f32,
    /// An active bit is corrupted with probability `1 / corruption_odds`.
    pub corruption_odds: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    /// Fixed RNG seed; `None` draws a fresh one per launch.
    pub seed: Option<u64>,
    pub frame_sleep_ms: u64,
    pub title: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timer: TomlTimer,
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTimer {
    #[serde(default = "default_initial")]
    initial: f32,
    #[serde(default = "default_decay_rate")]
    decay_rate: f32,
    #[serde(default = "default_clock_scale")]
    clock_scale: f32,
    #[serde(default = "default_penalty_divisor")]
    penalty_divisor: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_columns")]
    columns: usize,
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default = "default_corruption_odds")]
    corruption_odds: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
    #[serde(default = "default_title")]
    title: String,
}

/// Upper bound on grid columns and rows.
const MAX_GRID_SIDE: usize = 64;

// ── Defaults ──

fn default_initial() -> f32 { 210.0 }
fn default_decay_rate() -> f32 { 30.0 }
fn default_clock_scale() -> f32 { 1.0 }
fn default_penalty_divisor() -> f32 { 6.0 }

fn default_columns() -> usize { 7 }
fn default_rows() -> usize { 15 }
fn default_cell_size() -> f32 { 30.0 }
fn default_corruption_odds() -> u32 { 15 }

fn default_frame_sleep() -> u64 { 5 }
fn default_title() -> String { "CORRUPTED BITS".into() }

impl Default for TomlTimer {
    fn default() -> Self {
        TomlTimer {
            initial: default_initial(),
            decay_rate: default_decay_rate(),
            clock_scale: default_clock_scale(),
            penalty_divisor: default_penalty_divisor(),
        }
    }
}

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            columns: default_columns(),
            rows: default_rows(),
            cell_size: default_cell_size(),
            corruption_odds: default_corruption_odds(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            frame_sleep_ms: default_frame_sleep(),
            title: default_title(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        GameConfig::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let t = cfg.timer;
        let g = cfg.grid;
        GameConfig {
            timer: TimerConfig {
                initial: positive_or("timer.initial", t.initial, default_initial()),
                decay_rate: non_negative_or("timer.decay_rate", t.decay_rate, default_decay_rate()),
                clock_scale: non_negative_or("timer.clock_scale", t.clock_scale, default_clock_scale()),
                // Divisor must exceed 1 or a single penalty empties the clock.
                penalty_divisor: if t.penalty_divisor > 1.0 {
                    t.penalty_divisor
                } else {
                    log::warn!("config: timer.penalty_divisor must be > 1, using default");
                    default_penalty_divisor()
                },
            },
            grid: GridConfig {
                columns: side_or("grid.columns", g.columns, default_columns()),
                rows: side_or("grid.rows", g.rows, default_rows()),
                cell_size: positive_or("grid.cell_size", g.cell_size, default_cell_size()),
                corruption_odds: if g.corruption_odds >= 1 {
                    g.corruption_odds
                } else {
                    log::warn!("config: grid.corruption_odds must be >= 1, using default");
                    default_corruption_odds()
                },
            },
            general: GeneralConfig {
                seed: cfg.general.seed,
                frame_sleep_ms: cfg.general.frame_sleep_ms,
                title: cfg.general.title,
            },
        }
    }
}

fn positive_or(key: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("config: {key} must be positive, got {value}; using {fallback}");
        fallback
    }
}

fn non_negative_or(key: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("config: {key} must not be negative, got {value}; using {fallback}");
        fallback
    }
}

fn side_or(key: &str, value: usize, fallback: usize) -> usize {
    if (1..=MAX_GRID_SIDE).contains(&value) {
        value
    } else {
        log::warn!("config: {key} must be in 1..={MAX_GRID_SIDE}, got {value}; using {fallback}");
        fallback
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds the real config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("config: loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config: {} parse error: {e}; using defaults", path.display());
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("config: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.timer.initial, 210.0);
        assert_eq!(cfg.timer.decay_rate, 30.0);
        assert_eq!(cfg.timer.penalty_divisor, 6.0);
        assert_eq!((cfg.grid.columns, cfg.grid.rows), (7, 15));
        assert_eq!(cfg.grid.cell_size, 30.0);
        assert_eq!(cfg.grid.corruption_odds, 15);
        assert_eq!(cfg.general.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[timer]\ninitial = 100.0\n\n[general]\nseed = 42\n",
        ).unwrap();
        assert_eq!(cfg.timer.initial, 100.0);
        assert_eq!(cfg.timer.decay_rate, 30.0);
        assert_eq!(cfg.general.seed, Some(42));
        assert_eq!(cfg.grid.columns, 7);
    }

    #[test]
    fn unusable_values_fall_back() {
        let cfg = GameConfig::parse(
            "[grid]\ncolumns = 0\ncell_size = -3.0\ncorruption_odds = 0\n\n\
             [timer]\npenalty_divisor = 1.0\ninitial = 0.0\n",
        ).unwrap();
        assert_eq!(cfg.grid.columns, 7);
        assert_eq!(cfg.grid.cell_size, 30.0);
        assert_eq!(cfg.grid.corruption_odds, 15);
        assert_eq!(cfg.timer.penalty_divisor, 6.0);
        assert_eq!(cfg.timer.initial, 210.0);
    }

    #[test]
    fn oversized_grid_falls_back() {
        let cfg = GameConfig::parse(
            "[grid]\ncolumns = 4294967296\nrows = 4294967296\n",
        ).unwrap();
        assert_eq!((cfg.grid.columns, cfg.grid.rows), (7, 15));

        let cfg = GameConfig::parse("[grid]\ncolumns = 65\nrows = 64\n").unwrap();
        assert_eq!((cfg.grid.columns, cfg.grid.rows), (7, 64));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[grid]\ncolumns = \"many\"\n").is_err());
    }
}

//! Blocktui — classic falling-block puzzle game in the terminal.

mod app;
mod arena;
mod error;
mod game;
mod input;
mod piece;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use piece::PieceKind;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Options derived from CLI that affect the engine (board size, gravity, piece sequence).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub drop_interval: Duration,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    pub first_piece: Option<PieceKind>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: arena::DEFAULT_WIDTH,
            height: arena::DEFAULT_HEIGHT,
            drop_interval: game::DEFAULT_DROP_INTERVAL,
            seed: None,
            first_piece: None,
        }
    }
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            drop_interval: Duration::from_millis(args.drop_interval_ms),
            seed: args.seed,
            first_piece: args.first_piece,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.log_level)?;

    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_else(|err| {
        warn!(%err, "failed to load theme, using defaults");
        theme::Theme::default()
    });
    let config = GameConfig::from(&args);
    let mut app = App::new(&args, &config, theme)?;
    app.run()?;
    Ok(())
}

/// Logs go to a file only; the terminal belongs to the game.
fn init_logging(path: Option<&Path>, level: tracing::Level) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

/// Classic falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktui",
    version,
    about = "Classic falling-block puzzle game in the terminal.",
    long_about = "Blocktui is a small falling-block puzzle game.\n\n\
        Press S (or Enter, or click Start) to begin. Fill a row edge to edge to clear it. \
        If a new piece has no room, the board is wiped and play continues.\n\n\
        CONTROLS:\n  Left/Right  Move    Up  Rotate CW    Q  Rotate CCW\n  Down        Drop    S / Enter  Start/Stop    Esc / Ctrl+C  Quit\n\n\
        The button bar under the board can be clicked with the mouse."
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value = "12", value_name = "COLS")]
    pub width: usize,

    /// Board height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: usize,

    /// Time between gravity steps in milliseconds.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]=\"#RRGGBB\"). Built-in colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Seed for the piece sequence (same seed, same pieces).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Kind of the first piece after each start (O, I, S, Z, L, J or T).
    #[arg(long, value_name = "PIECE", value_parser = piece::parse_piece_kind)]
    pub first_piece: Option<PieceKind>,

    /// Start playing immediately instead of waiting for Start.
    #[arg(long)]
    pub autostart: bool,

    /// Disable the board fade-in on start.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level used with --log-file (error, warn, info, debug, trace).
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: tracing::Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["blocktui"]);
        let config = GameConfig::from(&args);
        assert_eq!(config.width, GameConfig::default().width);
        assert_eq!(config.height, 20);
        assert_eq!(config.drop_interval, Duration::from_millis(1000));
        assert_eq!(config.seed, None);
        assert!(!args.autostart);
        assert_eq!(args.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_custom_args() {
        let args = Args::parse_from([
            "blocktui",
            "--width",
            "10",
            "--drop-interval-ms",
            "250",
            "--seed",
            "5",
            "--log-level",
            "debug",
        ]);
        let config = GameConfig::from(&args);
        assert_eq!(config.width, 10);
        assert_eq!(config.drop_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(5));
        assert_eq!(args.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_first_piece_arg() {
        let args = Args::parse_from(["blocktui", "--first-piece", "t"]);
        assert_eq!(GameConfig::from(&args).first_piece, Some(PieceKind::T));
        assert!(Args::try_parse_from(["blocktui", "--first-piece", "X"]).is_err());
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

//! Terminal 3D Tetris runner (default binary).
//!
//! Reads crossterm input, drives a [`Session`] at a fixed tick and presents the
//! framebuffer view. stdout belongs to the renderer, so logs only go to a file.
//!
//! ## Configuration (flags / env)
//!
//! | Flag          | Env                  | Default | Description                  |
//! |---------------|----------------------|---------|------------------------------|
//! | `--width`     | `TETRIS3D_WIDTH`     | `4`     | Columns along x (1..=64)     |
//! | `--height`    | `TETRIS3D_HEIGHT`    | `10`    | Layers along y (1..=64)      |
//! | `--depth`     | `TETRIS3D_DEPTH`     | `4`     | Columns along z (1..=64)     |
//! | `--seed`      | `TETRIS3D_SEED`      | `1`     | Prefab selection seed        |
//! | `--tick-ms`   | `TETRIS3D_TICK_MS`   | `16`    | Fixed simulation step        |
//! | `--log-file`  | `TETRIS3D_LOG_FILE`  | unset   | Log destination (`RUST_LOG`) |

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use tui_tetris3d::core::SimSnapshot;
use tui_tetris3d::engine::{Session, SessionConfig};
use tui_tetris3d::input::{should_quit, KeyboardState};
use tui_tetris3d::term::{
    FrameBuffer, GameView, RenderThrottle, TermOverlay, TerminalRenderer, Viewport,
};
use tui_tetris3d::types::TICK_MS;

/// Keep-alive redraw interval for paused or lost frames.
const STATIC_REDRAW_MS: u64 = 250;

/// Largest accepted grid dimension on any axis.
const MAX_GRID_DIM: i64 = 64;

#[derive(Parser, Debug)]
#[command(name = "tui-tetris3d", about = "3D falling blocks in the terminal", version)]
struct Args {
    /// Grid columns along x
    #[arg(
        long,
        env = "TETRIS3D_WIDTH",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_DIM)
    )]
    width: u32,

    /// Grid layers along y
    #[arg(
        long,
        env = "TETRIS3D_HEIGHT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_DIM)
    )]
    height: u32,

    /// Grid columns along z
    #[arg(
        long,
        env = "TETRIS3D_DEPTH",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_DIM)
    )]
    depth: u32,

    /// Seed for prefab selection
    #[arg(long, env = "TETRIS3D_SEED", default_value_t = 1)]
    seed: u32,

    /// Simulation step in milliseconds
    #[arg(long, env = "TETRIS3D_TICK_MS", default_value_t = TICK_MS)]
    tick_ms: u32,

    /// Write logs here (filtered by RUST_LOG, default `info`)
    #[arg(long, env = "TETRIS3D_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = SessionConfig {
        width: args.width,
        height: args.height,
        depth: args.depth,
        seed: args.seed,
        ..SessionConfig::default()
    };
    let session = Session::new(&config).context("invalid game configuration")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session, args.tick_ms.max(1));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {e}"))?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, mut session: Session, tick_ms: u32) -> Result<()> {
    let view = GameView::default();
    let mut keyboard = KeyboardState::new();
    let mut overlay = TermOverlay::new();
    let mut throttle = RenderThrottle::new(STATIC_REDRAW_MS);
    let mut snapshot = SimSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick = Duration::from_millis(tick_ms as u64);
    let mut last_tick = Instant::now();

    loop {
        // Input with timeout until next tick.
        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    keyboard.handle_event(key);
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                    throttle.invalidate();
                }
                Event::FocusLost => keyboard.release_all(),
                _ => {}
            }
        }

        if last_tick.elapsed() < tick {
            continue;
        }
        last_tick = Instant::now();

        let input = keyboard.begin_tick(tick_ms);
        session.frame(tick_ms, &input, &mut overlay);
        for event in session.take_events() {
            log::debug!("event: {event:?}");
        }

        session.snapshot_into(&mut snapshot);
        if overlay.take_redraw() {
            throttle.invalidate();
        }
        if throttle.should_render(snapshot.now_ms, snapshot.fingerprint(), snapshot.is_static()) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into(&snapshot, &overlay, Viewport::new(w, h), &mut fb);
            term.present(&mut fb)?;
        }
    }
}

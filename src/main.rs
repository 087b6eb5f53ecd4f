//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `jatc-term`.
//! Logging goes to a file (never the terminal) when `--log-file` is given.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jatc::core::{Board, BoardConfig, GameSnapshot, PieceSource, ScriptedPieces, Session, SimpleRng};
use jatc::input::{handle_key_event, should_quit, InputHandler};
use jatc::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use jatc::types::{GameAction, DEFAULT_COLS, DEFAULT_ROWS, TICK_MS};

type DynSession = Session<Box<dyn PieceSource>>;

#[derive(Parser, Debug)]
#[command(name = "jatc", version, about = "Just Another Tetris Clone, in the terminal")]
struct Args {
    /// Playable rows
    #[arg(default_value_t = DEFAULT_ROWS)]
    rows: u16,
    /// Playable columns
    #[arg(default_value_t = DEFAULT_COLS)]
    cols: u16,
    /// Starting speed level
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
    /// Seed for piece draws (defaults to the clock)
    #[arg(long)]
    seed: Option<u32>,
    /// Fixed piece order to cycle through, e.g. "IOTSZJL"
    #[arg(long, value_name = "KINDS", conflicts_with = "seed")]
    sequence: Option<String>,
    /// Do not ring the terminal bell
    #[arg(long)]
    quiet: bool,
    /// Write logs to this file (filter with JATC_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut session = build_session(&args)?;

    let mut term = TerminalRenderer::new().with_quiet(args.quiet);
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("JATC_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn build_session(args: &Args) -> Result<DynSession> {
    let source: Box<dyn PieceSource> = match &args.sequence {
        Some(letters) => Box::new(ScriptedPieces::parse(letters).with_context(|| {
            format!("invalid --sequence {letters:?}: expected letters from IJLOSTZ")
        })?),
        None => {
            let seed = args.seed.unwrap_or_else(clock_seed);
            info!(seed, "random piece source");
            Box::new(SimpleRng::new(seed))
        }
    };

    let config = BoardConfig::new(args.rows, args.cols);
    let board = Board::new(config, source).context("invalid board size")?;
    Ok(Session::new(board, args.level))
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, session: &mut DynSession) -> Result<()> {
    session.start()?;

    let view = GameView::default();
    let mut input_handler = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        session.board().snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }

                        if let Some(action) = input_handler.handle_key_press(key.code) {
                            dispatch(session, term, action)?;
                        } else if let Some(action) = handle_key_event(key) {
                            // Held movement repeats come from the handler.
                            if !action.is_movement() {
                                input_handler.reset();
                                dispatch(session, term, action)?;
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Ignore terminal auto-repeat; the handler repeats held keys.
                    }
                    KeyEventKind::Release => {
                        input_handler.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u32::MAX as u128) as u32;

            for action in input_handler.update(elapsed_ms) {
                dispatch(session, term, action)?;
            }
            for event in session.advance(elapsed_ms)? {
                term.notify(event)?;
            }
        }
    }
}

fn dispatch(session: &mut DynSession, term: &mut TerminalRenderer, action: GameAction) -> Result<()> {
    if let Some(event) = session.apply(action)? {
        term.notify(event)?;
    }
    Ok(())
}

//! Terminal front end for the sliding puzzle.
//!
//! The clip is simulated by a wall clock of `--duration` seconds; restore
//! the grid before it runs out.

mod term;

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use tracing_subscriber::EnvFilter;

use slide_puzzle::{GameSession, GridConfig, Move, SessionEvent, SessionState, Settings};
use term::{Hud, Screen};

const FRAME: Duration = Duration::from_millis(100);

/// Slide the tiles back into place before the clip ends
#[derive(Parser, Debug)]
#[command(name = "slide-puzzle")]
#[command(about = "Sliding-tile puzzle against the clock", long_about = None)]
struct Args {
    /// Columns in the grid
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Rows in the grid
    #[arg(long, default_value_t = 3)]
    height: usize,

    /// Random slides used to scramble the grid
    #[arg(long, default_value_t = 200)]
    steps: usize,

    /// Clip length in seconds
    #[arg(long, default_value_t = 60.0)]
    duration: f64,

    /// Random seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Hide tile numbers
    #[arg(long)]
    no_labels: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            grid: GridConfig::new(self.width, self.height),
            shuffle_steps: self.steps,
            show_labels: !self.no_labels,
            duration_secs: self.duration,
            seed: self.seed,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = args.settings();
    let mut session = GameSession::from_settings(&settings)?;

    let mut screen = Screen::new(settings.show_labels);
    screen.enter()?;

    let result = run(&mut screen, &mut session, &settings);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

fn run(screen: &mut Screen, session: &mut GameSession, settings: &Settings) -> Result<()> {
    let mut clip_started: Option<Instant> = None;
    let mut message = String::from("press s to start");

    loop {
        let events: Vec<SessionEvent> = session.drain_events().collect();
        for event in events {
            match event {
                SessionEvent::StateChanged(SessionState::Running) => {
                    clip_started = Some(Instant::now());
                    message = "restore the picture before the clip ends".into();
                }
                SessionEvent::StateChanged(SessionState::Idle) => {
                    clip_started = None;
                    message = String::from("press s to start");
                }
                SessionEvent::Won { elapsed_seconds } => {
                    message = format!("solved in {elapsed_seconds:.1}s, press n for a new game");
                }
                SessionEvent::Lost => {
                    message = String::from("game over, press n for a new game");
                }
                SessionEvent::StateChanged(_) | SessionEvent::MoveApplied { .. } => {}
            }
        }

        let clip_position = match (session.state(), clip_started) {
            (SessionState::Running, Some(start)) => start.elapsed().as_secs_f64(),
            (SessionState::Idle, _) => 0.0,
            _ => session.elapsed_seconds(),
        };
        screen.draw(
            session,
            &Hud {
                clip_position,
                clip_duration: settings.duration_secs,
                message: &message,
            },
        )?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if should_quit(key) {
                    return Ok(());
                }
                if let Err(err) = handle_key(session, key.code) {
                    message = err.to_string();
                }
            }
        }

        if let Some(start) = clip_started {
            session.on_clock_tick(start.elapsed().as_secs_f64(), settings.duration_secs);
        }
    }
}

fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_key(session: &mut GameSession, code: KeyCode) -> Result<(), slide_puzzle::PuzzleError> {
    let movement = match code {
        KeyCode::Char('s') => return session.start(),
        KeyCode::Char('g') => return session.give_up(),
        KeyCode::Char('n') => return session.new_game(),
        KeyCode::Up => Move::Up,
        KeyCode::Down => Move::Down,
        KeyCode::Left => Move::Left,
        KeyCode::Right => Move::Right,
        _ => return Ok(()),
    };
    let _ = session.apply_move(movement);
    Ok(())
}

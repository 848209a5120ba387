//! Game lifecycle around a [`Puzzle`].
//!
//! The session reacts synchronously to inbound calls (player moves, start /
//! give-up / new-game requests, clock signals from whatever plays the clip)
//! and queues [`SessionEvent`]s for the renderer to drain. It performs no I/O
//! and never reads the wall clock itself.

use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, instrument, warn};

use crate::config::{GridConfig, Settings};
use crate::error::PuzzleError;
use crate::puzzle::{Move, MoveResult, Puzzle};
use crate::tile::{Position, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Running,
    Won,
    Lost,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Won => "won",
            SessionState::Lost => "lost",
        };
        f.write_str(s)
    }
}

/// Notifications for the renderer, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    MoveApplied {
        tile: TileId,
        previous_empty: Position,
        empty: Position,
    },
    Won {
        elapsed_seconds: f64,
    },
    Lost,
}

/// Walks tried by [`GameSession::start`] before accepting a solved grid.
pub const SHUFFLE_ATTEMPTS: usize = 8;

pub struct GameSession<R = StdRng> {
    puzzle: Puzzle,
    shuffle_steps: usize,
    rng: R,
    state: SessionState,
    elapsed_seconds: f64,
    moves_made: usize,
    events: Vec<SessionEvent>,
}

impl GameSession<StdRng> {
    /// Builds a session seeded from `settings.seed`, or from entropy when unset.
    pub fn from_settings(settings: &Settings) -> Result<Self, PuzzleError> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(settings.grid, settings.shuffle_steps, rng)
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(grid: GridConfig, shuffle_steps: usize, rng: R) -> Result<Self, PuzzleError> {
        Ok(Self {
            puzzle: Puzzle::new(grid)?,
            shuffle_steps,
            rng,
            state: SessionState::Idle,
            elapsed_seconds: 0.0,
            moves_made: 0,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn shuffle_steps(&self) -> usize {
        self.shuffle_steps
    }

    /// Clip position at the last tick, or at the moment the puzzle was solved.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Rebuilds and shuffles the grid, then starts play. Only valid from `Idle`.
    ///
    /// With a non-zero step count a walk that lands back on the solved grid
    /// is redone, up to [`SHUFFLE_ATTEMPTS`] times. Some walks always return
    /// home (every 12-step walk on a 2x2 grid), so play starts regardless.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn start(&mut self) -> Result<(), PuzzleError> {
        self.expect_state(SessionState::Idle, "start")?;

        let config = self.puzzle.config();
        for _ in 0..SHUFFLE_ATTEMPTS {
            self.puzzle.initialize(config)?;
            self.puzzle.shuffle(self.shuffle_steps, &mut self.rng);
            if self.shuffle_steps == 0 || !self.puzzle.is_solved() {
                break;
            }
        }

        self.elapsed_seconds = 0.0;
        self.moves_made = 0;
        self.transition(SessionState::Running);
        Ok(())
    }

    /// Forwards a player move to the grid. Outside `Running` every move is rejected.
    pub fn try_move(&mut self, id: TileId) -> MoveResult {
        if self.state != SessionState::Running {
            return MoveResult::Rejected;
        }

        let result = self.puzzle.try_move(id);
        if let MoveResult::Applied {
            tile,
            previous_empty,
            empty,
        } = result
        {
            self.moves_made += 1;
            self.events.push(SessionEvent::MoveApplied {
                tile,
                previous_empty,
                empty,
            });
            if self.puzzle.is_solved() {
                self.win();
            }
        }
        result
    }

    pub fn apply_move(&mut self, movement: Move) -> MoveResult {
        match self.puzzle.tile_toward(movement) {
            Some(id) => self.try_move(id),
            None => MoveResult::Rejected,
        }
    }

    #[instrument(skip(self), fields(state = %self.state))]
    pub fn give_up(&mut self) -> Result<(), PuzzleError> {
        self.expect_state(SessionState::Running, "give up")?;
        self.lose();
        Ok(())
    }

    /// Acknowledges a finished game, resets the grid to solved and returns to `Idle`.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn new_game(&mut self) -> Result<(), PuzzleError> {
        match self.state {
            SessionState::Won | SessionState::Lost => {
                self.puzzle.initialize(self.puzzle.config())?;
                self.moves_made = 0;
                self.elapsed_seconds = 0.0;
                self.transition(SessionState::Idle);
                Ok(())
            }
            state => Err(self.invalid(state, "start a new game")),
        }
    }

    /// Swaps in a new grid shape and step count. Not allowed mid-game.
    pub fn reconfigure(&mut self, grid: GridConfig, shuffle_steps: usize) -> Result<(), PuzzleError> {
        if self.state == SessionState::Running {
            return Err(self.invalid(self.state, "reconfigure"));
        }
        self.puzzle.initialize(grid)?;
        self.shuffle_steps = shuffle_steps;
        if self.state != SessionState::Idle {
            self.transition(SessionState::Idle);
        }
        Ok(())
    }

    /// Playback progress. Reaching the end of a known duration counts as expiry.
    pub fn on_clock_tick(&mut self, current_position_seconds: f64, total_duration_seconds: f64) {
        if self.state != SessionState::Running || !current_position_seconds.is_finite() {
            return;
        }
        self.elapsed_seconds = current_position_seconds.max(0.0);

        if total_duration_seconds.is_finite()
            && total_duration_seconds > 0.0
            && current_position_seconds >= total_duration_seconds
        {
            self.on_clock_expired();
        }
    }

    pub fn on_clock_expired(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        // Solved before any move: a zero-step shuffle, or a walk that came home.
        if self.puzzle.is_solved() {
            self.win();
        } else {
            self.lose();
        }
    }

    fn win(&mut self) {
        info!(
            elapsed = self.elapsed_seconds,
            moves = self.moves_made,
            "puzzle solved"
        );
        self.transition(SessionState::Won);
        self.events.push(SessionEvent::Won {
            elapsed_seconds: self.elapsed_seconds,
        });
    }

    fn lose(&mut self) {
        info!(
            elapsed = self.elapsed_seconds,
            misplaced = self.puzzle.misplaced_tiles(),
            "game lost"
        );
        self.transition(SessionState::Lost);
        self.events.push(SessionEvent::Lost);
    }

    fn transition(&mut self, next: SessionState) {
        info!(from = %self.state, to = %next, "session state changed");
        self.state = next;
        self.events.push(SessionEvent::StateChanged(next));
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), PuzzleError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(self.state, action))
        }
    }

    fn invalid(&self, state: SessionState, action: &'static str) -> PuzzleError {
        warn!(%state, action, "rejected session transition");
        PuzzleError::InvalidTransition { state, action }
    }
}

//! Sliding-tile puzzle engine for a video clip split into a grid.
//!
//! The picture is cut into `width * height` tiles; the bottom-right one is
//! left empty and its neighbours slide into it. A game is shuffled by a
//! random walk of legal slides, so every starting grid can be slid back
//! home, and is won by restoring it before the clip finishes.
//!
//! - [`puzzle`]: grid model, move legality, shuffle, solved check
//! - [`session`]: start / give-up / new-game lifecycle driven by an external clock
//! - [`config`]: grid shape and game settings
//!
//! Rendering and input live outside the library; the bundled binary is a
//! terminal front end.
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use slide_puzzle::{GameSession, GridConfig, SessionState};
//!
//! let mut session = GameSession::new(GridConfig::new(4, 3), 50, StdRng::seed_from_u64(1))?;
//! session.start()?;
//! let tile = session.puzzle().movable_tiles().next().unwrap();
//! assert!(session.try_move(tile).is_applied());
//! assert_eq!(session.moves_made(), 1);
//!
//! session.on_clock_expired();
//! assert_ne!(session.state(), SessionState::Running);
//! # Ok::<(), slide_puzzle::PuzzleError>(())
//! ```

pub mod config;
pub mod error;
pub mod puzzle;
pub mod session;
pub mod tile;

pub use config::{GridConfig, Settings};
pub use error::PuzzleError;
pub use puzzle::{Move, MoveResult, Puzzle};
pub use session::{GameSession, SessionEvent, SessionState};
pub use tile::{Position, Tile, TileId};

use rand::{seq::SliceRandom, Rng};
use std::fmt;
use tracing::{debug, instrument, trace};

use crate::config::GridConfig;
use crate::error::PuzzleError;
use crate::tile::{Position, Tile, TileId};

/// Direction a tile slides when it moves into the hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Neighbour scan order: above, left of, below, right of the hole.
    pub const ALL: [Move; 4] = [Move::Down, Move::Right, Move::Up, Move::Left];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (0, -1),
            Move::Left => (-1, 0),
            Move::Down => (0, 1),
            Move::Right => (1, 0),
        }
    }
}

/// Outcome of asking a tile to slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Applied {
        tile: TileId,
        previous_empty: Position,
        empty: Position,
    },
    Rejected,
}

impl MoveResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied { .. })
    }
}

/// The sliding-tile grid.
///
/// `tiles` is indexed by [`TileId`], `board` by row-major slot. Every
/// mutation goes through [`Puzzle::swap_with_empty`], so both views always
/// describe the same permutation and the arrangement stays reachable from
/// the solved one.
#[derive(Debug, Clone)]
pub struct Puzzle {
    config: GridConfig,
    tiles: Vec<Tile>,
    board: Vec<TileId>,
    empty: TileId,
}

impl Puzzle {
    pub fn new(config: GridConfig) -> Result<Self, PuzzleError> {
        let (tiles, board, empty) = Self::build(config)?;
        debug!(width = config.width, height = config.height, "puzzle created");
        Ok(Self {
            config,
            tiles,
            board,
            empty,
        })
    }

    /// Replaces every tile with a fresh solved grid of the given shape.
    ///
    /// On error the current grid is left untouched.
    pub fn initialize(&mut self, config: GridConfig) -> Result<(), PuzzleError> {
        let (tiles, board, empty) = Self::build(config)?;
        self.config = config;
        self.tiles = tiles;
        self.board = board;
        self.empty = empty;
        debug!(width = config.width, height = config.height, "puzzle initialized");
        Ok(())
    }

    fn build(config: GridConfig) -> Result<(Vec<Tile>, Vec<TileId>, TileId), PuzzleError> {
        let count = config.validate()?;
        let empty = TileId(count - 1);

        let mut tiles = Vec::with_capacity(count);
        for y in 0..config.height {
            for x in 0..config.width {
                let id = TileId(y * config.width + x);
                tiles.push(Tile::new(id, Position::new(x, y), id == empty));
            }
        }
        let board = (0..count).map(TileId).collect();

        Ok((tiles, board, empty))
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn empty_tile(&self) -> &Tile {
        &self.tiles[self.empty.0]
    }

    pub fn empty_position(&self) -> Position {
        self.empty_tile().current
    }

    pub fn tile_at(&self, pos: Position) -> Option<TileId> {
        if pos.x >= self.config.width || pos.y >= self.config.height {
            return None;
        }
        self.board.get(pos.slot(self.config.width)).copied()
    }

    /// True when both tiles exist and sit one step apart.
    pub fn is_adjacent(&self, a: TileId, b: TileId) -> bool {
        match (self.tile(a), self.tile(b)) {
            (Some(a), Some(b)) => a.current.manhattan(b.current) == 1,
            _ => false,
        }
    }

    /// Tiles that could slide into the hole right now.
    pub fn movable_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        Move::ALL.iter().filter_map(|&mv| self.tile_toward(mv))
    }

    /// The tile that would slide in direction `movement`, if any.
    pub fn tile_toward(&self, movement: Move) -> Option<TileId> {
        let (dx, dy) = movement.as_offset();
        let (width, height) = (self.config.width, self.config.height);
        let source = self.empty_position().offset(-dx, -dy, width, height)?;
        self.tile_at(source)
    }

    /// Slides `id` into the hole if it is next to it.
    ///
    /// Unknown ids, the hole itself and distant tiles are rejected without
    /// touching any state.
    pub fn try_move(&mut self, id: TileId) -> MoveResult {
        if !self.is_adjacent(id, self.empty) {
            trace!(tile = %id, "move rejected");
            return MoveResult::Rejected;
        }

        let previous_empty = self.empty_position();
        self.swap_with_empty(id);
        let empty = self.empty_position();
        trace!(tile = %id, from = %empty, to = %previous_empty, "move applied");

        MoveResult::Applied {
            tile: id,
            previous_empty,
            empty,
        }
    }

    pub fn apply_move(&mut self, movement: Move) -> MoveResult {
        match self.tile_toward(movement) {
            Some(id) => self.try_move(id),
            None => MoveResult::Rejected,
        }
    }

    fn swap_with_empty(&mut self, id: TileId) {
        let width = self.config.width;
        let hole = self.tiles[self.empty.0].current;
        let target = self.tiles[id.0].current;

        self.tiles[self.empty.0].current = target;
        self.tiles[id.0].current = hole;
        self.board[hole.slot(width)] = id;
        self.board[target.slot(width)] = self.empty;
    }

    /// Random walk of `steps` legal moves from the current arrangement.
    ///
    /// Each step picks uniformly among the hole's neighbours, skipping the
    /// tile moved on the previous step unless it is the only one left.
    /// Returns the tiles moved, in order; replaying them through
    /// [`Puzzle::try_move`] on the starting grid reproduces the result.
    #[instrument(skip(self, rng), fields(width = self.config.width, height = self.config.height))]
    pub fn shuffle<R: Rng + ?Sized>(&mut self, steps: usize, rng: &mut R) -> Vec<TileId> {
        let mut walk = Vec::with_capacity(steps);
        let mut candidates = Vec::with_capacity(Move::ALL.len());
        let mut previous = None;

        for _ in 0..steps {
            let movable: Vec<TileId> = self.movable_tiles().collect();
            shuffle_candidates(&movable, previous, &mut candidates);

            let Some(&chosen) = candidates.choose(rng) else {
                break;
            };
            self.swap_with_empty(chosen);
            walk.push(chosen);
            previous = Some(chosen);
        }

        debug!(steps = walk.len(), misplaced = self.misplaced_tiles(), "shuffled");
        walk
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(Tile::is_home)
    }

    pub fn misplaced_tiles(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| !tile.is_empty() && !tile.is_home())
            .count()
    }

    /// Slot each tile should be drawn in, indexed by tile id.
    pub fn tile_render_order(&self) -> Vec<usize> {
        self.tiles
            .iter()
            .map(|tile| tile.current.slot(self.config.width))
            .collect()
    }

    /// Parity test for whether the arrangement can be slid back home.
    ///
    /// Anything the engine produces passes; this exists to check that.
    pub fn is_solvable(&self) -> bool {
        let sequence: Vec<usize> = self
            .board
            .iter()
            .filter(|&&id| id != self.empty)
            .map(|id| id.0)
            .collect();
        let inversions = Self::count_inversions(&sequence);

        if self.config.width % 2 == 1 {
            // Odd width: a vertical slide jumps an even number of tiles.
            inversions % 2 == 0
        } else {
            // Even width: inversion parity flips with every row the hole changes.
            let empty_row = self.empty_position().y;
            (inversions + empty_row) % 2 == (self.config.height - 1) % 2
        }
    }

    fn count_inversions(sequence: &[usize]) -> usize {
        sequence
            .iter()
            .enumerate()
            .map(|(i, &val)| sequence[i + 1..].iter().filter(|&&next| next < val).count())
            .sum()
    }
}

/// Fills `out` with `movable` minus the previous pick, falling back to all of
/// `movable` when that would leave nothing.
fn shuffle_candidates(movable: &[TileId], previous: Option<TileId>, out: &mut Vec<TileId>) {
    out.clear();
    out.extend(movable.iter().copied().filter(|&id| Some(id) != previous));
    if out.is_empty() {
        out.extend_from_slice(movable);
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(self.config.width) {
            for &id in row {
                if id == self.empty {
                    write!(f, "   ")?;
                } else {
                    write!(f, "{:2} ", id.0)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

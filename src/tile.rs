use std::fmt;

/// Identifies a tile by its home slot in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub usize);

impl TileId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grid cell, `x` counting columns from the left and `y` rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Row-major slot index on a grid `width` cells wide.
    pub fn slot(self, width: usize) -> usize {
        self.y * width + self.x
    }

    pub fn from_slot(slot: usize, width: usize) -> Self {
        Self::new(slot % width, slot / width)
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Neighbour after stepping by `(dx, dy)`, if it stays on a `width`x`height` grid.
    pub fn offset(self, dx: isize, dy: isize, width: usize, height: usize) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Self::new(x, y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One movable piece of the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    original: Position,
    pub(crate) current: Position,
    is_empty: bool,
}

impl Tile {
    pub(crate) fn new(id: TileId, original: Position, is_empty: bool) -> Self {
        Self {
            id,
            original,
            current: original,
            is_empty,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn original_index(&self) -> usize {
        self.id.0
    }

    pub fn original(&self) -> Position {
        self.original
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn is_home(&self) -> bool {
        self.current == self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_roundtrip_on_wide_grid() {
        let p = Position::new(3, 2);
        assert_eq!(p.slot(4), 11);
        assert_eq!(Position::from_slot(11, 4), p);
    }

    #[test]
    fn test_offset_stays_in_bounds() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(-1, 0, 3, 3), None);
        assert_eq!(corner.offset(0, -1, 3, 3), None);
        assert_eq!(corner.offset(1, 0, 3, 3), Some(Position::new(1, 0)));

        let far = Position::new(2, 2);
        assert_eq!(far.offset(1, 0, 3, 3), None);
        assert_eq!(far.offset(0, 1, 3, 3), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(1, 0)), 1);
        assert_eq!(Position::new(1, 1).manhattan(Position::new(0, 0)), 2);
        assert_eq!(Position::new(2, 1).manhattan(Position::new(2, 1)), 0);
    }
}

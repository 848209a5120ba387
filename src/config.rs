use crate::error::PuzzleError;

/// Shape of the puzzle grid.
///
/// Plain values; the engine validates them when it is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl GridConfig {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Checks the shape and returns the number of tiles it holds.
    pub fn validate(&self) -> Result<usize, PuzzleError> {
        let invalid = PuzzleError::InvalidConfig {
            width: self.width,
            height: self.height,
        };
        if self.width < 2 || self.height < 2 {
            return Err(invalid);
        }
        self.width.checked_mul(self.height).ok_or(invalid)
    }

    /// Saturates instead of overflowing on shapes [`GridConfig::validate`] would reject.
    pub fn tile_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

/// Everything a controller needs to run a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub grid: GridConfig,
    /// Random-walk length used when a game starts.
    pub shuffle_steps: usize,
    /// Draw each tile's home index on top of it.
    pub show_labels: bool,
    /// Length of the backing clip; the game is lost when it runs out.
    pub duration_secs: f64,
    /// Fixed seed for reproducible shuffles.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            shuffle_steps: 200,
            show_labels: true,
            duration_secs: 60.0,
            seed: None,
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid dimensions must be between 1 and 255")]
    InvalidDimension,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Coordinates are outside the grid")]
    OutOfBounds,
    #[error("Action not accepted in the current game state")]
    IllegalAction,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Cells do not match the mine layout")]
    InconsistentBoard,
}

impl GameError {
    /// Fatal errors stop a session from being created. The rest come from stale input and leave
    /// every piece of state untouched, so callers may drop them.
    pub const fn is_fatal(self) -> bool {
        use GameError::*;
        match self {
            InvalidDimension => true,
            TooManyMines => true,
            UnknownDifficulty => true,
            InconsistentBoard => true,
            OutOfBounds => false,
            IllegalAction => false,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing -> Won
/// - Playing -> Lost
///
/// Starting a new board from any state goes back through NotStarted to Playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Board is ready, actions are not accepted yet
    NotStarted,
    /// Actions are accepted
    Playing,
    /// Every safe cell is revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameStatus {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from board creation to its end. Owns the board exclusively; actions are applied one
/// at a time, each fully settled before the call returns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    difficulty: Option<Difficulty>,
    board: Board,
    status: GameStatus,
    triggered_mine: Option<Coord3>,
}

impl GameSession {
    /// Session over a custom board.
    pub fn new(board: Board) -> Self {
        Self {
            difficulty: None,
            board,
            status: GameStatus::default(),
            triggered_mine: None,
        }
    }

    pub fn with_difficulty(difficulty: Difficulty, seed: u64) -> Result<Self> {
        let board = Board::new(generate_board(difficulty, seed)?);
        Ok(Self {
            difficulty: Some(difficulty),
            ..Self::new(board)
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_final()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord3> {
        self.triggered_mine
    }

    pub fn mines_left(&self) -> i64 {
        self.board.mines_left()
    }

    pub fn start(&mut self) -> Result<GameStatus> {
        if !self.status.is_initial() {
            return Err(GameError::IllegalAction);
        }
        self.status = GameStatus::Playing;
        log::debug!("Game started on {:?} board", self.board.size());
        Ok(self.status)
    }

    /// Drops the current board for a fresh one of `difficulty` and starts playing it.
    pub fn restart(&mut self, difficulty: Difficulty, seed: u64) -> Result<GameStatus> {
        *self = Self::with_difficulty(difficulty, seed)?;
        self.start()
    }

    pub fn apply(&mut self, action: Action) -> Result<GameStatus> {
        match action {
            Action::Reveal { coords } => {
                self.reveal(coords)?;
            }
            Action::ToggleFlag { coords } => {
                self.toggle_flag(coords)?;
            }
        }
        Ok(self.status)
    }

    /// Reveals a cell, then decides whether the game is lost, won or goes on.
    pub fn reveal(&mut self, coords: Coord3) -> Result<RevealOutcome> {
        self.check_playing()?;
        let coords = self.board.layout().validate_coords(coords)?;

        if self.board.cell_at(coords).is_some_and(Cell::is_flagged) {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = self.board.reveal(coords);
        if outcome == RevealOutcome::HitMine {
            self.triggered_mine = Some(coords);
            self.end_game(false);
        } else if self.all_safe_cells_revealed() {
            self.board.flag_all_remaining_mines();
            self.end_game(true);
        }
        Ok(outcome)
    }

    /// Flags never end a game, so the status only changes through [`Self::reveal`].
    pub fn toggle_flag(&mut self, coords: Coord3) -> Result<FlagOutcome> {
        self.check_playing()?;
        let coords = self.board.layout().validate_coords(coords)?;

        match self.board.toggle_flag(coords) {
            FlagOutcome::LimitReached => Err(GameError::IllegalAction),
            outcome => Ok(outcome),
        }
    }

    /// Every hidden cell is an unflagged mine.
    fn all_safe_cells_revealed(&self) -> bool {
        let hidden = self.board.count_by_status(CellStatus::Hidden);
        let mines = self.board.count_mines();
        let flags = self.board.count_by_status(CellStatus::Flagged);
        mines.checked_sub(flags) == Some(hidden)
    }

    fn end_game(&mut self, won: bool) {
        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        log::debug!("Game ended: {:?}", self.status);
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_playing() {
            Ok(())
        } else {
            Err(GameError::IllegalAction)
        }
    }
}

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player input forwarded to a [`GameSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    #[serde(rename = "reveal")]
    Reveal { coords: Coord3 },
    #[serde(rename = "flag")]
    ToggleFlag { coords: Coord3 },
}

impl Action {
    pub const fn coords(self) -> Coord3 {
        match self {
            Self::Reveal { coords } | Self::ToggleFlag { coords } => coords,
        }
    }
}

/// What a renderer may know about one cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub coords: Coord3,
    pub position: Point3,
    pub status: CellStatus,
    pub mine: bool,
    pub adjacent_mines: u8,
    pub visible: bool,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        Self {
            coords: cell.coords(),
            position: cell.position(),
            status: cell.status(),
            mine: cell.is_mine(),
            adjacent_mines: cell.adjacent_mines(),
            visible: cell.is_visible(),
        }
    }
}

/// Read-only snapshot handed to the rendering side after every change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord3,
    pub status: GameStatus,
    pub mines_left: i64,
    pub cells: Vec<CellView>,
}

impl BoardView {
    pub fn from_board(board: &Board, status: GameStatus) -> Self {
        Self {
            size: board.size(),
            status,
            mines_left: board.mines_left(),
            cells: board.cells().iter().map(CellView::from).collect(),
        }
    }

    pub fn from_session(session: &GameSession) -> Self {
        Self::from_board(session.board(), session.status())
    }

    pub fn cell_at(&self, coords: Coord3) -> Option<&CellView> {
        self.cells.get(linear_index(coords, self.size)?)
    }
}

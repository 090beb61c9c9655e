use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellStatus {
    Hidden,
    Flagged,
    Revealed,
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One grid position. Neighbors are never stored, they are recomputed from `coords`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord3,
    position: Point3,
    mine: bool,
    adjacent_mines: u8,
    status: CellStatus,
    visible: bool,
}

impl Cell {
    pub fn new(coords: Coord3, position: Point3, mine: bool, adjacent_mines: u8) -> Self {
        Self {
            coords,
            position,
            mine,
            adjacent_mines,
            status: CellStatus::default(),
            visible: false,
        }
    }

    pub fn coords(&self) -> Coord3 {
        self.coords
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    /// Whether the cell may be drawn at all, independent of its status.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.status, CellStatus::Hidden)
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self.status, CellStatus::Flagged)
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.status, CellStatus::Revealed)
    }

    pub(crate) fn set_status(&mut self, status: CellStatus) {
        self.status = status;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

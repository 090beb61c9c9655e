use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Side length used when the caller does not care about display positions.
pub const DEFAULT_SIDE_LENGTH: f32 = 1.0;

/// All cells of one game, stored flat in row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardParts")]
pub struct Board {
    layout: MineLayout,
    cells: Vec<Cell>,
}

/// Unchecked form of a stored [`Board`].
#[derive(Deserialize)]
struct BoardParts {
    layout: MineLayout,
    cells: Vec<Cell>,
}

impl TryFrom<BoardParts> for Board {
    type Error = GameError;

    /// Cells must cover the layout in row-major order and agree with it on mines and counts.
    fn try_from(parts: BoardParts) -> Result<Self> {
        let BoardParts { layout, cells } = parts;
        let size = layout.size();
        if cells.len() != layout.total_cells() as usize {
            return Err(GameError::InconsistentBoard);
        }

        let consistent = cells.iter().enumerate().all(|(index, cell)| {
            let coords = cell.coords();
            from_linear_index(index, size) == Some(coords)
                && cell.is_mine() == layout.contains_mine(coords)
                && cell.adjacent_mines() == layout.adjacent_mine_count(coords)
        });
        if !consistent {
            return Err(GameError::InconsistentBoard);
        }

        Ok(Self { layout, cells })
    }
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        Self::with_side_length(layout, DEFAULT_SIDE_LENGTH)
    }

    /// Builds every cell from `layout`. Cells on the outer faces of the cuboid start visible.
    pub fn with_side_length(layout: MineLayout, side_length: f32) -> Self {
        let size = layout.size();
        let (size_x, size_y, size_z) = size;
        let mut cells = Vec::with_capacity(layout.total_cells() as usize);

        for z in 0..size_z {
            for y in 0..size_y {
                for x in 0..size_x {
                    let coords = (x, y, z);
                    let position = layout
                        .place_position(coords, side_length)
                        .unwrap_or_default();
                    let mut cell = Cell::new(
                        coords,
                        position,
                        layout.contains_mine(coords),
                        layout.adjacent_mine_count(coords),
                    );
                    cell.set_visible(is_on_outer_face(coords, size));
                    cells.push(cell);
                }
            }
        }

        log::debug!(
            "New board {:?} with {} mines",
            size,
            layout.mine_count()
        );
        Self { layout, cells }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord3 {
        self.layout.size()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn index_of(&self, coords: Coord3) -> Option<usize> {
        linear_index(coords, self.size())
    }

    pub fn coords_of(&self, index: usize) -> Option<Coord3> {
        from_linear_index(index, self.size())
    }

    pub fn cell_at(&self, coords: Coord3) -> Option<&Cell> {
        self.cells.get(self.index_of(coords)?)
    }

    pub fn cell_at_index(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn count_by_status(&self, status: CellStatus) -> CellCount {
        self.cells_with_status(status).count() as CellCount
    }

    pub fn count_mines(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_mine()).count() as CellCount
    }

    pub fn cells_with_status(&self, status: CellStatus) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |cell| cell.status() == status)
    }

    /// How many mines have not been flagged yet
    pub fn mines_left(&self) -> i64 {
        i64::from(self.count_mines()) - i64::from(self.count_by_status(CellStatus::Flagged))
    }

    /// Opens a hidden cell. A safe cell with no adjacent mines cascades through face-adjacent
    /// cells, breadth first, until it reaches cells that touch a mine.
    pub fn reveal(&mut self, coords: Coord3) -> RevealOutcome {
        use CellStatus::*;

        let Some(index) = self.index_of(coords) else {
            log::debug!("Ignoring reveal outside the board at {:?}", coords);
            return RevealOutcome::NoChange;
        };

        let target = self.cells[index];
        if target.status() != Hidden {
            return RevealOutcome::NoChange;
        }

        self.cells[index].set_status(Revealed);
        if target.is_mine() {
            log::debug!("Mine hit at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        let mut opened: CellCount = 1;
        log::debug!(
            "Open cell at {:?}, mine count: {}",
            coords,
            target.adjacent_mines()
        );

        if target.adjacent_mines() == 0 {
            let mut to_visit: VecDeque<usize> =
                self.hidden_face_neighbors(coords).into_iter().collect();
            log::trace!(
                "Starting flood-fill from {:?}, initial neighbors: {:?}",
                coords,
                to_visit
            );

            while let Some(visit_index) = to_visit.pop_front() {
                let visit = self.cells[visit_index];

                // queued twice, or never to be opened by a cascade
                if visit.is_mine() || visit.status() != Hidden {
                    continue;
                }

                self.cells[visit_index].set_status(Revealed);
                opened += 1;
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    visit.coords(),
                    visit.adjacent_mines()
                );

                if visit.adjacent_mines() == 0 {
                    to_visit.extend(self.hidden_face_neighbors(visit.coords()));
                }
            }
        }

        let newly_visible = self.propagate_visibility();
        log::trace!("{} cells became visible", newly_visible);

        RevealOutcome::Revealed { opened }
    }

    /// Hidden ⇄ Flagged. Refuses to place more flags than there are mines.
    pub fn toggle_flag(&mut self, coords: Coord3) -> FlagOutcome {
        use CellStatus::*;

        let Some(index) = self.index_of(coords) else {
            log::debug!("Ignoring flag outside the board at {:?}", coords);
            return FlagOutcome::NoChange;
        };

        match self.cells[index].status() {
            Hidden if self.count_by_status(Flagged) >= self.count_mines() => {
                log::debug!("Flag limit reached, not flagging {:?}", coords);
                FlagOutcome::LimitReached
            }
            Hidden => {
                self.cells[index].set_status(Flagged);
                FlagOutcome::Flagged
            }
            Flagged => {
                self.cells[index].set_status(Hidden);
                FlagOutcome::Unflagged
            }
            Revealed => FlagOutcome::NoChange,
        }
    }

    /// Flags and shows every cell still hidden. Used once the game is won.
    pub fn flag_all_remaining_mines(&mut self) -> CellCount {
        let mut flagged = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_hidden()) {
            cell.set_status(CellStatus::Flagged);
            cell.set_visible(true);
            flagged += 1;
        }
        log::debug!("Auto-flagged {} remaining cells", flagged);
        flagged
    }

    /// A single forward pass in row-major order: an invisible cell becomes visible when a face
    /// neighbor is visible at the moment it is scanned, so cells exposed earlier in the pass
    /// can expose later ones.
    fn propagate_visibility(&mut self) -> CellCount {
        let mut newly_visible = 0;

        for index in 0..self.cells.len() {
            let cell = self.cells[index];
            if cell.is_visible() {
                continue;
            }
            let touches_visible = self
                .iter_face_neighbors(cell.coords())
                .filter_map(|pos| self.index_of(pos))
                .any(|neighbor| self.cells[neighbor].is_visible());
            if touches_visible {
                self.cells[index].set_visible(true);
                newly_visible += 1;
            }
        }

        newly_visible
    }

    fn hidden_face_neighbors(&self, coords: Coord3) -> SmallVec<[usize; 6]> {
        self.iter_face_neighbors(coords)
            .filter_map(|pos| self.index_of(pos))
            .filter(|&index| self.cells[index].is_hidden())
            .collect()
    }
}

impl NeighborIterExt for Board {
    fn grid_size(&self) -> Coord3 {
        self.size()
    }
}

fn is_on_outer_face(coords: Coord3, size: Coord3) -> bool {
    let (x, y, z) = coords;
    let (size_x, size_y, size_z) = size;
    x == 0 || y == 0 || z == 0 || x == size_x - 1 || y == size_y - 1 || z == size_z - 1
}

#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use records::*;
pub use session::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod difficulty;
mod error;
mod generator;
mod records;
mod session;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord3,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord3, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord3, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 || size.2 == 0 {
            return Err(GameError::InvalidDimension);
        }
        if mines > volume(size) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        volume(self.size)
    }
}

/// Dimensions and mine placement of one game. Nothing changes it once play begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array3<bool>", into = "Array3<bool>")]
pub struct MineLayout {
    mine_mask: Array3<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// An empty grid, fails when any side is zero.
    pub fn new(size: Coord3) -> Result<Self> {
        let size = GameConfig::new(size, 0)?.size;
        Ok(Self {
            mine_mask: Array3::default(size.to_nd_index()),
            mine_count: 0,
        })
    }

    /// The mask is indexed `[z, y, x]`; every axis must fit a [`Coord`] and be non-empty.
    pub fn from_mine_mask(mine_mask: Array3<bool>) -> Result<Self> {
        let fits = |extent: usize| (1..=usize::from(Coord::MAX)).contains(&extent);
        let (z, y, x) = mine_mask.dim();
        if !(fits(x) && fits(y) && fits(z)) {
            return Err(GameError::InvalidDimension);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord3, mine_coords: &[Coord3]) -> Result<Self> {
        let mut layout = Self::new(size)?;
        for &coords in mine_coords {
            layout.validate_coords(coords)?;
            layout.add_mine(coords);
        }
        Ok(layout)
    }

    /// Every cell holds a mine.
    pub fn full(size: Coord3) -> Result<Self> {
        let size = GameConfig::new(size, 0)?.size;
        Self::from_mine_mask(Array3::from_elem(size.to_nd_index(), true))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord3) -> Result<Coord3> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord3 {
        self.mine_mask.grid_size()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        volume(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Places a mine, returns whether the layout changed. Duplicates and out of range coordinates
    /// are ignored.
    pub fn add_mine(&mut self, coords: Coord3) -> bool {
        match self.mine_mask.get_mut(coords.to_nd_index()) {
            Some(cell) if !*cell => {
                *cell = true;
                self.mine_count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn remove_mine(&mut self, coords: Coord3) -> bool {
        match self.mine_mask.get_mut(coords.to_nd_index()) {
            Some(cell) if *cell => {
                *cell = false;
                self.mine_count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn contains_mine(&self, coords: Coord3) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    /// Mines among the (up to) 26 cells around `coords`, zero outside the grid.
    pub fn adjacent_mine_count(&self, coords: Coord3) -> u8 {
        if !in_bounds(coords, self.size()) {
            return 0;
        }
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    /// Mine coordinates in row-major order.
    pub fn mine_coords(&self) -> impl Iterator<Item = Coord3> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((z, y, x), _)| (x as Coord, y as Coord, z as Coord))
    }

    /// Center of the cell in display space when every cell is a cube of `side_length` and the whole
    /// grid is centered on the origin.
    pub fn place_position(&self, coords: Coord3, side_length: f32) -> Option<Point3> {
        let size = self.size();
        if !in_bounds(coords, size) {
            return None;
        }
        let half = side_length / 2.0;
        let axis = |index: Coord, extent: Coord| {
            (2.0 * f32::from(index) + 1.0 - f32::from(extent)) * half
        };
        Some([
            axis(coords.0, size.0),
            axis(coords.1, size.1),
            axis(coords.2, size.2),
        ])
    }
}

impl TryFrom<Array3<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array3<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array3<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord3> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord3) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    /// Refused because as many flags as mines are already placed.
    LimitReached,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        use FlagOutcome::*;
        match self {
            NoChange => false,
            LimitReached => false,
            Flagged => true,
            Unflagged => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Target was safe; `opened` counts it together with every cell the cascade opened.
    Revealed { opened: CellCount },
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed { .. } => true,
            HitMine => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(MineLayout::new((0, 4, 4)), Err(GameError::InvalidDimension));
        assert_eq!(MineLayout::new((4, 4, 0)), Err(GameError::InvalidDimension));
        assert_eq!(
            GameConfig::new((2, 2, 2), 9),
            Err(GameError::TooManyMines)
        );
        assert!(GameConfig::new((2, 2, 2), 8).is_ok());
    }

    #[test]
    fn add_mine_is_idempotent() {
        let mut layout = MineLayout::new((4, 4, 4)).unwrap();

        assert!(layout.add_mine((1, 2, 3)));
        assert!(!layout.add_mine((1, 2, 3)));
        assert!(!layout.add_mine((4, 0, 0)));

        assert_eq!(layout.mine_count(), 1);
        assert!(layout.contains_mine((1, 2, 3)));
        assert!(!layout.contains_mine((3, 2, 1)));
    }

    #[test]
    fn remove_mine_updates_count() {
        let mut layout = MineLayout::from_mine_coords((3, 3, 3), &[(0, 0, 0), (2, 2, 2)]).unwrap();

        assert!(layout.remove_mine((0, 0, 0)));
        assert!(!layout.remove_mine((0, 0, 0)));
        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.mine_coords().collect::<Vec<_>>(), [(2, 2, 2)]);
    }

    #[test]
    fn mine_mask_dimensions_are_checked() {
        let mask = Array3::from_shape_fn((2, 3, 4), |(z, y, x)| (x, y, z) == (3, 2, 1));
        let layout = MineLayout::from_mine_mask(mask).unwrap();
        assert_eq!(layout.size(), (4, 3, 2));
        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.mine_coords().collect::<Vec<_>>(), [(3, 2, 1)]);

        assert_eq!(
            MineLayout::from_mine_mask(Array3::default((1, 1, 256))),
            Err(GameError::InvalidDimension)
        );
        assert_eq!(
            MineLayout::from_mine_mask(Array3::default((0, 1, 1))),
            Err(GameError::InvalidDimension)
        );
    }

    #[test]
    fn deserialized_layout_is_checked() {
        let layout = MineLayout::from_mine_coords((5, 6, 7), &[(1, 2, 3), (4, 5, 6)]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let restored: MineLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, layout);
        assert_eq!(restored.mine_count(), 2);

        let oversized = serde_json::to_string(&Array3::<bool>::default((1, 1, 256))).unwrap();
        assert!(serde_json::from_str::<MineLayout>(&oversized).is_err());
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2, 2), &[(2, 0, 0)]),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn adjacent_count_covers_full_cube() {
        let mines: Vec<Coord3> = NeighborIter::cube((1, 1, 1), (3, 3, 3)).collect();
        let layout = MineLayout::from_mine_coords((3, 3, 3), &mines).unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1, 1)), 26);
        // the center is the only safe cell touching a corner
        assert_eq!(layout.adjacent_mine_count((0, 0, 0)), 6);
        assert_eq!(layout.adjacent_mine_count((5, 5, 5)), 0);
    }

    #[test]
    fn adjacent_count_has_no_wraparound() {
        let layout = MineLayout::from_mine_coords((4, 4, 4), &[(0, 0, 0)]).unwrap();

        assert_eq!(layout.adjacent_mine_count((3, 0, 0)), 0);
        assert_eq!(layout.adjacent_mine_count((3, 3, 3)), 0);
        assert_eq!(layout.adjacent_mine_count((1, 1, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((0, 0, 0)), 0);
    }

    #[test]
    fn adjacent_count_matches_brute_force() {
        let mines: [Coord3; 6] = [(0, 0, 0), (1, 1, 1), (1, 2, 1), (1, 2, 3), (3, 2, 4), (4, 5, 6)];
        let layout = MineLayout::from_mine_coords((5, 6, 7), &mines).unwrap();

        for ((z, y, x), _) in layout.mine_mask.indexed_iter() {
            let (x, y, z) = (x as i32, y as i32, z as i32);
            let expected = mines
                .iter()
                .filter(|&&(mx, my, mz)| {
                    let (dx, dy, dz) = (i32::from(mx) - x, i32::from(my) - y, i32::from(mz) - z);
                    (dx, dy, dz) != (0, 0, 0) && dx.abs() <= 1 && dy.abs() <= 1 && dz.abs() <= 1
                })
                .count();
            let coords = (x as Coord, y as Coord, z as Coord);
            assert_eq!(usize::from(layout.adjacent_mine_count(coords)), expected);
        }
    }

    #[test]
    fn layout_reports_its_config() {
        let layout = MineLayout::from_mine_coords((5, 6, 7), &[(0, 0, 0), (4, 5, 6)]).unwrap();

        assert_eq!(layout.game_config(), GameConfig::new((5, 6, 7), 2).unwrap());
        assert_eq!(layout.safe_cell_count(), 208);
        assert!(layout[(4, 5, 6)]);
        assert!(!layout[(4, 5, 5)]);
    }

    #[test]
    fn outcomes_report_updates() {
        assert!(!FlagOutcome::NoChange.has_update());
        assert!(!FlagOutcome::LimitReached.has_update());
        assert!(FlagOutcome::Unflagged.has_update());
        assert!(!RevealOutcome::NoChange.has_update());
        assert!(RevealOutcome::Revealed { opened: 1 }.has_update());
        assert!(RevealOutcome::HitMine.has_update());
    }

    #[test]
    fn place_position_centers_grid_on_origin() {
        let layout = MineLayout::new((4, 2, 1)).unwrap();

        assert_eq!(layout.place_position((0, 0, 0), 2.0), Some([-3.0, -1.0, 0.0]));
        assert_eq!(layout.place_position((3, 1, 0), 2.0), Some([3.0, 1.0, 0.0]));
        assert_eq!(layout.place_position((4, 0, 0), 2.0), None);
    }
}

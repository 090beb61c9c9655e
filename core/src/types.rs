use ndarray::Array3;

/// Single coordinate axis used for board dimensions and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Three-dimensional grid coordinates `(x, y, z)`.
pub type Coord3 = (Coord, Coord, Coord);

/// Display-space position of a cell. The engine only carries it around.
pub type Point3 = [f32; 3];

type Delta3 = (i8, i8, i8);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord3 {
    type Output = [usize; 3];

    /// Arrays are shaped `[z, y, x]` so that the standard layout keeps `x` as the fastest axis.
    fn to_nd_index(self) -> Self::Output {
        [self.2.into(), self.1.into(), self.0.into()]
    }
}

pub const fn volume(size: Coord3) -> CellCount {
    let x = size.0 as CellCount;
    let y = size.1 as CellCount;
    let z = size.2 as CellCount;
    x * y * z
}

pub const fn in_bounds(coords: Coord3, size: Coord3) -> bool {
    coords.0 < size.0 && coords.1 < size.1 && coords.2 < size.2
}

/// Row-major index `x + y*size_x + z*size_x*size_y`, `None` outside the grid.
pub fn linear_index(coords: Coord3, size: Coord3) -> Option<usize> {
    if !in_bounds(coords, size) {
        return None;
    }
    let (x, y, z) = (
        usize::from(coords.0),
        usize::from(coords.1),
        usize::from(coords.2),
    );
    let (size_x, size_y) = (usize::from(size.0), usize::from(size.1));
    Some(x + y * size_x + z * size_x * size_y)
}

/// Inverse of [`linear_index`].
pub fn from_linear_index(index: usize, size: Coord3) -> Option<Coord3> {
    let (size_x, size_y) = (usize::from(size.0), usize::from(size.1));
    if index >= volume(size) as usize {
        return None;
    }
    let x = index % size_x;
    let y = (index / size_x) % size_y;
    let z = index / (size_x * size_y);
    Some((x as Coord, y as Coord, z as Coord))
}

const fn cube_displacements() -> [Delta3; 26] {
    let mut out = [(0, 0, 0); 26];
    let mut i = 0;
    let mut dz = -1;
    while dz <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                if !(dx == 0 && dy == 0 && dz == 0) {
                    out[i] = (dx, dy, dz);
                    i += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    out
}

/// `{-1, 0, 1}³` without the origin: every cell sharing a face, edge or corner.
const CUBE_DISPLACEMENTS: [Delta3; 26] = cube_displacements();

/// Cells sharing a face, `±1` on exactly one axis.
const FACE_DISPLACEMENTS: [Delta3; 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord3, delta: Delta3, bounds: Coord3) -> Option<Coord3> {
    let next_x = coords.0.checked_add_signed(delta.0)?;
    let next_y = coords.1.checked_add_signed(delta.1)?;
    let next_z = coords.2.checked_add_signed(delta.2)?;
    let next = (next_x, next_y, next_z);
    in_bounds(next, bounds).then_some(next)
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord3,
    bounds: Coord3,
    displacements: &'static [Delta3],
    index: usize,
}

impl NeighborIter {
    /// All in-bounds cells of the 3×3×3 cube around `center`.
    pub fn cube(center: Coord3, bounds: Coord3) -> Self {
        Self::new(center, bounds, &CUBE_DISPLACEMENTS)
    }

    /// In-bounds cells sharing a face with `center`.
    pub fn faces(center: Coord3, bounds: Coord3) -> Self {
        Self::new(center, bounds, &FACE_DISPLACEMENTS)
    }

    fn new(center: Coord3, bounds: Coord3, displacements: &'static [Delta3]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord3;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = self.displacements.get(self.index) {
            self.index += 1;
            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}

pub trait NeighborIterExt {
    fn grid_size(&self) -> Coord3;

    fn iter_neighbors(&self, index: Coord3) -> NeighborIter {
        NeighborIter::cube(index, self.grid_size())
    }

    fn iter_face_neighbors(&self, index: Coord3) -> NeighborIter {
        NeighborIter::faces(index, self.grid_size())
    }
}

impl<T> NeighborIterExt for Array3<T> {
    fn grid_size(&self) -> Coord3 {
        // shapes are only ever built from `Coord3` sizes, see `ToNdIndex`
        let (z, y, x) = self.dim();
        (x as Coord, y as Coord, z as Coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn cube_neighbors_of_interior_cell_are_all_26() {
        let neighbors: Vec<_> = NeighborIter::cube((1, 1, 1), (3, 3, 3)).collect();

        assert_eq!(neighbors.len(), 26);
        assert!(!neighbors.contains(&(1, 1, 1)));
    }

    #[test]
    fn cube_neighbors_are_clipped_at_corners() {
        assert_eq!(NeighborIter::cube((0, 0, 0), (4, 4, 4)).count(), 7);
        assert_eq!(NeighborIter::cube((3, 3, 3), (4, 4, 4)).count(), 7);
        assert_eq!(NeighborIter::cube((0, 1, 1), (4, 4, 4)).count(), 17);
    }

    #[test]
    fn face_neighbors_follow_axis_order() {
        let neighbors: Vec<_> = NeighborIter::faces((1, 1, 1), (3, 3, 3)).collect();

        assert_eq!(
            neighbors,
            [
                (0, 1, 1),
                (2, 1, 1),
                (1, 0, 1),
                (1, 2, 1),
                (1, 1, 0),
                (1, 1, 2)
            ]
        );
        assert_eq!(NeighborIter::faces((0, 0, 0), (1, 1, 1)).count(), 0);
    }

    #[test]
    fn linear_index_is_row_major_bijection() {
        let size = (5, 6, 7);

        assert_eq!(linear_index((0, 0, 0), size), Some(0));
        assert_eq!(linear_index((1, 0, 0), size), Some(1));
        assert_eq!(linear_index((0, 1, 0), size), Some(5));
        assert_eq!(linear_index((0, 0, 1), size), Some(30));
        assert_eq!(linear_index((5, 0, 0), size), None);

        for index in 0..volume(size) as usize {
            let coords = from_linear_index(index, size).unwrap();
            assert_eq!(linear_index(coords, size), Some(index));
        }
        assert_eq!(from_linear_index(210, size), None);
    }

    #[test]
    fn array_shape_matches_row_major_order() {
        let size = (3, 2, 4);
        let mut grid: Array3<usize> = Array3::default(size.to_nd_index());
        for (index, value) in grid.iter_mut().enumerate() {
            *value = index;
        }

        assert_eq!(grid.grid_size(), size);
        assert_eq!(grid[(2, 1, 3).to_nd_index()], linear_index((2, 1, 3), size).unwrap());
    }
}

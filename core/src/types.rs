use ndarray::Array2;

/// Signed row or column index. Negative values are valid input and simply out of bounds.
pub type Coord = i32;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`, also used for `(rows, columns)` sizes.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Callers must have checked bounds first, negative coordinates wrap into huge indices.
    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    if a <= 0 || b <= 0 {
        return 0;
    }
    (a as CellCount).saturating_mul(b as CellCount)
}

pub const fn in_bounds((row, col): Coord2, (rows, columns): Coord2) -> bool {
    row >= 0 && row < rows && col >= 0 && col < columns
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, columns) = self.dim();
        NeighborIter::new(index, (rows as Coord, columns as Coord))
    }
}

const DISPLACEMENTS: [Coord2; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moore neighborhood of a cell, clipped to the board. There is no wraparound.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dr, dc)) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            let next_item = (self.center.0 + dr, self.center.1 + dc);
            if in_bounds(next_item, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}

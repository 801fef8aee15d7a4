use std::ops::BitOr;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use persist::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod layout;
mod persist;
mod session;
mod tile;
mod types;

/// Board dimensions and mine count, always leaving at least one safe cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const BEGINNER: Self = Self::new_unchecked((9, 9), 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked((16, 16), 40);
    pub const EXPERT: Self = Self::new_unchecked((16, 30), 99);

    /// Largest accepted number of rows or columns.
    pub const MAX_SIDE: Coord = 4096;

    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        if !(1..=Self::MAX_SIDE).contains(&rows) || !(1..=Self::MAX_SIDE).contains(&columns) {
            return Err(BoardError::InvalidSize {
                rows: rows.into(),
                columns: columns.into(),
            });
        }
        let cells = mult(rows, columns);
        if mines >= cells {
            return Err(BoardError::TooManyMines {
                mines: mines.into(),
                cells: cells.into(),
            });
        }
        Ok(Self::new_unchecked((rows, columns), mines))
    }

    /// Like [`BoardConfig::new`] but clamps instead of failing, for user-entered values.
    pub fn clamped(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Self::MAX_SIDE);
        let columns = columns.clamp(1, Self::MAX_SIDE);
        let mines = mines.min(mult(rows, columns).saturating_sub(1));
        Self::new_unchecked((rows, columns), mines)
    }

    /// Validates a persisted `rows columns mines` header.
    pub fn from_header(rows: i64, columns: i64, mines: i64) -> Result<Self> {
        if rows <= 0 || columns <= 0 || mines < 0 {
            return Err(BoardError::InvalidHeader {
                rows,
                columns,
                mines,
            });
        }
        let size_err = || BoardError::InvalidSize { rows, columns };
        let rows = Coord::try_from(rows).map_err(|_| size_err())?;
        let columns = Coord::try_from(columns).map_err(|_| size_err())?;
        let mines = CellCount::try_from(mines).map_err(|_| BoardError::TooManyMines {
            mines,
            cells: mult(rows, columns).into(),
        })?;
        Self::new(rows, columns, mines)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn columns(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::EXPERT
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Exploded,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn exploded(self) -> bool {
        matches!(self, Self::Exploded)
    }
}

/// Used to merge outcomes when revealing several tiles at once.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Exploded, _) => Exploded,
            (_, Exploded) => Exploded,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoardError, Result};

/// Visibility state of a tile.
///
/// The discriminants are the persisted state codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileState {
    #[default]
    Covered = 0,
    Revealed = 1,
    Flagged = 2,
    Questioned = 3,
    Exploded = 4,
}

impl TileState {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Result<Self> {
        use TileState::*;
        Ok(match code {
            0 => Covered,
            1 => Revealed,
            2 => Flagged,
            3 => Questioned,
            4 => Exploded,
            _ => return Err(BoardError::UnknownTileState(code)),
        })
    }

    /// Next marker in the Covered -> Flagged -> Questioned -> Covered ring.
    ///
    /// Revealed and Exploded tiles are outside the ring and stay as they are.
    pub const fn next_marker(self) -> Self {
        use TileState::*;
        match self {
            Covered => Flagged,
            Flagged => Questioned,
            Questioned => Covered,
            Revealed => Revealed,
            Exploded => Exploded,
        }
    }

    /// Player markers that protect a tile from reveal.
    pub const fn is_marked(self) -> bool {
        matches!(self, Self::Flagged | Self::Questioned)
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Covered => "COVERED",
            Self::Revealed => "REVEALED",
            Self::Flagged => "FLAGGED",
            Self::Questioned => "QUESTIONED",
            Self::Exploded => "EXPLODED",
        };
        f.write_str(name)
    }
}

/// One grid cell. `adjacent_mines` is always 0 on mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub state: TileState,
    pub is_mine: bool,
    pub adjacent_mines: u8,
}

impl Tile {
    pub const fn mine() -> Self {
        Self {
            state: TileState::Covered,
            is_mine: true,
            adjacent_mines: 0,
        }
    }

    pub const fn is_covered(&self) -> bool {
        matches!(self.state, TileState::Covered)
    }
}

/// Debug glyph, shows the content regardless of state.
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mine {
            f.write_str("*")
        } else if self.adjacent_mines == 0 {
            f.write_str(".")
        } else {
            write!(f, "{}", self.adjacent_mines)
        }
    }
}

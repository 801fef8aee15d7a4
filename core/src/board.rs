use std::fmt;
use std::io::{Read, Write};
use std::ops::Index;

use ndarray::{Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layout::parse_layout;
use crate::*;

/// Grid of tiles with its mine layout, mutated in place by reveal and flag toggles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    config: BoardConfig,
    tiles: Array2<Tile>,
}

impl Board {
    /// Board with `config.mines` mines placed uniformly at random.
    pub fn new_random<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Self {
        let board = Self::from_mine_mask(config, &place_random_mines(config, rng));
        log::debug!(
            "new random board {}x{} with {} mines",
            config.rows(),
            config.columns(),
            config.mines
        );
        board
    }

    /// Board with exactly the mines marked in a layout description, see the `layout` module.
    pub fn from_layout(description: &str) -> Result<Self> {
        let (config, mine_mask) = parse_layout(description)?;
        log::debug!(
            "board from layout {}x{} with {} mines",
            config.rows(),
            config.columns(),
            config.mines
        );
        Ok(Self::from_mine_mask(config, &mine_mask))
    }

    fn from_mine_mask(config: BoardConfig, mine_mask: &Array2<bool>) -> Self {
        let counts = adjacency_counts(mine_mask);
        let tiles = Zip::from(mine_mask)
            .and(&counts)
            .map_collect(|&is_mine, &adjacent_mines| Tile {
                state: TileState::Covered,
                is_mine,
                adjacent_mines,
            });
        Self { config, tiles }
    }

    /// Re-lays mines for a new config, all prior tile state is discarded.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: BoardConfig, rng: &mut R) {
        *self = Self::new_random(config, rng);
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn columns(&self) -> Coord {
        self.config.columns()
    }

    pub fn mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(BoardError::InvalidCoords(coords))
        }
    }

    pub fn tile(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    /// All tiles with their coordinates, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.tiles
            .indexed_iter()
            .map(|((row, col), &tile)| ((row as Coord, col as Coord), tile))
    }

    pub fn count_state(&self, state: TileState) -> CellCount {
        self.tiles.iter().filter(|tile| tile.state == state).count() as CellCount
    }

    /// In-bounds neighbors of `coords`.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Reveals a covered tile, flooding outward from tiles with no adjacent mines.
    ///
    /// Flagged, questioned and already uncovered tiles are left alone.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.reveal_tile(coords))
    }

    fn reveal_tile(&mut self, coords: Coord2) -> RevealOutcome {
        let tile = &mut self.tiles[coords.to_nd_index()];
        if !tile.is_covered() {
            return RevealOutcome::NoChange;
        }
        if tile.is_mine {
            tile.state = TileState::Exploded;
            log::debug!("mine exploded at {:?}", coords);
            return RevealOutcome::Exploded;
        }
        tile.state = TileState::Revealed;
        if tile.adjacent_mines > 0 {
            return RevealOutcome::Revealed;
        }

        // only covered tiles are opened, so each tile enters at most once
        let mut to_visit: Vec<Coord2> = self.neighbors(coords).collect();
        let mut flooded = 0;
        while let Some(visit_coords) = to_visit.pop() {
            let tile = &mut self.tiles[visit_coords.to_nd_index()];
            if !tile.is_covered() {
                continue;
            }
            debug_assert!(!tile.is_mine, "flood reached a mine at {visit_coords:?}");
            tile.state = TileState::Revealed;
            flooded += 1;
            if tile.adjacent_mines == 0 {
                to_visit.extend(self.neighbors(visit_coords));
            }
        }
        log::trace!("flood from {:?} opened {} more tiles", coords, flooded);

        RevealOutcome::Revealed
    }

    /// Cycles Covered -> Flagged -> Questioned -> Covered and returns the new state.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<TileState> {
        let coords = self.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];
        tile.state = tile.state.next_marker();
        Ok(tile.state)
    }

    pub fn to_record(&self) -> BoardRecord {
        BoardRecord {
            rows: self.rows().into(),
            columns: self.columns().into(),
            mines: self.mines().into(),
            tiles: self.tiles.iter().copied().collect(),
        }
    }

    pub fn save<S: BoardSerializer + ?Sized>(&self, format: &S, sink: &mut dyn Write) -> Result<()> {
        format.save(&self.to_record(), sink)?;
        log::debug!("saved {}x{} board", self.rows(), self.columns());
        Ok(())
    }

    /// Reads a saved board, checking every board invariant.
    pub fn read<S: BoardSerializer + ?Sized>(format: &S, source: &mut dyn Read) -> Result<Self> {
        let board = format.load(source).and_then(Board::try_from).inspect_err(|err| {
            log::warn!("rejected saved board: {err}");
        })?;
        log::debug!("loaded {}x{} board", board.rows(), board.columns());
        Ok(board)
    }

    /// Replaces this board with one read from `source`. On failure the board is untouched.
    pub fn load<S: BoardSerializer + ?Sized>(&mut self, format: &S, source: &mut dyn Read) -> Result<()> {
        *self = Self::read(format, source)?;
        Ok(())
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = BoardError;

    fn try_from(record: BoardRecord) -> Result<Self> {
        let config = BoardConfig::from_header(record.rows, record.columns, record.mines)?;
        let found = record.tiles.len();
        let tiles = Array2::from_shape_vec(config.size.to_nd_index(), record.tiles).map_err(|_| {
            BoardError::MalformedRecord(format!(
                "expected {} tiles, found {found}",
                config.total_cells()
            ))
        })?;

        let mine_mask = tiles.map(|tile| tile.is_mine);
        let placed = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        if placed != config.mines {
            return Err(BoardError::InconsistentBoard(format!(
                "header declares {} mines but {placed} tiles are mines",
                config.mines
            )));
        }

        let counts = adjacency_counts(&mine_mask);
        for ((row, col), tile) in tiles.indexed_iter() {
            let expected = counts[[row, col]];
            if tile.adjacent_mines != expected {
                return Err(BoardError::InconsistentBoard(format!(
                    "tile ({row}, {col}) counts {} adjacent mines, layout has {expected}",
                    tile.adjacent_mines
                )));
            }
            if tile.state == TileState::Exploded && !tile.is_mine {
                return Err(BoardError::InconsistentBoard(format!(
                    "tile ({row}, {col}) exploded without a mine"
                )));
            }
        }

        Ok(Self { config, tiles })
    }
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        board.to_record()
    }
}

/// Internal accessor, panics when out of bounds. Use [`Board::tile`] for checked access.
impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        assert!(self.in_bounds(coords), "tile {coords:?} out of bounds");
        &self.tiles[coords.to_nd_index()]
    }
}

/// Debug dump, shows every tile regardless of its state.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.rows() {
            for tile in row {
                write!(f, "{tile} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use std::io::{Read, Write};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Playing on restart
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    /// Lost by revealing the mine at `exploded`
    Lost { exploded: Coord2 },
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }

    /// Status as the board shows it, so a restored save resumes where it left off.
    pub fn of(board: &Board) -> Self {
        if let Some((exploded, _)) = board
            .tiles()
            .find(|(_, tile)| tile.state == TileState::Exploded)
        {
            Self::Lost { exploded }
        } else if is_won(board) {
            Self::Won
        } else {
            Self::Playing
        }
    }
}

/// Won once every safe tile is revealed. Flags are not required.
pub fn is_won(board: &Board) -> bool {
    board
        .tiles()
        .all(|(_, tile)| tile.is_mine || tile.state == TileState::Revealed)
}

/// One game played on a board, deriving win and loss from what the board reports.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    board: Board,
    status: GameStatus,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        let status = GameStatus::of(&board);
        Self { board, status }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// How many mines have not been flagged yet, negative with too many flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.board.mines()) - i64::from(self.board.count_state(TileState::Flagged))
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;

        let outcome = self.board.reveal(coords)?;
        if outcome.exploded() {
            self.end_game(GameStatus::Lost { exploded: coords });
        } else if outcome.has_update() && is_won(&self.board) {
            self.end_game(GameStatus::Won);
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<TileState> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;
        self.board.toggle_flag(coords)
    }

    /// Whether `coords` is a revealed number with exactly that many flags around it.
    ///
    /// A question mark among the neighbors blocks the chord.
    pub fn can_chord(&self, coords: Coord2) -> bool {
        let Ok(tile) = self.board.tile(coords) else {
            return false;
        };
        if tile.state != TileState::Revealed || tile.adjacent_mines == 0 {
            return false;
        }

        let mut flagged = 0;
        for pos in self.board.neighbors(coords) {
            match self.board[pos].state {
                TileState::Flagged => flagged += 1,
                TileState::Questioned => return false,
                _ => {}
            }
        }
        flagged == tile.adjacent_mines
    }

    /// Reveals every covered neighbor of a satisfied number. Flagged tiles stay closed.
    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;

        if !self.can_chord(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        let mut exploded = None;
        for pos in self.board.neighbors(coords) {
            let neighbor_outcome = self.board.reveal(pos)?;
            if neighbor_outcome.exploded() && exploded.is_none() {
                exploded = Some(pos);
            }
            outcome = outcome | neighbor_outcome;
        }
        log::debug!("chord at {:?}: {:?}", coords, outcome);

        if let Some(exploded) = exploded {
            self.end_game(GameStatus::Lost { exploded });
        } else if outcome.has_update() && is_won(&self.board) {
            self.end_game(GameStatus::Won);
        }
        Ok(outcome)
    }

    /// New random layout with the same config.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = self.board.config();
        self.board.reset(config, rng);
        self.status = GameStatus::Playing;
        log::debug!("restarted {}x{}", config.rows(), config.columns());
    }

    pub fn save<S: BoardSerializer + ?Sized>(&self, format: &S, sink: &mut dyn Write) -> Result<()> {
        self.board.save(format, sink)
    }

    /// Replaces the board and re-derives the status. On failure nothing changes.
    pub fn load<S: BoardSerializer + ?Sized>(&mut self, format: &S, source: &mut dyn Read) -> Result<()> {
        self.board.load(format, source)?;
        self.status = GameStatus::of(&self.board);
        Ok(())
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(BoardError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }
        log::debug!("game ended: {:?}", status);
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(layout: &str) -> GameSession {
        GameSession::new(Board::from_layout(layout).unwrap())
    }

    #[test]
    fn fresh_board_is_playing() {
        let game = session("2 2 1\n* .\n. .");

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn revealing_every_safe_tile_wins() {
        let mut game = session("1 3 1\n* . .");

        assert_eq!(game.reveal((0, 2)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(game.status(), GameStatus::Won);
        assert!(game.is_finished());
        assert_eq!(game.board()[(0, 1)].state, TileState::Revealed);
    }

    #[test]
    fn flags_are_not_needed_to_win() {
        let mut game = session("1 2 1\n* .");

        game.reveal((0, 1)).unwrap();

        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn hitting_a_mine_loses() {
        let mut game = session("2 2 1\n* .\n. .");

        assert!(game.reveal((0, 0)).unwrap().exploded());

        assert_eq!(game.status(), GameStatus::Lost { exploded: (0, 0) });
    }

    #[test]
    fn moves_after_game_end_are_rejected() {
        let mut game = session("2 2 1\n* .\n. .");
        game.reveal((0, 0)).unwrap();

        assert!(matches!(game.reveal((1, 1)), Err(BoardError::AlreadyEnded)));
        assert!(matches!(game.toggle_flag((1, 1)), Err(BoardError::AlreadyEnded)));
        assert!(matches!(game.chord((1, 1)), Err(BoardError::AlreadyEnded)));
    }

    #[test]
    fn bad_coords_win_over_ended_game() {
        let mut game = session("2 2 1\n* .\n. .");
        game.reveal((0, 0)).unwrap();

        assert!(matches!(game.reveal((2, 0)), Err(BoardError::InvalidCoords(_))));
    }

    #[test]
    fn mines_left_counts_flags_only() {
        let mut game = session("2 2 1\n* .\n. .");

        game.toggle_flag((0, 1)).unwrap();
        game.toggle_flag((1, 1)).unwrap();
        game.toggle_flag((1, 1)).unwrap();

        assert_eq!(game.mines_left(), 0);
        game.toggle_flag((1, 0)).unwrap();
        assert_eq!(game.mines_left(), -1);
    }

    #[test]
    fn chord_reveals_around_satisfied_number() {
        let mut game = session("3 3 2\n. * .\n. . .\n. * .");
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 1)).unwrap();
        game.toggle_flag((2, 1)).unwrap();

        let outcome = game.chord((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.board()[(0, 1)].state, TileState::Flagged);
    }

    #[test]
    fn chord_with_wrong_flag_explodes() {
        let mut game = session("3 3 1\n. * .\n. . .\n. . .");
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((2, 2)).unwrap();

        let outcome = game.chord((1, 1)).unwrap();

        assert!(outcome.exploded());
        assert_eq!(game.status(), GameStatus::Lost { exploded: (0, 1) });
    }

    #[test]
    fn chord_needs_matching_flags_and_no_question_marks() {
        let mut game = session("3 3 2\n. * .\n. . .\n. * .");
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 1)).unwrap();

        assert!(!game.can_chord((1, 1)));
        assert_eq!(game.chord((1, 1)).unwrap(), RevealOutcome::NoChange);

        game.toggle_flag((2, 1)).unwrap();
        game.toggle_flag((0, 0)).unwrap();
        game.toggle_flag((0, 0)).unwrap();
        assert!(!game.can_chord((1, 1)));
        assert!(!game.can_chord((0, 0)));
    }

    #[test]
    fn restart_lays_new_mines_with_same_config() {
        let mut game = session("2 2 1\n* .\n. .");
        game.reveal((0, 0)).unwrap();

        game.restart(&mut StdRng::seed_from_u64(9));

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.board().config(), BoardConfig::new(2, 2, 1).unwrap());
        assert_eq!(game.board().count_state(TileState::Covered), 4);
    }

    #[test]
    fn load_restores_status() {
        let mut lost = session("2 2 1\n* .\n. .");
        lost.reveal((0, 0)).unwrap();
        let mut buffer = Vec::new();
        lost.save(&Format::Text, &mut buffer).unwrap();

        let mut game = session("1 2 1\n* .");
        game.load(&Format::Text, &mut buffer.as_slice()).unwrap();

        assert_eq!(game.status(), GameStatus::Lost { exploded: (0, 0) });
        assert_eq!(game.board(), lost.board());
    }

    #[test]
    fn failed_load_keeps_session() {
        let mut game = session("2 2 1\n* .\n. .");
        game.toggle_flag((0, 0)).unwrap();
        let before = game.clone();

        assert!(game.load(&Format::Text, &mut "0 0 0".as_bytes()).is_err());
        assert_eq!(game, before);
    }
}

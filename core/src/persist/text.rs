use std::io::{Read, Write};
use std::str::SplitAsciiWhitespace;

use super::*;

/// Plain text save: a `rows columns mines` header line, then one
/// `state is_mine adjacent_mines` line per tile.
#[derive(Copy, Clone, Debug, Default)]
pub struct TextFormat;

impl BoardSerializer for TextFormat {
    fn save(&self, record: &BoardRecord, sink: &mut dyn Write) -> Result<()> {
        writeln!(sink, "{} {} {}", record.rows, record.columns, record.mines)?;
        for tile in &record.tiles {
            writeln!(
                sink,
                "{} {} {}",
                tile.state.code(),
                u8::from(tile.is_mine),
                tile.adjacent_mines
            )?;
        }
        sink.flush()?;
        Ok(())
    }

    fn load(&self, source: &mut dyn Read) -> Result<BoardRecord> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        let mut tokens = Tokens(text.split_ascii_whitespace());

        let rows = tokens.next_int("rows")?;
        let columns = tokens.next_int("columns")?;
        let mines = tokens.next_int("mines")?;
        let config = BoardConfig::from_header(rows, columns, mines)?;

        let total = config.total_cells() as usize;
        let mut tiles = Vec::with_capacity(total.min(1 << 16));
        for index in 0..total {
            let state = TileState::from_code(tokens.next_int("tile state")?)?;
            let is_mine = match tokens.next_int("mine flag")? {
                0 => false,
                1 => true,
                other => {
                    return Err(BoardError::MalformedRecord(format!(
                        "tile {index} has mine flag {other}, expected 0 or 1"
                    )));
                }
            };
            let adjacent_mines = tokens.next_int("adjacent count")?;
            let adjacent_mines = u8::try_from(adjacent_mines)
                .ok()
                .filter(|&count| count <= 8)
                .ok_or_else(|| {
                    BoardError::MalformedRecord(format!(
                        "tile {index} has adjacent count {adjacent_mines}"
                    ))
                })?;
            tiles.push(Tile {
                state,
                is_mine,
                adjacent_mines,
            });
        }

        if let Some(extra) = tokens.0.next() {
            return Err(BoardError::MalformedRecord(format!(
                "unexpected trailing token {extra:?}"
            )));
        }

        Ok(BoardRecord {
            rows,
            columns,
            mines,
            tiles,
        })
    }
}

struct Tokens<'a>(SplitAsciiWhitespace<'a>);

impl Tokens<'_> {
    fn next_int(&mut self, what: &str) -> Result<i64> {
        let token = self
            .0
            .next()
            .ok_or_else(|| BoardError::MalformedRecord(format!("truncated, missing {what}")))?;
        token
            .parse()
            .map_err(|_| BoardError::MalformedRecord(format!("bad {what} {token:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::tests::mixed_board;

    fn load_str(text: &str) -> Result<BoardRecord> {
        TextFormat.load(&mut text.as_bytes())
    }

    #[test]
    fn writes_header_then_one_line_per_tile() {
        let board = Board::from_layout("2 2 1\n* .\n. .").unwrap();
        let mut out = Vec::new();

        TextFormat.save(&board.to_record(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 2 1\n0 1 0\n0 0 1\n0 0 1\n0 0 1\n"
        );
    }

    #[test]
    fn writes_three_values_per_tile() {
        let board = mixed_board();
        let mut out = Vec::new();

        TextFormat.save(&board.to_record(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("5 6 4"));
        let payload: Vec<&str> = lines.flat_map(str::split_ascii_whitespace).collect();
        assert_eq!(payload.len(), 5 * 6 * 3);
    }

    #[test]
    fn state_codes_in_output() {
        let board = mixed_board();
        let mut out = Vec::new();

        TextFormat.save(&board.to_record(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        // (0, 0) questioned, (1, 1) flagged mine, (2, 3) exploded mine
        assert_eq!(lines[0], "3 0 1");
        assert_eq!(lines[6 + 1], "2 1 0");
        assert_eq!(lines[2 * 6 + 3], "4 1 0");
        assert_eq!(lines[4 * 6], "1 0 0");
    }

    #[test]
    fn accepts_any_whitespace() {
        let record = load_str("1 2 1   0 1 0\t0 0\n1").unwrap();

        assert_eq!(record.tiles.len(), 2);
        assert!(record.tiles[0].is_mine);
        assert_eq!(record.tiles[1].adjacent_mines, 1);
    }

    #[test]
    fn rejects_non_positive_header() {
        for text in ["0 5 1\n", "5 0 1\n", "-1 5 1\n", "5 5 -1\n"] {
            assert!(
                matches!(load_str(text), Err(BoardError::InvalidHeader { .. })),
                "{text:?}"
            );
        }
    }

    #[test]
    fn rejects_truncated_records() {
        assert!(matches!(
            load_str("1 2 1\n0 1 0\n0 0"),
            Err(BoardError::MalformedRecord(_))
        ));
        assert!(matches!(load_str(""), Err(BoardError::MalformedRecord(_))));
    }

    #[test]
    fn rejects_trailing_records() {
        assert!(matches!(
            load_str("1 2 1\n0 1 0\n0 0 1\n0 0 1\n"),
            Err(BoardError::MalformedRecord(_))
        ));
    }

    #[test]
    fn rejects_bad_tile_values() {
        assert!(matches!(
            load_str("1 2 1\n5 1 0\n0 0 1\n"),
            Err(BoardError::UnknownTileState(5))
        ));
        assert!(matches!(
            load_str("1 2 1\n0 2 0\n0 0 1\n"),
            Err(BoardError::MalformedRecord(_))
        ));
        assert!(matches!(
            load_str("1 2 1\n0 1 0\n0 0 9\n"),
            Err(BoardError::MalformedRecord(_))
        ));
        assert!(matches!(
            load_str("1 2 1\n0 1 0\n0 0 x\n"),
            Err(BoardError::MalformedRecord(_))
        ));
    }
}

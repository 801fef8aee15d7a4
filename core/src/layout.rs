//! Deterministic board descriptions, used for reproducible starting boards.
//!
//! ```text
//! 5 6 4
//! . . * . . .
//! . * . . . .
//! . . . * . .
//! . . . . . .
//! . . . . . *
//! ```

use ndarray::Array2;

use crate::*;

const MINE_TOKEN: char = '*';

pub(crate) fn parse_layout(description: &str) -> Result<(BoardConfig, Array2<bool>)> {
    let mut tokens = description.split_whitespace();

    let mut header = [0i64; 3];
    for (value, name) in header.iter_mut().zip(["rows", "columns", "mines"]) {
        let token = tokens
            .next()
            .ok_or_else(|| BoardError::MalformedLayout(format!("missing {name}")))?;
        *value = token
            .parse()
            .map_err(|_| BoardError::MalformedLayout(format!("bad {name} {token:?}")))?;
    }
    let [rows, columns, mines] = header;
    let config = BoardConfig::from_header(rows, columns, mines)?;

    let total = config.total_cells() as usize;
    let mut cells = Vec::with_capacity(total.min(1 << 16));
    for (index, token) in tokens.enumerate() {
        if index == total {
            return Err(BoardError::MalformedLayout(format!(
                "unexpected trailing token {token:?}"
            )));
        }
        let mut chars = token.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(BoardError::MalformedLayout(format!(
                "cell {index} is {token:?}, expected a single character"
            )));
        };
        cells.push(ch == MINE_TOKEN);
    }
    if cells.len() != total {
        return Err(BoardError::MalformedLayout(format!(
            "expected {total} cells, found {}",
            cells.len()
        )));
    }
    let mine_mask = Array2::from_shape_vec(config.size.to_nd_index(), cells)
        .map_err(|err| BoardError::MalformedLayout(err.to_string()))?;

    let placed = mine_mask.iter().filter(|&&is_mine| is_mine).count();
    if placed as CellCount != config.mines {
        return Err(BoardError::MalformedLayout(format!(
            "header declares {} mines but layout has {placed}",
            config.mines
        )));
    }

    Ok((config, mine_mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mine_positions() {
        let (config, mask) = parse_layout("2 3 2\n* . .\n. . *\n").unwrap();

        assert_eq!(config.size, (2, 3));
        assert_eq!(config.mines, 2);
        assert!(mask[[0, 0]]);
        assert!(mask[[1, 2]]);
        assert!(!mask[[0, 1]]);
    }

    #[test]
    fn any_other_character_is_safe() {
        let (_, mask) = parse_layout("1 4 1 x o * #").unwrap();

        assert_eq!(mask.iter().filter(|&&is_mine| is_mine).count(), 1);
        assert!(mask[[0, 2]]);
    }

    #[test]
    fn rejects_truncated_layout() {
        assert!(matches!(
            parse_layout("2 2 1\n* .\n."),
            Err(BoardError::MalformedLayout(_))
        ));
    }

    #[test]
    fn rejects_trailing_cells() {
        assert!(matches!(
            parse_layout("1 2 1\n* . ."),
            Err(BoardError::MalformedLayout(_))
        ));
    }

    #[test]
    fn huge_header_over_short_body_is_an_error() {
        assert!(matches!(
            parse_layout("4096 4096 0\n."),
            Err(BoardError::MalformedLayout(_))
        ));
        assert!(matches!(
            parse_layout("2147483647 2147483647 0\n."),
            Err(BoardError::InvalidSize { .. })
        ));
    }

    #[test]
    fn rejects_multi_character_cells() {
        assert!(matches!(
            parse_layout("1 2 1\n** ."),
            Err(BoardError::MalformedLayout(_))
        ));
    }

    #[test]
    fn rejects_mine_count_mismatch() {
        assert!(matches!(
            parse_layout("2 2 2\n* .\n. ."),
            Err(BoardError::MalformedLayout(_))
        ));
    }

    #[test]
    fn rejects_bad_header() {
        assert!(matches!(
            parse_layout("two 2 1\n* .\n. ."),
            Err(BoardError::MalformedLayout(_))
        ));
        assert!(matches!(
            parse_layout("0 2 0\n"),
            Err(BoardError::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_layout("2 2 4\n* *\n* *"),
            Err(BoardError::TooManyMines { .. })
        ));
    }
}

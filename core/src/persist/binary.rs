use std::io::{self, Read, Write};

use super::*;

const MAGIC: &[u8; 4] = b"MSWP";
const VERSION: u8 = 1;

/// Compact save: magic, version, little-endian `u32` header, then three bytes per tile.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryFormat;

impl BoardSerializer for BinaryFormat {
    fn save(&self, record: &BoardRecord, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(MAGIC)?;
        sink.write_all(&[VERSION])?;
        for value in [record.rows, record.columns, record.mines] {
            let value = u32::try_from(value).map_err(|_| BoardError::InvalidHeader {
                rows: record.rows,
                columns: record.columns,
                mines: record.mines,
            })?;
            sink.write_all(&value.to_le_bytes())?;
        }
        let mut payload = Vec::with_capacity(record.tiles.len() * 3);
        for tile in &record.tiles {
            payload.extend_from_slice(&[
                tile.state.code(),
                u8::from(tile.is_mine),
                tile.adjacent_mines,
            ]);
        }
        sink.write_all(&payload)?;
        sink.flush()?;
        Ok(())
    }

    fn load(&self, source: &mut dyn Read) -> Result<BoardRecord> {
        let mut magic = [0u8; 4];
        read_exact(source, &mut magic, "magic")?;
        if &magic != MAGIC {
            return Err(BoardError::MalformedRecord("bad magic".into()));
        }
        let mut version = [0u8; 1];
        read_exact(source, &mut version, "version")?;
        if version[0] != VERSION {
            return Err(BoardError::MalformedRecord(format!(
                "unsupported version {}",
                version[0]
            )));
        }

        let mut header = [0u8; 12];
        read_exact(source, &mut header, "header")?;
        let field = |i: usize| {
            i64::from(u32::from_le_bytes([
                header[i],
                header[i + 1],
                header[i + 2],
                header[i + 3],
            ]))
        };
        let (rows, columns, mines) = (field(0), field(4), field(8));
        let config = BoardConfig::from_header(rows, columns, mines)?;

        let total = config.total_cells() as usize;
        let mut tiles = Vec::with_capacity(total.min(1 << 16));
        let mut triple = [0u8; 3];
        for index in 0..total {
            read_exact(source, &mut triple, "tile")?;
            let [state, is_mine, adjacent_mines] = triple;
            let is_mine = match is_mine {
                0 => false,
                1 => true,
                other => {
                    return Err(BoardError::MalformedRecord(format!(
                        "tile {index} has mine flag {other}, expected 0 or 1"
                    )));
                }
            };
            if adjacent_mines > 8 {
                return Err(BoardError::MalformedRecord(format!(
                    "tile {index} has adjacent count {adjacent_mines}"
                )));
            }
            tiles.push(Tile {
                state: TileState::from_code(state.into())?,
                is_mine,
                adjacent_mines,
            });
        }

        if source.bytes().next().transpose()?.is_some() {
            return Err(BoardError::MalformedRecord("unexpected trailing bytes".into()));
        }

        Ok(BoardRecord {
            rows,
            columns,
            mines,
            tiles,
        })
    }
}

fn read_exact(source: &mut dyn Read, buf: &mut [u8], what: &str) -> Result<()> {
    source.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            BoardError::MalformedRecord(format!("truncated, missing {what}"))
        }
        _ => err.into(),
    })
}

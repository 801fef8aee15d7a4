//! Save formats for boards.
//!
//! Every format writes the same record: `rows`, `columns`, `mines`, then one
//! `(state, is_mine, adjacent_mines)` triple per tile in row-major order.
//! Decoding only produces a [`BoardRecord`]; turning it into a [`Board`] is
//! where the board invariants get checked, so all formats reject the same
//! corrupt input.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use binary::*;
pub use json::*;
pub use text::*;

use crate::*;

mod binary;
mod json;
mod text;

/// Format-neutral persisted board, header values are kept signed so bad input can be reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub rows: i64,
    pub columns: i64,
    pub mines: i64,
    pub tiles: Vec<Tile>,
}

pub trait BoardSerializer {
    fn save(&self, record: &BoardRecord, sink: &mut dyn Write) -> Result<()>;
    fn load(&self, source: &mut dyn Read) -> Result<BoardRecord>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Binary,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Text, Format::Binary, Format::Json];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "sav" => Some(Self::Text),
            "bin" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl BoardSerializer for Format {
    fn save(&self, record: &BoardRecord, sink: &mut dyn Write) -> Result<()> {
        match self {
            Self::Text => TextFormat.save(record, sink),
            Self::Binary => BinaryFormat.save(record, sink),
            Self::Json => JsonFormat.save(record, sink),
        }
    }

    fn load(&self, source: &mut dyn Read) -> Result<BoardRecord> {
        match self {
            Self::Text => TextFormat.load(source),
            Self::Binary => BinaryFormat.load(source),
            Self::Json => JsonFormat.load(source),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown format {s:?}, expected text, binary or json"))
    }
}

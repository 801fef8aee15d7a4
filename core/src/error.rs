use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Invalid board size {rows}x{columns}")]
    InvalidSize { rows: i64, columns: i64 },
    #[error("Too many mines: {mines} requested but only {cells} cells")]
    TooManyMines { mines: i64, cells: i64 },
    #[error("Invalid header: {rows} {columns} {mines}")]
    InvalidHeader { rows: i64, columns: i64, mines: i64 },
    #[error("Malformed layout: {0}")]
    MalformedLayout(String),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Unknown tile state code {0}")]
    UnknownTileState(i64),
    #[error("Inconsistent board: {0}")]
    InconsistentBoard(String),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;

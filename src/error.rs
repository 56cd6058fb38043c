//! Error types shared across the engine.
//!
//! `MoveError` is the enumerable rejection reason returned by the rule engine.
//! The session layer decides what to show a player for each variant; nothing
//! in this crate retries on its behalf.

use crate::engine::{Color, Location, MoveSequence};
use std::path::PathBuf;
use thiserror::Error;

/// Reasons the rule engine rejects a proposed move sequence.
///
/// Variants are listed in the order the checks run, so the first failing
/// check determines which variant a caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("a move needs at least 2 locations, got {len}")]
    SequenceTooShort { len: usize },

    #[error("location {location} is off the board")]
    OutOfBounds { location: Location },

    #[error("no piece at source location {location}")]
    NoPieceAtSource { location: Location },

    #[error("it is not {color}'s turn yet ({turn} to move)")]
    NotYourTurn { color: Color, turn: Color },

    #[error("cannot move into occupied location {location}")]
    DestinationOccupied { location: Location },

    #[error("step {from} -> {to} is not diagonal")]
    NotDiagonal { from: Location, to: Location },

    #[error("step at {at} does not move")]
    NoMovement { at: Location },

    #[error("simple step {from} -> {to} cannot be chained")]
    ChainedSimpleMove { from: Location, to: Location },

    #[error("only kings may move backwards ({from} -> {to})")]
    ManMovedBackward { from: Location, to: Location },

    #[error("cannot move {from} -> {to} without jumping an opponent")]
    NothingToJump { from: Location, to: Location },

    #[error("cannot jump your own piece at {location}")]
    CannotJumpOwnPiece { location: Location },

    #[error("piece at {location} was already jumped in this sequence")]
    RepeatedJump { location: Location },

    #[error("step {from} -> {to} is too far")]
    StepTooLong { from: Location, to: Location },

    #[error("a capture is available and must be taken")]
    CaptureRequired,
}

/// Errors raised when editing a board directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("location {location} is off the board")]
    OutOfBounds { location: Location },

    #[error("pieces may only stand on dark tiles, {location} is light")]
    LightTile { location: Location },
}

/// Errors raised while parsing text diagrams and typed-in moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid number of rows: expected at most {max}, found {found}")]
    TooManyRows { max: usize, found: usize },

    #[error("row {row} is too long: expected at most {max} characters, found {found}")]
    RowTooLong { row: usize, max: usize, found: usize },

    #[error("unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },

    #[error("invalid location '{0}', expected 'row,col'")]
    BadLocation(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised while decoding the JSON wire format.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board must have {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("board row {row} must have {expected} cells, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell at grid position ({row},{col}) claims to be {claimed}")]
    CoordinateMismatch {
        row: usize,
        col: usize,
        claimed: Location,
    },

    #[error("cell ({row},{col}) has the wrong tile color")]
    TileMismatch { row: usize, col: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Internal failures of the computer player's search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The move generator produced a sequence that the rule engine rejects.
    /// This is a programming error, never a user-facing rejection.
    #[error("generated sequence {sequence} was rejected: {source}")]
    GeneratorDisagreement {
        sequence: MoveSequence,
        source: MoveError,
    },
}

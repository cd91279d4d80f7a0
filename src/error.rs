use std::num::ParseIntError;

use thiserror::Error;

/// Failures at the input boundary. The search itself never produces one of
/// these: an unsolvable instance is a [`SearchOutcome`](crate::SearchOutcome),
/// not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("puzzle file has no `{0}` section")]
    MissingSection(&'static str),

    #[error("expected 3 rows for {section}, found {found}")]
    RowCount { section: &'static str, found: usize },

    #[error("expected 9 tiles, found {0}")]
    TileCount(usize),

    #[error("expected 3 tiles in row `{0}`")]
    RowWidth(String),

    #[error("cannot parse tile `{tile}`: {source}")]
    BadTile {
        tile: String,
        #[source]
        source: ParseIntError,
    },

    #[error("tile {0} is out of range, tiles must be 0 to 8")]
    TileOutOfRange(u32),

    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),

    #[error("board has no blank tile")]
    MissingBlank,

    #[error("city `{0}` has no heuristic estimate")]
    MissingHeuristic(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

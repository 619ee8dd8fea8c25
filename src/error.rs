//! Error types for the maze learner

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("state ({row}, {col}) is outside the {rows}x{cols} grid")]
    InvalidState {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state {state} was read before being added to the value table")]
    UnknownState { state: String },

    #[error("invalid character '{character}' at ({row}, {col}) in maze definition")]
    InvalidCell {
        character: char,
        row: usize,
        col: usize,
    },

    #[error("maze definition has no cells")]
    EmptyGrid,

    #[error("maze row {row} has {got} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("failed to render maze: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

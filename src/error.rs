//! Engine errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid piece type: {0:?} (expected one of O, I, S, Z, L, J, T)")]
    InvalidPieceType(char),
    #[error("invalid board size {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

//! Error types for meshtune

use thiserror::Error;

/// Main error type for meshtune operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },

    #[error("index type is too narrow for {unique} unique vertices")]
    IndexOverflow { unique: usize },
}

/// Result type alias for meshtune operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the Breadboard circuit simulator.
//!
//! Only the outer surfaces can fail: reading and parsing a layout file.
//! The solver pipeline itself never errors; degenerate circuits degrade to
//! zero-valued results instead (see [`crate::solver`]).

use thiserror::Error;

/// Result type alias using [`BreadboardError`].
pub type Result<T> = std::result::Result<T, BreadboardError>;

/// Unified error type for all Breadboard operations.
#[derive(Error, Debug)]
pub enum BreadboardError {
    /// Error reading a layout file
    #[error("Failed to read layout file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed layout line
    #[error("Layout error at line {line}: {message}")]
    Layout { line: usize, message: String },

    /// Unknown element kind in a layout file
    #[error("Unknown element kind '{kind}' at line {line}")]
    UnknownElementKind { kind: String, line: usize },

    /// A value in a layout line did not parse
    #[error("Invalid value '{value}' for '{key}' at line {line}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },
}

impl BreadboardError {
    /// Create a layout error.
    pub fn layout(line: usize, message: impl Into<String>) -> Self {
        Self::Layout {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-value error.
    pub fn invalid_value(line: usize, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            line,
        }
    }
}

//! Error types for swathgrid

use thiserror::Error;

/// Main error type for swathgrid operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parameter: {name} = {value} ({reason})")]
    BadParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Memory allocation failed for {what} ({cells} cells)")]
    MemoryFailure { what: &'static str, cells: usize },

    #[error("Numeric anomaly: {context}")]
    NumericAnomaly { context: String },

    #[error("Invalid sounding handle: file {file}, ping {ping}, beam {beam}")]
    InvalidSounding { file: usize, ping: usize, beam: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("No grid has been built")]
    NoGrid,

    #[error("No soundings are selected")]
    NoSelection,
}

impl Error {
    /// Shorthand for a [`Error::BadParameter`] built from any displayable value.
    pub fn bad_parameter(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::BadParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for swathgrid operations
pub type Result<T> = std::result::Result<T, Error>;

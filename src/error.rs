//! Unified error handling for route stitching.
//!
//! Segment sources are I/O-bound (binary map tiles); any read failure is
//! fatal to the whole multi-key selection call, so errors propagate rather
//! than producing partial results.

use thiserror::Error;

use crate::Point31;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Errors produced while selecting and stitching routes.
#[derive(Debug, Error)]
pub enum StitchError {
    /// Reading the underlying map data failed.
    #[error("map data read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A segment source failed for a reason other than plain I/O.
    #[error("segment source failed at ({x}, {y}): {message}")]
    Source { x: u32, y: u32, message: String },

    /// The requested operation is declared but not implemented.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

impl StitchError {
    /// Build a [`StitchError::Source`] for a failed lookup at `point`.
    pub fn source_failure(point: Point31, message: impl Into<String>) -> Self {
        StitchError::Source {
            x: point.x,
            y: point.y,
            message: message.into(),
        }
    }
}

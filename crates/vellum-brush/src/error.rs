//! Error type for the stroke interpolator and dab rasteriser.

use thiserror::Error as ThisError;
use vellum_core::Error as CoreError;
use vellum_tiles::TileError;

/// Result type alias using [`BrushError`] as the error type.
pub type Result<T> = std::result::Result<T, BrushError>;

/// Errors raised by [`crate::stroke::Brush`] and the dab rasteriser.
#[derive(Debug, ThisError)]
pub enum BrushError {
    /// Propagated unchanged from a Pixbuf operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Propagated unchanged from the tile manager.
    #[error(transparent)]
    Tile(#[from] TileError),

    /// A brush parameter is out of its valid range.
    #[error("invalid brush parameter: {0}")]
    InvalidParameter(String),
}

impl BrushError {
    /// Creates a [`BrushError::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}

//! Error type for the tile manager and display sampler.

use thiserror::Error as ThisError;
use vellum_core::Error as CoreError;

/// Result type alias using [`TileError`] as the error type.
pub type Result<T> = std::result::Result<T, TileError>;

/// Errors raised by [`crate::tile::TileManager`] and the affine display path.
#[derive(Debug, ThisError)]
pub enum TileError {
    /// Propagated unchanged from a Pixbuf operation (bounds, dimensions,
    /// format mismatch).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A `foreach` visitor returned an error.
    #[error("tile callback failed: {0}")]
    CallbackFailed(String),
}

impl TileError {
    /// Creates a [`TileError::CallbackFailed`] error.
    #[inline]
    pub fn callback_failed(reason: impl Into<String>) -> Self {
        Self::CallbackFailed(reason.into())
    }
}

impl From<TileError> for CoreError {
    fn from(err: TileError) -> Self {
        match err {
            TileError::Core(core) => core,
            TileError::CallbackFailed(reason) => CoreError::host_callback_failed(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_converts_transparently() {
        let core = CoreError::out_of_bounds(1, 1, 4, 4);
        let wrapped: TileError = core.into();
        assert!(wrapped.to_string().contains("out of bounds"));
    }

    #[test]
    fn callback_failed_converts_back_to_core() {
        let err = TileError::callback_failed("visitor panicked");
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::HostCallbackFailed(_)));
    }
}

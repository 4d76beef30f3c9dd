//! Error types shared across the Vellum painting core.
//!
//! The [`Error`] enum is the canonical mapping of the four error kinds a
//! painting core can raise: malformed caller input, resource exhaustion,
//! a host callback reporting failure, and an internal invariant violation.
//! Downstream crates ([`vellum-tiles`], [`vellum-brush`]) define their own
//! small `thiserror` enums for concerns specific to them and convert into
//! this one at the boundary, rather than growing this enum without bound.
//!
//! # Usage
//!
//! ```rust
//! use vellum_core::{Error, Result};
//!
//! fn check_bounds(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error as ThisError;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pixel-format engine, Pixbuf, tile manager and brush.
///
/// # Categories
///
/// - **`BadArgument`**: out-of-range coordinates, unknown pixel format,
///   mismatched buffer sizes, invalid color tuple length.
/// - **`ResourceExhausted`**: allocation failure creating a Pixbuf or
///   extending an output sink's buffer.
/// - **`HostCallbackFailed`**: a failure signalled by a host-supplied
///   callback (`get_pixbuf`, a `foreach` visitor), propagated unchanged.
/// - **`InvariantViolated`**: internal only; indicates a bug such as a
///   tile map returning a Pixbuf whose origin disagrees with its key.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Pixel coordinates are outside a Pixbuf's bounds.
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} buffer")]
    OutOfBounds {
        /// X coordinate that was out of bounds.
        x: i64,
        /// Y coordinate that was out of bounds.
        y: i64,
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },

    /// A rectangle argument extends beyond the bounds it must fit within.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin.
        rx: i64,
        /// Region Y origin.
        ry: i64,
        /// Region width.
        rw: u32,
        /// Region height.
        rh: u32,
        /// Bounds width.
        width: u32,
        /// Bounds height.
        height: u32,
    },

    /// A color tuple did not have the channel count the format expects.
    #[error("color tuple has {got} channels, format {format} expects {expected}")]
    ChannelMismatch {
        /// Format name.
        format: &'static str,
        /// Expected channel count.
        expected: usize,
        /// Actual channel count.
        got: usize,
    },

    /// Width or height is zero, or would overflow a buffer size calculation.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Reason the dimensions are invalid.
        reason: String,
    },

    /// Two buffers that must match in format or size do not.
    #[error("format/size mismatch: {reason}")]
    FormatMismatch {
        /// Description of the mismatch.
        reason: String,
    },

    /// Requested pixel format id is not one of the closed set.
    #[error("unknown pixel format id: {0}")]
    UnknownFormat(u8),

    /// Allocation failed constructing a Pixbuf or growing a sink buffer.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested.
        requested: usize,
        /// Failure reason.
        reason: String,
    },

    /// A host-supplied callback (`get_pixbuf`, a `foreach` visitor) failed.
    #[error("host callback failed: {0}")]
    HostCallbackFailed(String),

    /// An internal invariant was violated; this indicates a bug.
    #[error("internal invariant violated: {0}")]
    InvariantViolated(String),

    /// I/O error from an external sink (e.g. the demo PNG writer).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::OutOfBounds { x, y, width, height }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: i64, ry: i64, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion { rx, ry, rw, rh, width, height }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions { width, height, reason: reason.into() }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(format: &'static str, expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { format, expected, got }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed { requested, reason: reason.into() }
    }

    /// Creates an [`Error::HostCallbackFailed`] error.
    #[inline]
    pub fn host_callback_failed(reason: impl Into<String>) -> Self {
        Self::HostCallbackFailed(reason.into())
    }

    /// Creates an [`Error::InvariantViolated`] error.
    #[inline]
    pub fn invariant_violated(reason: impl Into<String>) -> Self {
        Self::InvariantViolated(reason.into())
    }

    /// Returns `true` if this is a bounds-related `BadArgument`.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }

    /// Returns `true` if this is a `ResourceExhausted` error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_has_coordinates() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn allocation_failed_carries_reason() {
        let err = Error::allocation_failed(1 << 20, "tile pool exhausted");
        assert!(err.to_string().contains("tile pool exhausted"));
        assert!(err.is_allocation_error());
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing sink");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

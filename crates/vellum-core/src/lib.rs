//! # vellum-core
//!
//! Pixel-format registry and Pixbuf: the two lowest-level components of the
//! Vellum painting core.
//!
//! - [`format`] enumerates the closed set of bit-exact pixel formats and
//!   provides the per-format writer/reader/blit/compose routines.
//! - [`pixbuf`] is the owning container for one rectangular block of pixels
//!   in a single format — the tile manager's unit of storage.
//! - [`rect`] supplies the plain geometry ([`Rect`]) shared by every crate
//!   downstream of this one.
//! - [`error`] is the crate's `thiserror`-derived error enum, the canonical
//!   mapping of the four error kinds (`BadArgument`, `ResourceExhausted`,
//!   `HostCallbackFailed`, `InvariantViolated`) shared by the rest of the
//!   workspace.
//!
//! ## Crate structure
//!
//! This crate has no internal dependencies; every other crate in the
//! workspace depends on it.
//!
//! ```text
//! vellum-core (this crate)
//!    ^
//!    |
//!    +-- vellum-math (noise, trig tables, HSV, rand streams)
//!    +-- vellum-tiles (tile manager, affine display blit)
//!    +-- vellum-brush (stroke interpolator, dab rasteriser)
//! ```
//!
//! # Example
//!
//! ```rust
//! use vellum_core::{Pixbuf, PixelFormat};
//!
//! let mut buf = Pixbuf::new(PixelFormat::ArgbPremul15x, 8, 8).unwrap();
//! buf.set_pixel(2, 2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
//! assert_eq!(buf.get_pixel(2, 2).unwrap()[3], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod pixbuf;
pub mod rect;

pub use error::{Error, Result};
pub use format::{FormatOps, PixelFormat, ROUND_ERROR_15BITS, ROUND_ERROR_8BITS};
pub use pixbuf::Pixbuf;
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use vellum_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{FormatOps, PixelFormat};
    pub use crate::pixbuf::Pixbuf;
    pub use crate::rect::Rect;
}

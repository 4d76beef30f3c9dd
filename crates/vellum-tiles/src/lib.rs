//! # vellum-tiles
//!
//! The unbounded canvas: a sparse tile manager over [`vellum_core::Pixbuf`],
//! plus the affine blit/blend path a display surface uses to sample it.
//!
//! - [`tile`] — [`tile::TileManager`], a `HashMap<(i32, i32), Tile>` with
//!   create-on-read, bbox, rectangle iteration and copy-on-write snapshotting.
//! - [`display`] — [`display::blit_affine`], sampling an arbitrary
//!   zoom/rotate/translate view of the canvas into a fixed destination
//!   buffer, nearest or bilinear, with a single-slot last-tile read cache.
//! - [`error`] — this crate's small `thiserror` enum, layered over
//!   [`vellum_core::Error`].
//!
//! # Example
//!
//! ```rust
//! use vellum_core::PixelFormat;
//! use vellum_tiles::TileManager;
//!
//! let mut mgr = TileManager::new(PixelFormat::Rgb8, 64);
//! let tile = mgr.get_tile(70, -10, true).unwrap().unwrap();
//! assert_eq!(tile.pixbuf().rect().x, 64);
//! assert_eq!(tile.pixbuf().rect().y, -64);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod display;
pub mod error;
pub mod tile;

pub use display::{blit_affine, AffineTransform, Filter};
pub use error::{Result, TileError};
pub use tile::{Tile, TileManager, TILE_DEFAULT_SIZE};

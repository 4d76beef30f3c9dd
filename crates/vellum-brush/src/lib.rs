//! # vellum-brush
//!
//! The brush engine: stroke interpolation and dab rasterisation built on
//! top of [`vellum_tiles::TileManager`].
//!
//! - [`params`] - [`params::BrushParams`], the tunable parameter set, and
//!   [`params::StrokeEvent`], the host-supplied per-sample input
//! - [`stroke`] - [`stroke::Brush`], the stroke state machine: point
//!   smoothing, Catmull-Rom segment subdivision and the per-dab pipeline
//! - [`dab`] - [`dab::drawdab_solid`] and [`dab::get_dab_color`], the
//!   elliptical falloff-shaded dab rasteriser and its read-only sampler
//! - [`cache`] - [`cache::PixbufCache`], the brush's own small MRU tile
//!   read cache
//! - [`error`] - this crate's `thiserror` enum, layered over
//!   [`vellum_core::Error`] and [`vellum_tiles::TileError`]
//!
//! # Example
//!
//! ```rust
//! use vellum_core::PixelFormat;
//! use vellum_tiles::TileManager;
//! use vellum_brush::{Brush, BrushParams, StrokeEvent};
//!
//! let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
//! let mut brush = Brush::new(BrushParams::default(), 1);
//! brush.set_color([0.2, 0.4, 0.9]);
//!
//! brush.stroke_start(&mgr, StrokeEvent::new((10, 10), (10.0, 10.0), 0.6, 0.0)).unwrap();
//! brush.draw_stroke(&mut mgr, StrokeEvent::new((20, 10), (20.0, 10.0), 0.6, 0.1)).unwrap();
//! brush.stroke_end(&mut mgr).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod dab;
pub mod error;
pub mod params;
pub mod stroke;

pub use cache::PixbufCache;
pub use dab::{drawdab_solid, get_dab_color};
pub use error::{BrushError, Result};
pub use params::{BrushParams, StrokeEvent};
pub use stroke::Brush;

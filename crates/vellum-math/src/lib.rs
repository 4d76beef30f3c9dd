//! # vellum-math
//!
//! Math support for the Vellum brush engine: no canvas or pixel-format
//! knowledge lives here, only the pure numeric building blocks the stroke
//! interpolator and dab rasteriser are built from.
//!
//! - [`noise`] - 2D simplex noise, for radius/position/direction jitter
//! - [`trig`] - lookup-table cosine/sine for per-dab angle math
//! - [`hsv`] - RGB <-> HSV conversion, for the brush's color-shift jitter
//! - [`rand`] - [`rand::BrushRng`], a brush-owned pair of random streams
//! - [`catmull`] - Catmull-Rom / Hermite basis functions for segment subdivision
//! - [`interp`] - linear interpolation ([`lerp`])
//!
//! # Usage
//!
//! ```rust
//! use vellum_math::{catmull, lerp};
//!
//! let mid = catmull::catmull_rom(0.0, 1.0, 2.0, 3.0, 0.5);
//! let eased = lerp(0.0, 1.0, 0.5);
//! assert!((mid - 1.5).abs() < 1e-5);
//! assert_eq!(eased, 0.5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catmull;
pub mod hsv;
pub mod interp;
pub mod noise;
pub mod rand;
pub mod trig;

pub use catmull::{h00, h01, h10, h11, hermite, catmull_rom};
pub use hsv::{hsv_to_rgb, rgb_to_hsv};
pub use interp::lerp;
pub use noise::noise_2d;
pub use rand::BrushRng;
pub use trig::{fast_cos, fast_sin};

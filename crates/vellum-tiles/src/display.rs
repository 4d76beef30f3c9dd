//! Affine blit/blend sampling: the path a display surface uses to pull an
//! arbitrary zoom/rotate/translate view of the unbounded canvas into a
//! fixed-size destination [`Pixbuf`].
//!
//! Reads go through a single-slot last-tile cache keyed by tile coordinate,
//! cleared at the end of every call — consecutive destination pixels almost
//! always land in the same source tile, so this turns a hash lookup per
//! pixel into one per tile crossing.

use vellum_core::{Pixbuf, Result};

use crate::tile::TileManager;

/// A 2x3 affine transform mapping destination pixel coordinates to canvas
/// coordinates: `canvas_x = ix*a + iy*b + c`, `canvas_y = ix*d + iy*e + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// X scale / rotation term applied to the destination X coordinate.
    pub a: f32,
    /// X scale / rotation term applied to the destination Y coordinate.
    pub b: f32,
    /// X translation.
    pub c: f32,
    /// Y scale / rotation term applied to the destination X coordinate.
    pub d: f32,
    /// Y scale / rotation term applied to the destination Y coordinate.
    pub e: f32,
    /// Y translation.
    pub f: f32,
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 0.0, e: 1.0, f: 0.0 };

    /// A pure translation by `(tx, ty)`.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self { c: tx, f: ty, ..Self::IDENTITY }
    }

    /// A uniform scale about the origin, composed with a translation.
    pub fn scale_translate(scale: f32, tx: f32, ty: f32) -> Self {
        Self { a: scale, e: scale, c: tx, f: ty, ..Self::IDENTITY }
    }

    /// Maps a destination coordinate into canvas space.
    #[inline]
    pub fn apply(&self, ix: f32, iy: f32) -> (f32, f32) {
        (ix * self.a + iy * self.b + self.c, ix * self.d + iy * self.e + self.f)
    }
}

/// Pixel sampling strategy for [`blit_affine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Single tile read at the floored source coordinate.
    Nearest,
    /// Four-tap weighted blend of the surrounding integer pixels.
    Bilinear,
}

#[derive(Default)]
struct TileCache {
    key: Option<(i32, i32)>,
    pixbuf: Option<Pixbuf>,
}

impl TileCache {
    fn sample(&mut self, mgr: &TileManager, x: i64, y: i64) -> Option<[f32; 5]> {
        let tile_size = mgr.tile_size() as i64;
        let tx = x.div_euclid(tile_size) as i32;
        let ty = y.div_euclid(tile_size) as i32;
        if self.key != Some((tx, ty)) {
            self.pixbuf = mgr.get_pixbuf(tx as i64 * tile_size, ty as i64 * tile_size);
            self.key = Some((tx, ty));
        }
        let pixbuf = self.pixbuf.as_ref()?;
        let local_x = (x - tx as i64 * tile_size) as u32;
        let local_y = (y - ty as i64 * tile_size) as u32;
        pixbuf.get_pixel(local_x, local_y).ok()
    }
}

fn sample_nearest(mgr: &TileManager, cache: &mut TileCache, cx: f32, cy: f32) -> [f32; 5] {
    cache.sample(mgr, cx.floor() as i64, cy.floor() as i64).unwrap_or([0.0; 5])
}

fn sample_bilinear(mgr: &TileManager, cache: &mut TileCache, cx: f32, cy: f32) -> [f32; 5] {
    let x0 = cx.floor();
    let y0 = cy.floor();
    let fx = cx - x0;
    let fy = cy - y0;
    let x0i = x0 as i64;
    let y0i = y0 as i64;

    let p00 = cache.sample(mgr, x0i, y0i).unwrap_or([0.0; 5]);
    let p10 = cache.sample(mgr, x0i + 1, y0i).unwrap_or([0.0; 5]);
    let p01 = cache.sample(mgr, x0i, y0i + 1).unwrap_or([0.0; 5]);
    let p11 = cache.sample(mgr, x0i + 1, y0i + 1).unwrap_or([0.0; 5]);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mut out = [0.0f32; 5];
    for i in 0..5 {
        out[i] = p00[i] * w00 + p10[i] * w10 + p01[i] * w01 + p11[i] * w11;
    }
    out
}

/// Samples `mgr` through `transform` into every pixel of `dst`, either
/// overwriting (`blend = false`) or `src-over` compositing (`blend = true`)
/// onto whatever `dst` already held.
///
/// The sampled channels are assumed to share `dst`'s color-channel layout
/// (the natural R/G/B or C/M/Y/K order `FormatOps::color_indices` reports);
/// this holds for every pair of formats in the closed set, since that order
/// is independent of where each format physically stores alpha.
pub fn blit_affine(mgr: &TileManager, dst: &mut Pixbuf, transform: &AffineTransform, filter: Filter, blend: bool) -> Result<()> {
    let mut cache = TileCache::default();
    let ops = dst.format().ops();

    for iy in 0..dst.height() {
        for ix in 0..dst.width() {
            let (cx, cy) = transform.apply(ix as f32, iy as f32);
            let sample = match filter {
                Filter::Nearest => sample_nearest(mgr, &mut cache, cx, cy),
                Filter::Bilinear => sample_bilinear(mgr, &mut cache, cx, cy),
            };

            let mut color = [0.0f32; 4];
            for (slot, &channel_index) in ops.color_indices.iter().enumerate() {
                color[slot] = sample[channel_index];
            }
            let alpha = ops.alpha_index.map(|ai| sample[ai]).unwrap_or(1.0);

            if blend {
                dst.writepixel(ix, iy, alpha, 1.0, &color[..ops.color_indices.len()])?;
            } else {
                let mut full = [0.0f32; 5];
                for (slot, &channel_index) in ops.color_indices.iter().enumerate() {
                    full[channel_index] = color[slot];
                }
                if let Some(ai) = ops.alpha_index {
                    full[ai] = alpha;
                }
                dst.set_pixel(ix, iy, &full[..ops.nc])?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::PixelFormat;

    #[test]
    fn identity_nearest_copies_tile_into_destination() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 8);
        mgr.get_tile_mut(0, 0, true).unwrap().unwrap().pixbuf_mut().set_pixel(2, 3, &[1.0, 0.0, 0.0, 1.0]).unwrap();

        let mut dst = Pixbuf::new(PixelFormat::RgbaPremul8, 8, 8).unwrap();
        blit_affine(&mgr, &mut dst, &AffineTransform::IDENTITY, Filter::Nearest, false).unwrap();

        let got = dst.get_pixel(2, 3).unwrap();
        assert!((got[0] - 1.0).abs() < 0.02);
        assert!((got[3] - 1.0).abs() < 0.02);
    }

    #[test]
    fn untouched_region_samples_as_transparent() {
        let mgr = TileManager::new(PixelFormat::RgbaPremul8, 8);
        let mut dst = Pixbuf::new(PixelFormat::RgbaPremul8, 4, 4).unwrap();
        blit_affine(&mgr, &mut dst, &AffineTransform::IDENTITY, Filter::Nearest, false).unwrap();
        assert!(dst.is_empty());
    }

    #[test]
    fn bilinear_blends_between_two_tile_pixels() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 8);
        {
            let tile = mgr.get_tile_mut(0, 0, true).unwrap().unwrap().pixbuf_mut();
            tile.set_pixel(2, 0, &[1.0, 0.0, 0.0, 1.0]).unwrap();
            tile.set_pixel(3, 0, &[0.0, 0.0, 0.0, 1.0]).unwrap();
        }
        let mut dst = Pixbuf::new(PixelFormat::RgbaPremul8, 1, 1).unwrap();
        let halfway = AffineTransform::translation(2.5, 0.0);
        blit_affine(&mgr, &mut dst, &halfway, Filter::Bilinear, false).unwrap();
        let got = dst.get_pixel(0, 0).unwrap();
        assert!((got[0] - 0.5).abs() < 0.05);
    }

    #[test]
    fn blend_composites_over_existing_destination() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 8);
        mgr.get_tile_mut(0, 0, true).unwrap().unwrap().pixbuf_mut().set_pixel(0, 0, &[1.0, 0.0, 0.0, 0.5]).unwrap();

        let mut dst = Pixbuf::new(PixelFormat::RgbaPremul8, 1, 1).unwrap();
        dst.set_pixel(0, 0, &[0.0, 0.0, 1.0, 1.0]).unwrap();
        blit_affine(&mgr, &mut dst, &AffineTransform::IDENTITY, Filter::Nearest, true).unwrap();

        let got = dst.get_pixel(0, 0).unwrap();
        assert!((got[3] - 1.0).abs() < 0.02);
    }
}

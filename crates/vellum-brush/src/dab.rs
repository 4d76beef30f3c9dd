//! Dab rasterisation: `drawdab_solid` paints one elliptical, falloff-shaded
//! dab into the tile manager; `get_dab_color` samples the same geometry
//! read-only, for the smudge accumulator and color picker.

use vellum_core::{Rect, Result as CoreResult};
use vellum_tiles::TileManager;

use crate::cache::PixbufCache;
use crate::error::{BrushError, Result};

/// Falloff weight at squared ellipse radius `rr` for a dab of `hardness`.
///
/// `hardness == 1.0` is the hard-edge degenerate case: every inside-ellipse
/// pixel gets full weight, skipping the division that would blow up as
/// `hardness` approaches `1.0` from below.
#[inline]
fn falloff(rr: f32, hardness: f32) -> f32 {
    if hardness >= 1.0 {
        1.0
    } else if rr < hardness {
        rr + 1.0 - rr / hardness
    } else {
        hardness / (1.0 - hardness) * (1.0 - rr)
    }
}

/// Paints one dab: an ellipse centred at `(sx, sy)` with radius `radius`,
/// Y-elongation `yratio`, rotated so its axes align with `(cs, sn)`.
///
/// `alpha` is the writer's erase argument (the dab's own, post-erase-jitter
/// alpha); `opacity` is the pressure/compensation-scaled paint strength.
/// `color` holds the non-alpha channels in natural (R, G, B) order.
///
/// Skips the dab only when every one of `radius`, `hardness`, `yratio`,
/// `alpha` is simultaneously out of range — a single still-valid parameter
/// is enough to proceed.
///
/// Returns the damaged rectangle in canvas coordinates, or `None` if no
/// pixel was written.
#[allow(clippy::too_many_arguments)]
pub fn drawdab_solid(
    mgr: &mut TileManager,
    cache: &mut PixbufCache,
    sx: f32,
    sy: f32,
    radius: f32,
    yratio: f32,
    hardness: f32,
    alpha: f32,
    opacity: f32,
    cs: f32,
    sn: f32,
    grain: f32,
    color: [f32; 3],
    alpha_lock: bool,
) -> Result<Option<Rect>> {
    let all_invalid = radius <= 0.0 && (hardness <= 0.0 || hardness > 1.0) && yratio <= 0.0 && alpha <= 0.0;
    if all_invalid {
        return Ok(None);
    }

    let min_x = (sx - radius - 0.5).floor() as i64;
    let max_x = (sx + radius + 0.5).ceil() as i64;
    let min_y = (sy - radius - 0.5).floor() as i64;
    let max_y = (sy + radius + 0.5).ceil() as i64;

    let rxdx = cs / radius;
    let rydx = -sn * yratio / radius;
    let rxdy = sn / radius;
    let rydy = cs * yratio / radius;

    let tile_size = mgr.tile_size() as i64;
    let mut damaged: Option<Rect> = None;
    let mut touched = Vec::new();

    for y in min_y..max_y {
        for x in min_x..max_x {
            let xx0 = x as f32 - sx + 0.5;
            let yy0 = y as f32 - sy + 0.5;
            let rx = xx0 * rxdx + yy0 * rxdy;
            let ry = xx0 * rydx + yy0 * rydy;
            let rr = rx * rx + ry * ry;
            if !(rr <= 1.0) {
                continue;
            }

            let mut opa = opacity * falloff(rr, hardness);
            if grain > 0.0 {
                let noise = (vellum_math::noise_2d(sx + rx * grain, sy + ry * grain) + 1.0) * 0.5;
                opa = (opa * noise).min(1.0);
            }
            if opa <= 0.0 {
                continue;
            }

            let key = (x.div_euclid(tile_size) as i32, y.div_euclid(tile_size) as i32);
            let tile = mgr
                .get_tile_mut(x, y, true)?
                .expect("get_tile_mut with create=true always returns a tile");
            let origin = tile.pixbuf().rect();
            let lx = (x - origin.x) as u32;
            let ly = (y - origin.y) as u32;
            let ops = tile.pixbuf().format().ops();
            if ops.color_indices.len() != 3 {
                return Err(BrushError::invalid_parameter("drawdab_solid requires an RGB-family tile format"));
            }

            let write: CoreResult<()> = if alpha_lock {
                tile.pixbuf_mut().writepixel_alpha_locked(lx, ly, opa, alpha, &color)
            } else {
                tile.pixbuf_mut().writepixel(lx, ly, opa, alpha, &color)
            };
            write?;
            tile.mark_damaged();
            touched.push(key);

            let px = Rect::new(x, y, 1, 1);
            damaged = Some(damaged.map_or(px, |d| d.union(&px)));
        }
    }

    for key in touched {
        cache.invalidate_key(key);
    }

    Ok(damaged)
}

/// Samples the canvas average under the same dab geometry as
/// [`drawdab_solid`], for the smudge accumulator and color picker.
///
/// Returns `None` ("no pickup") when the sampled area is effectively
/// fully transparent (`alpha < 1/32768`), rather than the source's
/// bug-tracking sentinel color.
#[allow(clippy::too_many_arguments)]
pub fn get_dab_color(
    mgr: &TileManager,
    cache: &mut PixbufCache,
    sx: f32,
    sy: f32,
    radius: f32,
    yratio: f32,
    hardness: f32,
    cs: f32,
    sn: f32,
) -> Option<[f32; 4]> {
    if radius <= 0.0 {
        return None;
    }

    let min_x = (sx - radius - 0.5).floor() as i64;
    let max_x = (sx + radius + 0.5).ceil() as i64;
    let min_y = (sy - radius - 0.5).floor() as i64;
    let max_y = (sy + radius + 0.5).ceil() as i64;

    let rxdx = cs / radius;
    let rydx = -sn * yratio / radius;
    let rxdy = sn / radius;
    let rydy = cs * yratio / radius;

    let mut weight_sum = 0.0f64;
    let mut sums = [0.0f64; 4];

    for y in min_y..max_y {
        for x in min_x..max_x {
            let xx0 = x as f32 - sx + 0.5;
            let yy0 = y as f32 - sy + 0.5;
            let rx = xx0 * rxdx + yy0 * rxdy;
            let ry = xx0 * rydx + yy0 * rydy;
            let rr = rx * rx + ry * ry;
            if !(rr <= 1.0) {
                continue;
            }

            let opa = falloff(rr, hardness);
            if opa <= 0.0 {
                continue;
            }

            let Some(pixbuf) = cache.get(mgr, x, y) else { continue };
            let origin = pixbuf.rect();
            let lx = (x - origin.x) as u32;
            let ly = (y - origin.y) as u32;
            let Ok(pixel) = pixbuf.get_pixel(lx, ly) else { continue };
            let ops = pixbuf.format().ops();
            let pixel_alpha = ops.alpha_index.map(|ai| pixel[ai]).unwrap_or(1.0);

            weight_sum += opa as f64;
            sums[3] += (opa * pixel_alpha) as f64;
            for (slot, &ci) in ops.color_indices.iter().enumerate().take(3) {
                sums[slot] += (opa * pixel[ci]) as f64;
            }
        }
    }

    if weight_sum <= 0.0 {
        return None;
    }
    let alpha = (sums[3] / weight_sum) as f32;
    if alpha < 1.0 / 32768.0 {
        return None;
    }
    let alpha_sum = sums[3] as f32;
    let mut out = [0.0f32; 4];
    for i in 0..3 {
        out[i] = (sums[i] as f32 / alpha_sum).clamp(0.0, 1.0);
    }
    out[3] = alpha;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::PixelFormat;

    #[test]
    fn falloff_boundaries() {
        assert!((falloff(0.0, 0.5) - 1.0).abs() < 1e-6);
        assert!((falloff(0.5, 0.5) - 1.0).abs() < 1e-6);
        assert!(falloff(1.0, 0.5).abs() < 1e-6);
    }

    #[test]
    fn hard_edge_skips_falloff_branch() {
        assert_eq!(falloff(0.0, 1.0), 1.0);
        assert_eq!(falloff(0.99, 1.0), 1.0);
    }

    #[test]
    fn drawdab_solid_writes_a_damaged_rect() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = PixbufCache::new();
        let damaged = drawdab_solid(
            &mut mgr, &mut cache, 32.0, 32.0, 4.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, [1.0, 1.0, 0.0], false,
        )
        .unwrap();
        assert!(damaged.is_some());
        let tile = mgr.get_tile(32, 32, false).unwrap().unwrap();
        assert!(tile.is_damaged());
        let px = tile.pixbuf().get_pixel(32, 32).unwrap();
        assert!(px[3] > 0.9);
    }

    #[test]
    fn repainting_same_dab_is_idempotent() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = PixbufCache::new();
        let draw = |mgr: &mut TileManager, cache: &mut PixbufCache| {
            drawdab_solid(mgr, cache, 32.0, 32.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, [1.0, 1.0, 0.0], false).unwrap()
        };
        draw(&mut mgr, &mut cache);
        let before = mgr.get_tile(32, 32, false).unwrap().unwrap().pixbuf().get_pixel(32, 32).unwrap();
        draw(&mut mgr, &mut cache);
        let after = mgr.get_tile(32, 32, false).unwrap().unwrap().pixbuf().get_pixel(32, 32).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn joint_guard_only_skips_when_all_invalid() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = PixbufCache::new();
        // hardness out of range but radius/yratio/alpha fine: must still draw.
        let damaged = drawdab_solid(
            &mut mgr, &mut cache, 32.0, 32.0, 4.0, 1.0, 1.5, 1.0, 1.0, 1.0, 0.0, 0.0, [1.0, 0.0, 0.0], false,
        )
        .unwrap();
        assert!(damaged.is_some());
    }

    #[test]
    fn get_dab_color_returns_none_over_empty_canvas() {
        let mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = PixbufCache::new();
        let sampled = get_dab_color(&mgr, &mut cache, 32.0, 32.0, 4.0, 1.0, 1.0, 1.0, 0.0);
        assert!(sampled.is_none());
    }

    #[test]
    fn get_dab_color_picks_up_painted_color() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = PixbufCache::new();
        drawdab_solid(&mut mgr, &mut cache, 32.0, 32.0, 6.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, [1.0, 0.0, 0.0], false).unwrap();
        cache.invalidate_all();
        let sampled = get_dab_color(&mgr, &mut cache, 32.0, 32.0, 6.0, 1.0, 1.0, 1.0, 0.0).unwrap();
        assert!(sampled[0] > 0.9);
        assert!(sampled[3] > 0.9);
    }
}

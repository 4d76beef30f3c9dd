//! The stroke state machine: point smoothing, Catmull-Rom segment
//! subdivision and the per-dab pipeline that ties the math support and the
//! tile manager together.

use std::collections::VecDeque;

use vellum_core::Rect;
use vellum_math::trig::{fast_cos_turns, fast_sin_turns, PERIOD};
use vellum_math::{fast_cos, fast_sin, hermite, hsv_to_rgb, lerp, rgb_to_hsv, BrushRng};
use vellum_tiles::TileManager;

use crate::cache::PixbufCache;
use crate::dab;
use crate::error::Result;
use crate::params::{BrushParams, StrokeEvent};

/// A hard cap on dabs stamped within one segment, guarding against a
/// pathological `dist / radius` ratio turning one event into an unbounded
/// amount of work.
const MAX_DABS_PER_SEGMENT: u32 = 500;

#[derive(Debug, Clone, Copy)]
struct StrokePoint {
    ix: i32,
    iy: i32,
    sx: f32,
    sy: f32,
    sxo: f32,
    syo: f32,
    time: f32,
    pressure: f32,
    radius: f32,
    opacity: f32,
    xtilt: f32,
    ytilt: f32,
}

#[inline]
fn union_opt(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Exponential decay `exp(-t/tau)`, with underflow clamped to `0.0` instead
/// of producing a denormal or `inf` for a very small `tau`.
#[inline]
fn decay(t: f32, tau: f32) -> f32 {
    if tau <= 0.0 {
        return if t <= 0.0 { 1.0 } else { 0.0 };
    }
    let x = -t / tau;
    if x < -87.0 {
        0.0
    } else {
        x.exp()
    }
}

/// One stroke's worth of state: the four-slot position ring, the running
/// smudge accumulator, the drifting stroke color, and the brush's own
/// tile-pixbuf read cache.
///
/// A `Brush` is reused across strokes; [`Brush::stroke_start`] resets the
/// per-stroke state without needing to reconstruct it.
pub struct Brush {
    params: BrushParams,
    rng: BrushRng,
    cache: PixbufCache,
    base_color: [f32; 3],
    color: [f32; 3],
    smudge_acc: [f32; 4],
    points: VecDeque<StrokePoint>,
    needed_points: u32,
    remain_steps: f32,
    drawing: bool,
}

impl Brush {
    /// Creates a brush with the given parameters, random seed, and base
    /// (undrifted) stroke color.
    pub fn new(params: BrushParams, seed: u64) -> Self {
        Self {
            params,
            rng: BrushRng::new(seed),
            cache: PixbufCache::new(),
            base_color: [0.0, 0.0, 0.0],
            color: [0.0, 0.0, 0.0],
            smudge_acc: [0.0; 4],
            points: VecDeque::with_capacity(4),
            needed_points: 0,
            remain_steps: 0.0,
            drawing: false,
        }
    }

    /// This brush's parameter set.
    pub fn params(&self) -> &BrushParams {
        &self.params
    }

    /// Replaces this brush's parameter set.
    pub fn set_params(&mut self, params: BrushParams) {
        self.params = params;
    }

    /// Sets the base stroke color (RGB, `[0, 1]`), used at the start of the
    /// next stroke before any HSV drift accumulates.
    pub fn set_color(&mut self, rgb: [f32; 3]) {
        self.base_color = rgb;
    }

    /// The current (possibly drifted) stroke color.
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Begins a new stroke at `event`. Clears the pixbuf read cache, resets
    /// the position ring and smudge accumulator, and seeds the smudge
    /// accumulator from the canvas under the starting point.
    pub fn stroke_start(&mut self, mgr: &TileManager, event: StrokeEvent) -> Result<()> {
        self.cache.invalidate_all();
        self.remain_steps = 0.0;
        self.needed_points = 2;
        self.drawing = false;
        self.color = self.base_color;
        self.smudge_acc = [0.0; 4];

        let pressure = event.pressure.clamp(0.0, 1.0);
        let radius = self.params.radius_from_pressure(pressure);
        let opacity = self.params.opacity_from_pressure(pressure);
        let p0 = StrokePoint {
            ix: event.vpos.0,
            iy: event.vpos.1,
            sx: event.spos.0,
            sy: event.spos.1,
            sxo: event.spos.0,
            syo: event.spos.1,
            time: event.time,
            pressure,
            radius,
            opacity,
            xtilt: event.xtilt,
            ytilt: event.ytilt,
        };

        self.points.clear();
        self.points.push_back(p0);
        self.points.push_back(p0);

        let sanitized = self.params.sanitized();
        let angle = event.xtilt.atan2(event.ytilt) + sanitized.angle;
        let cs = fast_cos(angle);
        let sn = fast_sin(angle);
        if let Some(sample) = dab::get_dab_color(mgr, &mut self.cache, p0.sx, p0.sy, radius.max(0.01), sanitized.yratio, sanitized.hardness, cs, sn) {
            self.smudge_acc = sample;
        }
        Ok(())
    }

    /// Feeds one more sample into the current stroke. Returns the damaged
    /// rectangle of any dabs stamped, or `None` if the cursor hasn't moved,
    /// the brush is still priming, or the dab radius collapsed to zero.
    pub fn draw_stroke(&mut self, mgr: &mut TileManager, event: StrokeEvent) -> Result<Option<Rect>> {
        let last = *self.points.back().expect("stroke_start must be called before draw_stroke");
        let dist = (event.spos.0 - last.sx).hypot(event.spos.1 - last.sy);
        if dist == 0.0 {
            return Ok(None);
        }

        let pressure = event.pressure.clamp(0.0, 1.0);
        let radius = self.params.radius_from_pressure(pressure);
        if radius == 0.0 {
            return Ok(None);
        }
        let opacity = self.params.opacity_from_pressure(pressure);

        let sanitized = self.params.sanitized();
        let dtime = (event.time - last.time).max(1e-6);
        let speed = ((event.vpos.0 - last.ix) as f32).hypot((event.vpos.1 - last.iy) as f32) / dtime;
        let hi_fac = decay(1000.0 / speed.max(1e-6), sanitized.hi_speed_track);
        let mut sx = event.spos.0 * (1.0 - hi_fac) + last.sx * hi_fac;
        let mut sy = event.spos.1 * (1.0 - hi_fac) + last.sy * hi_fac;
        let lo_fac = decay(sanitized.motion_track, 1.0);
        sx = sx * lo_fac + last.sx * (1.0 - lo_fac);
        sy = sy * lo_fac + last.sy * (1.0 - lo_fac);

        let new_point = StrokePoint {
            ix: event.vpos.0,
            iy: event.vpos.1,
            sx,
            sy,
            sxo: event.spos.0,
            syo: event.spos.1,
            time: event.time,
            pressure,
            radius,
            opacity,
            xtilt: event.xtilt,
            ytilt: event.ytilt,
        };

        if self.points.len() >= 4 {
            self.points.pop_front();
        }
        self.points.push_back(new_point);

        if self.needed_points > 0 {
            self.needed_points -= 1;
            return Ok(None);
        }
        self.drawing = true;
        if self.points.len() < 4 {
            return Ok(None);
        }

        let pts = [self.points[0], self.points[1], self.points[2], self.points[3]];
        self.segment(mgr, pts, &sanitized)
    }

    /// Ends the current stroke, replaying two synthesised closing frames if
    /// any dab was ever drawn. Returns the combined damaged rectangle.
    pub fn stroke_end(&mut self, mgr: &mut TileManager) -> Result<Option<Rect>> {
        if !self.drawing || self.points.len() < 4 {
            self.drawing = false;
            return Ok(None);
        }
        let sanitized = self.params.sanitized();
        let mut damaged = None;

        let p2 = self.points[2];
        let last_raw = (self.points[3].sxo, self.points[3].syo);
        let mut synth = p2;
        synth.sx = last_raw.0;
        synth.sy = last_raw.1;
        self.points.pop_front();
        self.points.push_back(synth);
        let pts = [self.points[0], self.points[1], self.points[2], self.points[3]];
        damaged = union_opt(damaged, self.segment(mgr, pts, &sanitized)?);

        let p2 = self.points[2];
        self.points.pop_front();
        self.points.push_back(p2);
        let pts = [self.points[0], self.points[1], self.points[2], self.points[3]];
        damaged = union_opt(damaged, self.segment(mgr, pts, &sanitized)?);

        self.drawing = false;
        Ok(damaged)
    }

    fn segment(&mut self, mgr: &mut TileManager, pts: [StrokePoint; 4], sanitized: &BrushParams) -> Result<Option<Rect>> {
        let (p0, p1, p2, p3) = (pts[0], pts[1], pts[2], pts[3]);

        let dist = (p2.sx - p1.sx).hypot(p2.sy - p1.sy);
        let rad_per_spacing = p1.radius.max(p2.radius).max(0.01) * sanitized.spacing;
        let total = dist / rad_per_spacing.max(1e-6);

        let mut remaining = total;
        let mut frac_accum = self.remain_steps;
        let mut t = 0.0f32;
        let mut first = true;
        let mut count = 0u32;

        let opa_exp = sanitized.opacity_compensation_exponent();
        let opacity_start = p1.opacity.max(0.0).powf(opa_exp);
        let opacity_end = p2.opacity.max(0.0).powf(opa_exp);

        // Dab direction comes from the stylus tilt averaged over the
        // segment's two endpoints, not from the travel direction.
        let xtilt = (p1.xtilt + p2.xtilt) * 0.5;
        let ytilt = (p1.ytilt + p2.ytilt) * 0.5;
        let direction = if ytilt != 0.0 { (xtilt / ytilt).atan() + sanitized.angle } else { 0.0 };
        let mut dir_index = (direction / std::f32::consts::TAU * PERIOD as f32) as i32;
        if dir_index == PERIOD as i32 {
            dir_index = 0;
        }

        let mut damaged = None;
        loop {
            if frac_accum + remaining < 1.0 {
                frac_accum += remaining;
                break;
            }
            if count >= MAX_DABS_PER_SEGMENT {
                tracing::warn!(count, "segment dab cap reached; dropping remaining fraction");
                frac_accum = 0.0;
                break;
            }
            let frac = if first { (1.0 - frac_accum) / total } else { 1.0 / total };
            first = false;
            remaining -= frac * total;
            frac_accum = 0.0;
            t += frac * (1.0 - t);
            count += 1;

            let d = self.stamp_dab(mgr, p0, p1, p2, p3, t, direction, dir_index, opacity_start, opacity_end, sanitized)?;
            damaged = union_opt(damaged, d);
        }
        self.remain_steps = frac_accum;
        Ok(damaged)
    }

    #[allow(clippy::too_many_arguments)]
    fn stamp_dab(
        &mut self,
        mgr: &mut TileManager,
        p0: StrokePoint,
        p1: StrokePoint,
        p2: StrokePoint,
        p3: StrokePoint,
        t: f32,
        direction: f32,
        dir_index: i32,
        opacity_start: f32,
        opacity_end: f32,
        sanitized: &BrushParams,
    ) -> Result<Option<Rect>> {
        let m0x = (p2.sx - p0.sx) * 0.5;
        let m0y = (p2.sy - p0.sy) * 0.5;
        let m1x = (p3.sx - p1.sx) * 0.5;
        let m1y = (p3.sy - p1.sy) * 0.5;

        let mut dab_x = hermite(p1.sx, m0x, p2.sx, m1x, t);
        let mut dab_y = hermite(p1.sy, m0y, p2.sy, m1y, t);
        let mut radius = lerp(p1.radius, p2.radius, t);
        let opacity = lerp(opacity_start, opacity_end, t);

        if sanitized.dab_radius_jitter > 0.0 {
            radius *= 1.0 - self.rng.rand2() * sanitized.dab_radius_jitter;
        }
        if sanitized.dab_pos_jitter > 0.0 {
            let jitter = sanitized.dab_pos_jitter * radius;
            dab_x += self.rng.rand1_signed() * jitter;
            dab_y += self.rng.rand2_signed() * jitter;
        }

        // Dabs are round by nature, so the jittered direction is limited to
        // a +-90 degree index shift into the same table `dir_index` names.
        let (cs, sn) = if sanitized.direction_jitter > 0.0 {
            let shift = (self.rng.rand1() * sanitized.direction_jitter * 512.0) as i32 - 256;
            let mut da = dir_index + shift;
            if da < 0 {
                da += PERIOD as i32 * 2 - 1;
            }
            let turns = da as f32 / PERIOD as f32;
            (fast_cos_turns(turns), fast_sin_turns(turns))
        } else {
            (fast_cos(direction), fast_sin(direction))
        };

        let mut color = self.color;
        let mut alpha = 1.0f32;
        if sanitized.smudge > 0.0 {
            let fac = sanitized.smudge;
            alpha = (1.0 - fac) + self.smudge_acc[3] * fac;
            if alpha > 0.0 {
                for i in 0..3 {
                    color[i] = (self.color[i] * (1.0 - fac) + self.smudge_acc[i] * fac) / alpha;
                }
            }
            if let Some(sample) = dab::get_dab_color(mgr, &mut self.cache, dab_x, dab_y, radius.max(0.01), sanitized.yratio, sanitized.hardness, cs, sn) {
                if sanitized.smudge_var > 0.0 {
                    let vf = sanitized.smudge_var;
                    self.smudge_acc[3] = self.smudge_acc[3] * (1.0 - vf) + sample[3] * vf;
                    for i in 0..3 {
                        self.smudge_acc[i] = self.smudge_acc[i] * (1.0 - vf) + sample[i] * sample[3] * vf;
                    }
                }
            }
        }

        let hsv = rgb_to_hsv(color);
        let drifted = hsv_to_rgb([hsv[0] + sanitized.color_shift_h, hsv[1] + sanitized.color_shift_s, hsv[2] + sanitized.color_shift_v]);
        self.color = drifted;
        color = drifted;

        if sanitized.erase < 1.0 {
            alpha *= sanitized.erase;
        }

        dab::drawdab_solid(
            mgr,
            &mut self.cache,
            dab_x,
            dab_y,
            radius,
            sanitized.yratio,
            sanitized.hardness,
            alpha,
            opacity,
            cs,
            sn,
            sanitized.grain_fac,
            color,
            sanitized.alpha_lock,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::StrokeEvent;
    use vellum_core::PixelFormat;

    fn event(x: f32, y: f32, t: f32) -> StrokeEvent {
        StrokeEvent::new((x as i32, y as i32), (x, y), 0.8, t)
    }

    #[test]
    fn a_short_stroke_paints_something() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let params = BrushParams { radius_min: 3.0, radius_max: 3.0, spacing: 0.3, ..BrushParams::default() };
        let mut brush = Brush::new(params, 7);
        brush.set_color([1.0, 0.0, 0.0]);

        brush.stroke_start(&mgr, event(10.0, 10.0, 0.0)).unwrap();
        let mut damaged = None;
        for i in 1..10 {
            let d = brush.draw_stroke(&mut mgr, event(10.0 + i as f32 * 2.0, 10.0, i as f32 * 0.05)).unwrap();
            damaged = union_opt(damaged, d);
        }
        let end = brush.stroke_end(&mut mgr).unwrap();
        damaged = union_opt(damaged, end);

        assert!(damaged.is_some());
        assert!(mgr.len() > 0);
    }

    #[test]
    fn zero_movement_is_a_no_op() {
        let mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut mgr2 = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut brush = Brush::new(BrushParams::default(), 1);
        brush.stroke_start(&mgr, event(5.0, 5.0, 0.0)).unwrap();
        let d = brush.draw_stroke(&mut mgr2, event(5.0, 5.0, 0.1)).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn stroke_end_before_drawing_state_is_a_no_op() {
        let mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut mgr2 = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut brush = Brush::new(BrushParams::default(), 1);
        brush.stroke_start(&mgr, event(5.0, 5.0, 0.0)).unwrap();
        let d = brush.stroke_end(&mut mgr2).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn decay_underflows_to_zero_for_large_t_small_tau() {
        assert_eq!(decay(1e6, 1e-3), 0.0);
        assert!((decay(0.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn smudge_blends_stroke_color_toward_accumulator() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        // Paint a blue patch the smudge accumulator will later pick up from.
        {
            let mut cache = PixbufCache::new();
            dab::drawdab_solid(&mut mgr, &mut cache, 40.0, 10.0, 8.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, [0.0, 0.0, 1.0], false).unwrap();
        }

        let params = BrushParams { radius_min: 4.0, radius_max: 4.0, spacing: 0.3, smudge: 1.0, smudge_var: 1.0, ..BrushParams::default() };
        let mut brush = Brush::new(params, 3);
        brush.set_color([1.0, 0.0, 0.0]);
        brush.stroke_start(&mgr, event(10.0, 10.0, 0.0)).unwrap();
        for i in 1..12 {
            brush.draw_stroke(&mut mgr, event(10.0 + i as f32 * 3.0, 10.0, i as f32 * 0.05)).unwrap();
        }
        // After sweeping across the blue patch the drifting stroke color
        // should have picked up some blue.
        assert!(brush.color()[2] > 0.0);
    }
}

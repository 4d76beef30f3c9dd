//! Brush parameter sets and the per-event input the host feeds the stroke
//! state machine.

#[cfg(feature = "presets")]
use serde::{Deserialize, Serialize};

/// The full set of tunable brush parameters.
///
/// Field order matches the source brush's basic-value table, not any
/// particular grouping by concern: radius, shape, opacity, timing/jitter,
/// smudge, color drift, then the alpha-lock flag.
///
/// This is plain data; it carries no invariants of its own; see
/// [`BrushParams::sanitized`] for the clamps the stroke engine applies
/// before use.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "presets", derive(Serialize, Deserialize))]
pub struct BrushParams {
    /// Dab radius at zero pressure, in device pixels.
    pub radius_min: f32,
    /// Dab radius at full pressure, in device pixels.
    pub radius_max: f32,
    /// Y-axis elongation of the dab ellipse; `1.0` is circular.
    pub yratio: f32,
    /// Rotation of the dab ellipse's major axis, in radians.
    pub angle: f32,
    /// Falloff hardness, `(0, 1]`; `1.0` is a hard edge.
    pub hardness: f32,
    /// Dab opacity at zero pressure.
    pub opacity_min: f32,
    /// Dab opacity at full pressure.
    pub opacity_max: f32,
    /// Exponent applied to opacity to compensate for dab overlap at low
    /// spacing: `opacity.powf(1.0 / spacing.max(0.01))`.
    pub opacity_compensation: f32,
    /// Multiplies the dab's alpha channel; `< 1.0` erases instead of paints.
    pub erase: f32,
    /// Dab spacing as a fraction of radius; floored at `0.01`.
    pub spacing: f32,
    /// Grain/noise texture strength; `0.0` disables it.
    pub grain_fac: f32,
    /// Low-pass weight for the motion-track smoothing term.
    pub motion_track: f32,
    /// Low-pass weight for the high-speed smoothing term.
    pub hi_speed_track: f32,
    /// Smudge blend factor; `0.0` disables smudging entirely.
    pub smudge: f32,
    /// How strongly the smudge accumulator is refreshed from the canvas
    /// under each dab.
    pub smudge_var: f32,
    /// Random perturbation of the dab travel direction.
    pub direction_jitter: f32,
    /// Random perturbation of the dab position, scaled by radius.
    pub dab_pos_jitter: f32,
    /// Random perturbation of the dab radius.
    pub dab_radius_jitter: f32,
    /// Per-dab hue drift, added cumulatively along the stroke.
    pub color_shift_h: f32,
    /// Per-dab saturation drift, added cumulatively along the stroke.
    pub color_shift_s: f32,
    /// Per-dab value drift, added cumulatively along the stroke.
    pub color_shift_v: f32,
    /// When set, dabs never modify the destination's alpha channel.
    pub alpha_lock: bool,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            radius_min: 2.0,
            radius_max: 2.0,
            yratio: 1.0,
            angle: 0.0,
            hardness: 0.5,
            opacity_min: 1.0,
            opacity_max: 1.0,
            opacity_compensation: 1.0,
            erase: 1.0,
            spacing: 0.25,
            grain_fac: 0.0,
            motion_track: 0.3,
            hi_speed_track: 0.0,
            smudge: 0.0,
            smudge_var: 0.0,
            direction_jitter: 0.0,
            dab_pos_jitter: 0.0,
            dab_radius_jitter: 0.0,
            color_shift_h: 0.0,
            color_shift_s: 0.0,
            color_shift_v: 0.0,
            alpha_lock: false,
        }
    }
}

impl BrushParams {
    /// Returns a copy with the clamps the stroke engine relies on applied:
    /// `yratio` to `[1.0, 100.0]`, `hardness` to `[0.01, 1.0]`, `spacing`
    /// floored at `0.01`.
    pub fn sanitized(&self) -> Self {
        Self {
            yratio: self.yratio.clamp(1.0, 100.0),
            hardness: self.hardness.clamp(0.01, 1.0),
            spacing: self.spacing.max(0.01),
            ..*self
        }
    }

    /// Linearly interpolates the dab radius for `pressure` (expected
    /// clamped to `[0, 1]` by the caller).
    #[inline]
    pub fn radius_from_pressure(&self, pressure: f32) -> f32 {
        vellum_math::lerp(self.radius_min, self.radius_max, pressure)
    }

    /// Linearly interpolates the dab opacity for `pressure` (expected
    /// clamped to `[0, 1]` by the caller).
    #[inline]
    pub fn opacity_from_pressure(&self, pressure: f32) -> f32 {
        vellum_math::lerp(self.opacity_min, self.opacity_max, pressure)
    }

    /// The opacity-compensation exponent applied before rasterising a dab.
    #[inline]
    pub fn opacity_compensation_exponent(&self) -> f32 {
        1.0 / self.spacing.max(0.01)
    }

    /// Loads a [`BrushParams`] from a YAML preset document.
    #[cfg(feature = "presets")]
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialises this parameter set as a YAML preset document.
    #[cfg(feature = "presets")]
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// One host-supplied stylus/mouse sample.
///
/// `vpos` is the integer device position; `spos` is the already-smoothed
/// float position used as the spline's raw input before the brush's own
/// two-stage low-pass filter runs. Tilt fields default to `(0.5, -0.5)`
/// when the host device doesn't report tilt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeEvent {
    /// Integer device position.
    pub vpos: (i32, i32),
    /// Smoothed float position, as reported by the host.
    pub spos: (f32, f32),
    /// Stylus pressure, expected in `[0, 1]`.
    pub pressure: f32,
    /// Event timestamp in seconds.
    pub time: f32,
    /// Stylus X tilt.
    pub xtilt: f32,
    /// Stylus Y tilt.
    pub ytilt: f32,
}

impl StrokeEvent {
    /// Creates an event with the default tilt `(0.5, -0.5)`.
    pub fn new(vpos: (i32, i32), spos: (f32, f32), pressure: f32, time: f32) -> Self {
        Self { vpos, spos, pressure, time, xtilt: 0.5, ytilt: -0.5 }
    }

    /// Returns this event with tilt fields overridden.
    pub fn with_tilt(mut self, xtilt: f32, ytilt: f32) -> Self {
        self.xtilt = xtilt;
        self.ytilt = ytilt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_source_defaults() {
        let p = BrushParams::default();
        assert_eq!(p.radius_min, 2.0);
        assert_eq!(p.radius_max, 2.0);
        assert_eq!(p.hardness, 0.5);
        assert_eq!(p.spacing, 0.25);
        assert_eq!(p.motion_track, 0.3);
        assert_eq!(p.smudge, 0.0);
        assert!(!p.alpha_lock);
    }

    #[test]
    fn sanitized_clamps_yratio_hardness_spacing() {
        let p = BrushParams { yratio: 0.1, hardness: 0.0, spacing: 0.0, ..BrushParams::default() };
        let s = p.sanitized();
        assert_eq!(s.yratio, 1.0);
        assert_eq!(s.hardness, 0.01);
        assert_eq!(s.spacing, 0.01);
    }

    #[test]
    fn sanitized_preserves_in_range_values() {
        let p = BrushParams { yratio: 3.0, hardness: 0.7, spacing: 0.5, ..BrushParams::default() };
        let s = p.sanitized();
        assert_eq!(s.yratio, 3.0);
        assert_eq!(s.hardness, 0.7);
        assert_eq!(s.spacing, 0.5);
    }

    #[test]
    fn pressure_interpolation_is_linear() {
        let p = BrushParams { radius_min: 1.0, radius_max: 5.0, opacity_min: 0.2, opacity_max: 1.0, ..BrushParams::default() };
        assert_eq!(p.radius_from_pressure(0.0), 1.0);
        assert_eq!(p.radius_from_pressure(1.0), 5.0);
        assert!((p.opacity_from_pressure(0.5) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn event_defaults_to_neutral_tilt() {
        let e = StrokeEvent::new((1, 2), (1.0, 2.0), 0.5, 0.0);
        assert_eq!(e.xtilt, 0.5);
        assert_eq!(e.ytilt, -0.5);
    }

    #[cfg(feature = "presets")]
    #[test]
    fn yaml_round_trips() {
        let p = BrushParams { radius_min: 3.0, smudge: 0.4, alpha_lock: true, ..BrushParams::default() };
        let yaml = p.to_yaml().unwrap();
        let back = BrushParams::from_yaml(&yaml).unwrap();
        assert_eq!(p, back);
    }
}

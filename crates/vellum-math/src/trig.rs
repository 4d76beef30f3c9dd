//! Doubled cosine/sine lookup tables for the brush engine's per-dab angle
//! math, where calling `f32::sin`/`f32::cos` thousands of times per stroke
//! segment shows up in profiles.
//!
//! Each table holds one full turn (`2*PERIOD` entries: the period stored
//! twice back to back) so a lookup near the wrap point never needs a second
//! modulo — `index` and `index + PERIOD` always both land in bounds.

use std::sync::OnceLock;

/// Entries per half-table; one full period of the waveform.
pub const PERIOD: usize = 1024;
const TABLE_LEN: usize = PERIOD * 2;

fn build_table(offset_turns: f32) -> Vec<f32> {
    (0..TABLE_LEN)
        .map(|i| {
            let turns = (i % PERIOD) as f32 / PERIOD as f32 + offset_turns;
            (turns * std::f32::consts::TAU).cos()
        })
        .collect()
}

static COS_TABLE: OnceLock<Vec<f32>> = OnceLock::new();
static SIN_TABLE: OnceLock<Vec<f32>> = OnceLock::new();

fn cos_table() -> &'static [f32] {
    COS_TABLE.get_or_init(|| build_table(0.0))
}

fn sin_table() -> &'static [f32] {
    // sin(x) == cos(x - 1/4 turn)
    SIN_TABLE.get_or_init(|| build_table(-0.25))
}

#[inline]
fn lookup(table: &[f32], turns: f32) -> f32 {
    let wrapped = turns - turns.floor();
    let scaled = wrapped * PERIOD as f32;
    let i0 = scaled as usize;
    let frac = scaled - i0 as f32;
    let i1 = i0 + 1;
    table[i0] * (1.0 - frac) + table[i1] * frac
}

/// Cosine of `turns` full turns (i.e. `turns * 2*PI` radians), via a
/// linearly-interpolated lookup table.
#[inline]
pub fn fast_cos_turns(turns: f32) -> f32 {
    lookup(cos_table(), turns)
}

/// Sine of `turns` full turns, via a linearly-interpolated lookup table.
#[inline]
pub fn fast_sin_turns(turns: f32) -> f32 {
    lookup(sin_table(), turns)
}

/// Cosine of an angle given in radians.
#[inline]
pub fn fast_cos(radians: f32) -> f32 {
    fast_cos_turns(radians / std::f32::consts::TAU)
}

/// Sine of an angle given in radians.
#[inline]
pub fn fast_sin(radians: f32) -> f32 {
    fast_sin_turns(radians / std::f32::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matches_std_trig_closely() {
        for i in 0..37 {
            let radians = i as f32 * std::f32::consts::TAU / 36.0;
            assert_relative_eq!(fast_cos(radians), radians.cos(), epsilon = 2e-3);
            assert_relative_eq!(fast_sin(radians), radians.sin(), epsilon = 2e-3);
        }
    }

    #[test]
    fn wraps_cleanly_past_one_turn() {
        assert_relative_eq!(fast_cos_turns(1.0), fast_cos_turns(0.0), epsilon = 1e-5);
        assert_relative_eq!(fast_sin_turns(1.25), fast_sin_turns(0.25), epsilon = 1e-5);
    }
}

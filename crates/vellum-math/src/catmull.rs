//! Catmull-Rom / cubic Hermite basis functions, shared by the stroke
//! interpolator's segment subdivision.

/// Hermite basis function for the start-point weight.
#[inline]
pub fn h00(t: f32) -> f32 {
    (1.0 + 2.0 * t) * (1.0 - t) * (1.0 - t)
}

/// Hermite basis function for the start-tangent weight.
#[inline]
pub fn h10(t: f32) -> f32 {
    t * (1.0 - t) * (1.0 - t)
}

/// Hermite basis function for the end-point weight.
#[inline]
pub fn h01(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Hermite basis function for the end-tangent weight.
#[inline]
pub fn h11(t: f32) -> f32 {
    t * t * (t - 1.0)
}

/// Evaluates the cubic Hermite curve through `p0` (at `t=0`) and `p1` (at
/// `t=1`) with tangents `m0`, `m1`.
#[inline]
pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
    h00(t) * p0 + h10(t) * m0 + h01(t) * p1 + h11(t) * m1
}

/// Catmull-Rom tangent at the interior point `p1` of a `p0, p1, p2`
/// triplet (centripetal/uniform variant: `(p2 - p0) / 2`).
#[inline]
pub fn catmull_rom_tangent(p0: f32, p2: f32) -> f32 {
    (p2 - p0) * 0.5
}

/// Evaluates a Catmull-Rom spline segment between `p1` and `p2`, given the
/// neighboring control points `p0` and `p3`, at parameter `t` in `[0, 1]`.
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let m1 = catmull_rom_tangent(p0, p2);
    let m2 = catmull_rom_tangent(p1, p3);
    hermite(p1, m1, p2, m2, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basis_functions_sum_identities() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert_relative_eq!(h00(t) + h01(t) + h10(t) * t + h11(t) * t, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn passes_through_control_points() {
        assert_relative_eq!(hermite(3.0, 1.0, 7.0, 1.0, 0.0), 3.0, epsilon = 1e-6);
        assert_relative_eq!(hermite(3.0, 1.0, 7.0, 1.0, 1.0), 7.0, epsilon = 1e-6);
    }

    #[test]
    fn catmull_rom_passes_through_endpoints() {
        assert_relative_eq!(catmull_rom(0.0, 1.0, 2.0, 3.0, 0.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(catmull_rom(0.0, 1.0, 2.0, 3.0, 1.0), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn catmull_rom_is_linear_for_evenly_spaced_colinear_points() {
        let mid = catmull_rom(0.0, 1.0, 2.0, 3.0, 0.5);
        assert_relative_eq!(mid, 1.5, epsilon = 1e-5);
    }
}

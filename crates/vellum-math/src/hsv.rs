//! RGB <-> HSV conversion, used by the brush engine's color-shift jitter.

/// Converts an RGB triplet (each channel `[0, 1]`) to HSV. Hue and
/// saturation are `0.0` for achromatic input.
pub fn rgb_to_hsv(rgb: [f32; 3]) -> [f32; 3] {
    let maxc = rgb[0].max(rgb[1]).max(rgb[2]);
    let minc = rgb[0].min(rgb[1]).min(rgb[2]);
    let v = maxc;

    if minc == maxc {
        return [0.0, 0.0, v];
    }

    let delta = maxc - minc;
    let s = delta / maxc;

    let rc = (maxc - rgb[0]) / delta + 3.0;
    let gc = (maxc - rgb[1]) / delta + 3.0;
    let bc = (maxc - rgb[2]) / delta + 3.0;

    let mut h = if rgb[0] == maxc {
        bc - gc
    } else if rgb[1] == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    h /= 6.0;
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }

    [h, s, v]
}

/// Converts an HSV triplet back to RGB. Hue wraps modulo `1.0`; saturation
/// and value are clamped to `[0, 1]`.
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let h = hsv[0] - hsv[0].floor();
    let s = hsv[1].clamp(0.0, 1.0);
    let v = hsv[2].clamp(0.0, 1.0);

    if s == 0.0 {
        return [v, v, v];
    }

    let f_full = h * 6.0;
    let i = f_full.floor() as i32;
    let f = f_full - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i.rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

use crate::color::{Hsv, Rgb, hsv_to_rgb, rgb_to_hsv};

/// Clamp a channel value into 0..=255
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_channel(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn scale_channel(channel: u8, factor: f32) -> u8 {
    // `as` saturates, so NaN and out-of-range products land in range too
    clamp_channel((f32::from(channel) * factor) as i32)
}

/// Scale every channel by `factor`, truncating and clamping the result
pub fn scale(color: Rgb, factor: f32) -> Rgb {
    Rgb {
        r: scale_channel(color.r, factor),
        g: scale_channel(color.g, factor),
        b: scale_channel(color.b, factor),
    }
}

/// Scale a whole frame in place
pub fn scale_frame(frame: &mut [Rgb], factor: f32) {
    for pixel in frame {
        *pixel = scale(*pixel, factor);
    }
}

#[inline]
fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) * (1.0 - t) + f32::from(b) * t) as u8
}

/// Per-channel linear blend, `t` clamped to 0..=1 (0 = all `from`)
pub fn blend_linear(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let t = clamp_unit(t);
    Rgb {
        r: lerp_channel(from.r, to.r, t),
        g: lerp_channel(from.g, to.g, t),
        b: lerp_channel(from.b, to.b, t),
    }
}

/// Blend two HSV colors with the hue travelling along the shorter arc
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_hsv(from: Hsv, to: Hsv, t: f32) -> Hsv {
    let mut t = clamp_unit(t);
    let (low, high) = if from.hue > to.hue {
        t = 1.0 - t;
        (to, from)
    } else {
        (from, to)
    };

    let low_hue = f32::from(low.hue);
    let high_hue = f32::from(high.hue);
    let mut hue = if high.hue - low.hue > 180 {
        (low_hue + 360.0) * (1.0 - t) + high_hue * t
    } else {
        low_hue * (1.0 - t) + high_hue * t
    };
    if hue >= 360.0 {
        hue -= 360.0;
    }

    Hsv {
        hue: (hue as u16) % 360,
        sat: (f32::from(low.sat) * (1.0 - t) + f32::from(high.sat) * t) as u8,
        val: (f32::from(low.val) * (1.0 - t) + f32::from(high.val) * t) as u8,
    }
}

/// Blend two RGB colors in HSV space, hue along the shorter arc
///
/// This is the blend used for animation cross-fades.
pub fn blend_hue_aware(from: Rgb, to: Rgb, t: f32) -> Rgb {
    hsv_to_rgb(blend_hsv(rgb_to_hsv(from), rgb_to_hsv(to), t))
}

/// Hue-aware blend of two frames into `out`
///
/// Only the common prefix of the three slices is written.
pub fn blend_frames(from: &[Rgb], to: &[Rgb], t: f32, out: &mut [Rgb]) {
    for ((out, from), to) in out.iter_mut().zip(from).zip(to) {
        *out = blend_hue_aware(*from, *to, t);
    }
}

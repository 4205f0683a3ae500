//! RGB <-> HSV conversion
//!
//! Hue is in degrees (0-359), saturation and value in percent (0-100).
//! Every conversion works in double precision and truncates instead of
//! rounding, so results are identical on every target. Single precision is
//! off by one step on some inputs.

use crate::color::Rgb;

/// HSV color with degree hue and percentage saturation/value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    /// Hue in degrees, 0..360
    pub hue: u16,
    /// Saturation in percent, 0..=100
    pub sat: u8,
    /// Value in percent, 0..=100
    pub val: u8,
}

impl Hsv {
    pub const fn new(hue: u16, sat: u8, val: u8) -> Self {
        Self { hue, sat, val }
    }
}

/// Convert an RGB color to HSV
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let high = r.max(g).max(b);
    let low = r.min(g).min(b);
    let delta = high - low;

    let sat = if high == 0.0 { 0.0 } else { delta / high };

    let hue = if delta == 0.0 {
        0.0
    } else {
        // Ties resolve towards blue, then green; the sectors agree at the
        // boundaries so the result is the same either way.
        let sector = if high == b {
            (r - g) / delta + 4.0
        } else if high == g {
            (b - r) / delta + 2.0
        } else {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        };
        sector / 6.0
    };

    Hsv {
        hue: ((360.0 * hue) as u16) % 360,
        sat: (100.0 * sat) as u8,
        val: (100.0 * high) as u8,
    }
}

/// Convert an HSV color to RGB
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = f64::from(hsv.hue % 360) / 360.0;
    let s = f64::from(hsv.sat.min(100)) / 100.0;
    let v = f64::from(hsv.val.min(100)) / 100.0;

    let i = libm::floor(h * 6.0);
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb {
        r: (255.0 * r) as u8,
        g: (255.0 * g) as u8,
        b: (255.0 * b) as u8,
    }
}

//! Gamma correction lookup table
//!
//! Built once at startup; every channel headed for the hardware goes through
//! it.

use crate::color::Rgb;

/// Gamma used by the reference WS2812 hardware
pub const DEFAULT_GAMMA: f32 = 2.8;

/// 256-entry gamma lookup table
#[derive(Debug, Clone)]
pub struct GammaTable {
    lut: [u8; 256],
}

impl GammaTable {
    /// Build the table for `gamma`
    ///
    /// Entry `i` is `round((i / 255) ^ gamma * 255)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(gamma: f32) -> Self {
        let mut lut = [0u8; 256];
        for (input, entry) in lut.iter_mut().enumerate() {
            let normalized = input as f32 / 255.0;
            let corrected = libm::powf(normalized, gamma) * 255.0;
            *entry = libm::floorf(corrected + 0.5).clamp(0.0, 255.0) as u8;
        }
        Self { lut }
    }

    /// Identity table, useful for drivers that correct on their own
    #[allow(clippy::cast_possible_truncation)]
    pub fn linear() -> Self {
        let mut lut = [0u8; 256];
        for (input, entry) in lut.iter_mut().enumerate() {
            *entry = input as u8;
        }
        Self { lut }
    }

    /// Correct a single channel
    #[inline]
    pub const fn correct(&self, channel: u8) -> u8 {
        self.lut[channel as usize]
    }

    /// Correct all three channels of a color
    #[inline]
    pub const fn correct_rgb(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.correct(color.r),
            g: self.correct(color.g),
            b: self.correct(color.b),
        }
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

//! Rotating hue gradient across the strip

use embassy_time::{Duration, Instant};

use super::Animation;
use crate::color::{Hsv, Rgb, hsv_to_rgb};

const DEFAULT_NAME: &str = "color_wheel";
const DEFAULT_CYCLE_MS: u64 = 12_000;
const DEFAULT_SPREAD: u16 = 120;

/// Hue gradient that rotates once per cycle
///
/// The strip spans `spread` degrees of the wheel.
#[derive(Debug, Clone)]
pub struct ColorWheel {
    enabled: bool,
    /// Duration of one full turn of the wheel
    cycle_duration: Duration,
    /// Hue range covered by the strip in degrees
    spread: u16,
    /// Saturation in percent
    saturation: u8,
    /// Value in percent
    value: u8,
    /// Time the current activation started
    origin: Instant,
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorWheel {
    pub const fn new() -> Self {
        Self {
            enabled: true,
            cycle_duration: Duration::from_millis(DEFAULT_CYCLE_MS),
            spread: DEFAULT_SPREAD,
            saturation: 100,
            value: 100,
            origin: Instant::from_millis(0),
        }
    }

    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the cycle duration
    #[must_use]
    pub const fn with_cycle_duration(mut self, duration: Duration) -> Self {
        self.cycle_duration = duration;
        self
    }

    /// Set the hue range covered by the strip
    #[must_use]
    pub const fn with_spread(mut self, spread: u16) -> Self {
        self.spread = spread;
        self
    }

    /// Set saturation and value in percent
    #[must_use]
    pub const fn with_saturation_value(mut self, saturation: u8, value: u8) -> Self {
        self.saturation = saturation;
        self.value = value;
        self
    }
}

impl Animation for ColorWheel {
    fn name(&self) -> &str {
        DEFAULT_NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        if first_frame {
            self.origin = now;
        }
        if frame.is_empty() {
            return;
        }

        let cycle_ms = self.cycle_duration.as_millis().max(1);
        let progress_ms = now.saturating_duration_since(self.origin).as_millis() % cycle_ms;
        let base_hue = ((progress_ms * 360) / cycle_ms) as u32;

        let len = frame.len() as u32;
        for (index, pixel) in frame.iter_mut().enumerate() {
            let offset = (index as u32 * u32::from(self.spread)) / len;
            let hue = ((base_hue + offset) % 360) as u16;
            *pixel = hsv_to_rgb(Hsv::new(hue, self.saturation, self.value));
        }
    }
}

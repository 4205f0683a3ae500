//! Calibration pattern: the first pixel fades between blue and red

use embassy_time::Instant;

use super::{Animation, blend_progress};
use crate::color::{Rgb, blend_hue_aware};

const DEFAULT_NAME: &str = "gammatest";
const DEFAULT_BLEND_MS: u64 = 3_000;

const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

#[derive(Debug, Clone)]
pub struct GammaTest {
    enabled: bool,
    blend_ms: u64,
    from: Rgb,
    to: Rgb,
    blend_start: Instant,
    running: bool,
}

impl Default for GammaTest {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaTest {
    /// Disabled unless explicitly switched on
    pub const fn new() -> Self {
        Self {
            enabled: false,
            blend_ms: DEFAULT_BLEND_MS,
            from: BLUE,
            to: RED,
            blend_start: Instant::from_millis(0),
            running: false,
        }
    }

    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Animation for GammaTest {
    fn name(&self) -> &str {
        DEFAULT_NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        let Some(first) = frame.first_mut() else {
            return;
        };

        if first_frame || !self.running {
            self.from = BLUE;
            self.to = RED;
            self.blend_start = now;
            self.running = true;
            *first = self.from;
            return;
        }

        let progress = blend_progress(now, self.blend_start, self.blend_ms);
        if progress >= 1.0 {
            *first = self.to;
            core::mem::swap(&mut self.from, &mut self.to);
            self.blend_start = now;
        } else {
            *first = blend_hue_aware(self.from, self.to, progress);
        }
    }
}

//! One shared color drifting slowly on every second pixel

use embassy_time::Instant;
use rand_core::RngCore;

use super::{Animation, blend_progress, random_color};
use crate::color::{BLACK, Rgb, blend_hue_aware};

const DEFAULT_NAME: &str = "random_uniform";
const DEFAULT_BLEND_MS: u64 = 2 * 60 * 1000;

pub struct UniformDrift<R> {
    name: &'static str,
    enabled: bool,
    rng: R,
    blend_ms: u64,
    from: Rgb,
    to: Rgb,
    blend_start: Instant,
    running: bool,
}

impl<R: RngCore> UniformDrift<R> {
    pub const fn new(rng: R) -> Self {
        Self {
            name: DEFAULT_NAME,
            enabled: true,
            rng,
            blend_ms: DEFAULT_BLEND_MS,
            from: BLACK,
            to: BLACK,
            blend_start: Instant::from_millis(0),
            running: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Duration of one fade in milliseconds
    #[must_use]
    pub fn with_blend_ms(mut self, blend_ms: u64) -> Self {
        self.blend_ms = blend_ms;
        self
    }
}

impl<R: RngCore> Animation for UniformDrift<R> {
    fn name(&self) -> &str {
        self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        let color = if first_frame || !self.running {
            self.from = random_color(&mut self.rng);
            self.to = random_color(&mut self.rng);
            self.blend_start = now;
            self.running = true;
            self.from
        } else {
            let progress = blend_progress(now, self.blend_start, self.blend_ms);
            if progress >= 1.0 {
                self.from = self.to;
                self.to = random_color(&mut self.rng);
                self.blend_start = now;
                self.from
            } else {
                blend_hue_aware(self.from, self.to, progress)
            }
        };

        for pixel in frame.iter_mut().skip(1).step_by(2) {
            *pixel = color;
        }
    }
}

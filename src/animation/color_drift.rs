//! Independent per-pixel color drift
//!
//! Every pixel fades from one random color to the next; all pixels pick new
//! targets together when a fade completes.

use embassy_time::Instant;
use rand_core::RngCore;

use super::{Animation, blend_progress, random_color};
use crate::color::{BLACK, Rgb, blend_frames};

const DEFAULT_NAME: &str = "random_mixed";
const DEFAULT_BLEND_MS: u64 = 3_000;

pub struct ColorDrift<R, const N: usize> {
    name: &'static str,
    enabled: bool,
    rng: R,
    blend_ms: u64,
    from: [Rgb; N],
    to: [Rgb; N],
    blend_start: Instant,
    running: bool,
}

impl<R: RngCore, const N: usize> ColorDrift<R, N> {
    pub const fn new(rng: R) -> Self {
        Self {
            name: DEFAULT_NAME,
            enabled: true,
            rng,
            blend_ms: DEFAULT_BLEND_MS,
            from: [BLACK; N],
            to: [BLACK; N],
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

    fn randomize(&mut self, target: bool) {
        let rng = &mut self.rng;
        let colors = if target { &mut self.to } else { &mut self.from };
        for color in colors.iter_mut() {
            *color = random_color(rng);
        }
    }
}

impl<R: RngCore, const N: usize> Animation for ColorDrift<R, N> {
    fn name(&self) -> &str {
        self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        if first_frame || !self.running {
            self.randomize(false);
            self.randomize(true);
            self.blend_start = now;
            self.running = true;
            copy_into(frame, &self.from);
            return;
        }

        let progress = blend_progress(now, self.blend_start, self.blend_ms);
        if progress >= 1.0 {
            copy_into(frame, &self.to);
            self.from = self.to;
            self.randomize(true);
            self.blend_start = now;
        } else {
            blend_frames(&self.from, &self.to, progress, frame);
        }
    }
}

fn copy_into(frame: &mut [Rgb], colors: &[Rgb]) {
    for (pixel, color) in frame.iter_mut().zip(colors) {
        *pixel = *color;
    }
}

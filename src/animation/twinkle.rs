//! Single white pixels flashing up at random

use embassy_time::Instant;
use rand_core::RngCore;

use super::{Animation, random_below, random_unit};
use crate::color::Rgb;

const DEFAULT_NAME: &str = "twinkle";
const DEFAULT_PROBABILITY: f32 = 0.4;
const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

pub struct Twinkle<R> {
    name: &'static str,
    enabled: bool,
    rng: R,
    probability: f32,
}

impl<R: RngCore> Twinkle<R> {
    pub const fn new(rng: R) -> Self {
        Self {
            name: DEFAULT_NAME,
            enabled: true,
            rng,
            probability: DEFAULT_PROBABILITY,
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

    /// Chance per frame (0.0-1.0) that a pixel lights up
    #[must_use]
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }
}

impl<R: RngCore> Animation for Twinkle<R> {
    fn name(&self) -> &str {
        self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, _now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        if frame.is_empty() {
            return;
        }
        if first_frame || random_unit(&mut self.rng) < self.probability {
            let index = random_below(&mut self.rng, frame.len());
            frame[index] = WHITE;
        }
    }
}

//! Animation plug-ins
//!
//! An animation produces a full frame for a point in time. The scheduler
//! decides when an animation runs and for how long; the animation only keeps
//! whatever private state it needs to stay continuous between frames.

mod color_drift;
mod color_wheel;
mod gamma_test;
mod twinkle;
mod uniform_drift;

use embassy_time::Instant;
use rand_core::RngCore;

pub use color_drift::ColorDrift;
pub use color_wheel::ColorWheel;
pub use gamma_test::GammaTest;
pub use twinkle::Twinkle;
pub use uniform_drift::UniformDrift;

use crate::color::{Hsv, Rgb, hsv_to_rgb};

pub trait Animation {
    /// Name used in switch requests and status reports
    fn name(&self) -> &str;

    /// Whether the animation takes part in the rotation
    fn enabled(&self) -> bool {
        true
    }

    /// Render the frame for `now`
    ///
    /// `first_frame` is set on the first frame after the scheduler activated
    /// the animation; implementations restart their sequence then. `frame` is
    /// cleared to black before the call.
    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]);
}

/// Uniform random number in `0.0..1.0`
#[allow(clippy::cast_precision_loss)]
pub fn random_unit<R: RngCore>(rng: &mut R) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform random number in `0..bound`, or 0 for an empty range
#[allow(clippy::cast_possible_truncation)]
pub fn random_below<R: RngCore>(rng: &mut R, bound: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    (u64::from(rng.next_u32()) % bound as u64) as usize
}

/// Fully saturated color with random hue and a random, never fully dark value
#[allow(clippy::cast_possible_truncation)]
pub fn random_color<R: RngCore>(rng: &mut R) -> Rgb {
    let hue = random_below(rng, 360) as u16;
    let val = 5 + random_below(rng, 96) as u8;
    hsv_to_rgb(Hsv::new(hue, 100, val))
}

/// Progress of a running blend in `0.0..=1.0`
#[allow(clippy::cast_precision_loss)]
pub(crate) fn blend_progress(now: Instant, start: Instant, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start).as_millis();
    elapsed as f32 / duration_ms as f32
}

//! Frame pacing for the animation context
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
use rand_core::RngCore;

use crate::OutputDriver;
use crate::config::DEFAULT_FRAME_RATE;
use crate::heartbeat::{FeedOutcome, HeartbeatMonitor, Watchdog};
use crate::lock::ContextIdentity;
use crate::pixels::PixelResource;
use crate::scheduler::AnimationScheduler;

/// Default frame duration based on the default frame rate (25 FPS).
pub const DEFAULT_FRAME_DURATION: Duration =
    Duration::from_millis(1000 / DEFAULT_FRAME_RATE as u64);

/// Heartbeat name of the animation context
pub const ANIMATION_CONTEXT: &str = "anim";

/// Result of a frame tick operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Heartbeat decision taken at the start of the frame.
    pub heartbeat: FeedOutcome,
}

/// Body of the animation loop.
///
/// Each tick feeds the heartbeat, runs the animation scheduler against the
/// pixel resource and returns how long to sleep.
///
/// # Usage
///
/// ```ignore
/// let mut frames = FrameScheduler::new(scheduler, &pixels, &heartbeat);
///
/// loop {
///     let result = frames.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<'a, R, I, O, W, const N: usize> {
    scheduler: AnimationScheduler<'a, R, N>,
    pixels: &'a PixelResource<I, O, N>,
    heartbeat: &'a HeartbeatMonitor<W>,
    context: &'a str,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, R, I, O, W, const N: usize> FrameScheduler<'a, R, I, O, W, N>
where
    R: RngCore,
    I: ContextIdentity,
    O: OutputDriver,
    W: Watchdog,
{
    /// Create a frame scheduler running at [`DEFAULT_FRAME_DURATION`].
    pub fn new(
        scheduler: AnimationScheduler<'a, R, N>,
        pixels: &'a PixelResource<I, O, N>,
        heartbeat: &'a HeartbeatMonitor<W>,
    ) -> Self {
        Self::with_frame_duration(scheduler, pixels, heartbeat, DEFAULT_FRAME_DURATION)
    }

    /// Create a frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        scheduler: AnimationScheduler<'a, R, N>,
        pixels: &'a PixelResource<I, O, N>,
        heartbeat: &'a HeartbeatMonitor<W>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            scheduler,
            pixels,
            heartbeat,
            context: ANIMATION_CONTEXT,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Feed the heartbeat under `context` instead of [`ANIMATION_CONTEXT`]
    #[must_use]
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = context;
        self
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let heartbeat = self.heartbeat.feed(self.context, now);

        // Skip the backlog after a stall instead of rendering a catch-up burst
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.scheduler.tick(now, self.pixels);

        self.next_frame += self.frame_duration;
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            heartbeat,
        }
    }

    pub const fn scheduler(&self) -> &AnimationScheduler<'a, R, N> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler<'a, R, N> {
        &mut self.scheduler
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

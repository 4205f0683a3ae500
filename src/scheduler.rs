use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand_core::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::animation::Animation;
use crate::color::{BLACK, Rgb, blend_frames, scale_frame};
use crate::config::MAX_ANIMATIONS;
use crate::control::{
    AnimationCatalog, AnimationControl, AnimationName, SchedulerState, SchedulerStatus,
    SwitchRequest, animation_name,
};
use crate::lock::ContextIdentity;
use crate::pixels::PixelResource;
use crate::pool::AnimationPool;

/// Default time an animation stays active before the next one fades in
pub const DEFAULT_SWITCH_INTERVAL: Duration = Duration::from_millis(30_000);

/// Default cross-fade duration
pub const DEFAULT_BLEND_DURATION: Duration = Duration::from_millis(5_000);

/// Default global dimmer applied to every frame
pub const DEFAULT_DIMMER: f32 = 0.2;

/// Configuration for animation switching
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Time after activation before the next animation is faded in
    pub switch_interval: Duration,
    /// Duration of the cross-fade
    pub blend_duration: Duration,
    /// Scale factor applied to every channel of the output
    pub dimmer: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            switch_interval: DEFAULT_SWITCH_INTERVAL,
            blend_duration: DEFAULT_BLEND_DURATION,
            dimmer: DEFAULT_DIMMER,
        }
    }
}

/// Reasons an explicit switch request is not honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchError {
    /// No animation is enabled
    NoAnimations,
    /// No enabled animation has the requested name
    UnknownAnimation,
    /// A random switch needs at least two animations
    NoAlternative,
}

#[derive(Debug, Clone, Copy)]
struct Activation {
    index: usize,
    /// Time of the first rendered frame
    since: Instant,
    first_frame: bool,
}

impl Activation {
    const fn new(index: usize, now: Instant) -> Self {
        Self {
            index,
            since: now,
            first_frame: true,
        }
    }
}

/// Animation scheduler - picks, runs and cross-fades animations
///
/// Call [`AnimationScheduler::tick`] once per frame from the animation task.
pub struct AnimationScheduler<'a, R, const N: usize> {
    // External dependencies and configuration
    animations: Vec<&'a mut dyn Animation, MAX_ANIMATIONS>,
    control: &'a AnimationControl,
    config: SchedulerConfig,
    rng: R,

    // Internal state
    pool: AnimationPool,
    active: Option<Activation>,
    next: Option<Activation>,
    status_dirty: bool,
    frame: [Rgb; N],
    next_frame: [Rgb; N],
}

impl<'a, R: RngCore, const N: usize> AnimationScheduler<'a, R, N> {
    /// Create a scheduler over the enabled animations
    ///
    /// Disabled animations are dropped, as are animations beyond
    /// [`MAX_ANIMATIONS`]. The first animation is picked at random.
    pub fn new<A>(
        animations: A,
        control: &'a AnimationControl,
        config: SchedulerConfig,
        mut rng: R,
    ) -> Self
    where
        A: IntoIterator<Item = &'a mut dyn Animation>,
    {
        let mut enabled: Vec<&'a mut dyn Animation, MAX_ANIMATIONS> = Vec::new();
        let mut catalog = AnimationCatalog::new();
        for animation in animations {
            if !animation.enabled() {
                continue;
            }
            let name = animation_name(animation.name());
            if enabled.push(animation).is_err() {
                #[cfg(feature = "esp32-log")]
                println!("[AnimationScheduler.new] pool full, skipping {}", name);
                continue;
            }
            let _ = catalog.push(name);
        }

        #[cfg(feature = "esp32-log")]
        if catalog.is_empty() {
            println!("[AnimationScheduler.new] no animations available");
        } else {
            println!("[AnimationScheduler.new] available animations: {:?}", catalog);
        }
        control.publish_catalog(catalog);

        let mut pool = AnimationPool::new(enabled.len());
        let active = pool
            .draw(None, &mut rng)
            .map(|index| Activation::new(index, Instant::from_millis(0)));

        let scheduler = Self {
            animations: enabled,
            control,
            config,
            rng,
            pool,
            active,
            next: None,
            status_dirty: true,
            frame: [BLACK; N],
            next_frame: [BLACK; N],
        };

        #[cfg(feature = "esp32-log")]
        if let Some(name) = scheduler.active_name() {
            let kind = if scheduler.animations.len() > 1 { "first" } else { "active" };
            println!("[AnimationScheduler.new] {} animation: {}", kind, name);
        }

        scheduler
    }

    /// Process one frame
    ///
    /// Honours a pending switch request, renders the frame and writes it to
    /// `pixels` unless manual control is engaged. Returns the rendered frame.
    pub fn tick<I, O>(&mut self, now: Instant, pixels: &PixelResource<I, O, N>) -> &[Rgb; N]
    where
        I: ContextIdentity,
        O: OutputDriver,
    {
        if let Some(request) = self.control.take_request() {
            match self.switch(&request, now) {
                Ok(_) => pixels.set_manual_control(false),
                Err(_error) => {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[AnimationScheduler.tick] cannot honour {:?}: {:?}",
                        request, _error
                    );
                }
            }
        }

        // Rendering runs unlocked; the flag is checked again by `write_frame`
        let manual = pixels.manual_control();
        self.render(now, manual);
        if !manual && !pixels.write_frame(&self.frame) {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationScheduler.tick] manual control engaged, frame dropped");
        }

        self.publish_status();
        &self.frame
    }

    /// Switch immediately, without a cross-fade
    ///
    /// Cancels a running cross-fade. Manual control is left alone; requests
    /// that arrive through [`AnimationControl`] release it in [`Self::tick`].
    /// Returns the index of the newly active animation.
    pub fn switch(&mut self, request: &SwitchRequest, now: Instant) -> Result<usize, SwitchError> {
        if self.animations.is_empty() {
            return Err(SwitchError::NoAnimations);
        }

        let index = match request {
            SwitchRequest::Random => {
                if self.animations.len() < 2 {
                    return Err(SwitchError::NoAlternative);
                }
                let active = self.active.map(|active| active.index);
                self.pool
                    .draw(active, &mut self.rng)
                    .ok_or(SwitchError::NoAlternative)?
            }
            SwitchRequest::Named(name) => {
                let index = self
                    .position(name)
                    .ok_or(SwitchError::UnknownAnimation)?;
                self.pool.mark_used(index);
                index
            }
        };

        self.active = Some(Activation::new(index, now));
        self.next = None;
        self.status_dirty = true;

        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationScheduler.switch] switching to {}requested {}",
            if matches!(request, SwitchRequest::Random) { "random " } else { "" },
            self.animations[index].name()
        );

        Ok(index)
    }

    /// Render the frame for `now` into the internal buffer
    fn render(&mut self, now: Instant, manual: bool) {
        self.frame = [BLACK; N];
        let Some(mut active) = self.active else {
            return;
        };

        if active.first_frame {
            active.since = now;
        }
        self.animations[active.index].update(now, active.first_frame, &mut self.frame);
        active.first_frame = false;

        if let Some(mut next) = self.next {
            if next.first_frame {
                next.since = now;
            }
            self.next_frame = [BLACK; N];
            self.animations[next.index].update(now, next.first_frame, &mut self.next_frame);
            next.first_frame = false;

            let elapsed = now.saturating_duration_since(next.since);
            if elapsed >= self.config.blend_duration {
                // Fade complete, the next animation takes over at full weight
                active = Activation {
                    index: next.index,
                    since: now,
                    first_frame: false,
                };
                self.frame = self.next_frame;
                self.next = None;
                self.status_dirty = true;

                #[cfg(feature = "esp32-log")]
                println!(
                    "[AnimationScheduler.render] now running {}",
                    self.animations[active.index].name()
                );
            } else {
                let progress = blend_progress(elapsed, self.config.blend_duration);
                let from = self.frame;
                blend_frames(&from, &self.next_frame, progress, &mut self.frame);
                self.next = Some(next);
            }
        } else if self.animations.len() >= 2
            && !manual
            && now.saturating_duration_since(active.since) >= self.config.switch_interval
        {
            self.begin_transition(active.index, now);
        }

        self.active = Some(active);
        scale_frame(&mut self.frame, self.config.dimmer);
    }

    /// Pick the next animation and start fading it in on the next frame
    fn begin_transition(&mut self, active: usize, now: Instant) {
        let Some(index) = self.pool.draw(Some(active), &mut self.rng) else {
            return;
        };
        self.next = Some(Activation::new(index, now));
        self.status_dirty = true;

        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationScheduler.render] next animation: {}",
            self.animations[index].name()
        );
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.animations
            .iter()
            .position(|animation| animation.name().eq_ignore_ascii_case(name))
    }

    fn publish_status(&mut self) {
        if self.status_dirty {
            self.control.publish_status(self.status());
            self.status_dirty = false;
        }
    }

    /// Current state of the scheduler
    pub fn state(&self) -> SchedulerState {
        match self.animations.len() {
            0 => SchedulerState::Idle,
            1 => SchedulerState::Single,
            _ if self.next.is_some() => SchedulerState::Blending,
            _ => SchedulerState::Steady,
        }
    }

    /// Snapshot for status reporting
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            state: self.state(),
            active: self.active.map(|active| self.name_of(active.index)),
            next: self.next.map(|next| self.name_of(next.index)),
        }
    }

    fn name_of(&self, index: usize) -> AnimationName {
        animation_name(self.animations[index].name())
    }

    /// Name of the active animation
    pub fn active_name(&self) -> Option<&str> {
        self.active
            .map(|active| self.animations[active.index].name())
    }

    /// Name of the animation being faded in
    pub fn next_name(&self) -> Option<&str> {
        self.next.map(|next| self.animations[next.index].name())
    }

    /// Whether a cross-fade is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.next.is_some()
    }

    /// Number of enabled animations
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Draw-without-replacement bookkeeping
    pub const fn pool(&self) -> &AnimationPool {
        &self.pool
    }

    /// Last rendered frame, after dimming
    pub const fn frame(&self) -> &[Rgb; N] {
        &self.frame
    }

    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

#[allow(clippy::cast_precision_loss)]
fn blend_progress(elapsed: Duration, duration: Duration) -> f32 {
    let duration_ms = duration.as_millis();
    if duration_ms == 0 {
        return 1.0;
    }
    elapsed.as_millis() as f32 / duration_ms as f32
}

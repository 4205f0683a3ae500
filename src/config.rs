//! Engine configuration
//!
//! Defaults match the reference door sign: 25 frames per second, a new
//! animation every 30 seconds with a 5 second cross-fade, output dimmed to
//! 20 %, and a 5 second heartbeat threshold under an 8 second hardware
//! watchdog.

use embassy_time::Duration;

use crate::gamma::{DEFAULT_GAMMA, GammaTable};
use crate::heartbeat::HeartbeatConfig;
use crate::scheduler::SchedulerConfig;

/// Maximum number of animations the scheduler keeps
pub const MAX_ANIMATIONS: usize = 16;

/// Maximum length of an animation name in bytes
pub const MAX_NAME_LEN: usize = 24;

/// Maximum number of contexts feeding the heartbeat monitor
pub const MAX_CONTEXTS: usize = 8;

/// Maximum length of a context name in bytes
pub const MAX_CONTEXT_NAME_LEN: usize = 16;

/// Default animation frame rate
pub const DEFAULT_FRAME_RATE: u32 = 25;

/// Complete engine configuration
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Animation frames per second
    pub frame_rate: u32,
    /// Gamma applied to every channel before it reaches the LEDs
    pub gamma: f32,
    pub scheduler: SchedulerConfig,
    pub heartbeat: HeartbeatConfig,
}

impl EngineConfig {
    /// Time budget of one animation frame
    pub const fn frame_duration(&self) -> Duration {
        let frame_rate = if self.frame_rate == 0 {
            1
        } else {
            self.frame_rate
        };
        Duration::from_millis(1000 / frame_rate as u64)
    }

    /// Gamma table for [`crate::PixelResource::new`]
    pub fn gamma_table(&self) -> GammaTable {
        GammaTable::new(self.gamma)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            gamma: DEFAULT_GAMMA,
            scheduler: SchedulerConfig::default(),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

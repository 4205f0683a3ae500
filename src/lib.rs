#![no_std]

pub mod animation;
pub mod color;
pub mod config;
pub mod control;
pub mod frame_scheduler;
pub mod gamma;
pub mod heartbeat;
pub mod lock;
pub mod output;
pub mod pixels;
pub mod pool;
pub mod scheduler;

pub use animation::Animation;
pub use config::EngineConfig;
pub use control::{AnimationControl, SchedulerState, SchedulerStatus, SwitchRequest};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use gamma::GammaTable;
pub use heartbeat::{FeedOutcome, HeartbeatConfig, HeartbeatMonitor, Watchdog};
pub use lock::{ContextId, ContextIdentity, ReentrantLock};
pub use output::SmartLedsOutput;
pub use pixels::{PixelError, PixelResource, PixelTransaction};
pub use scheduler::{AnimationScheduler, SchedulerConfig, SwitchError};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The pixel resource is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

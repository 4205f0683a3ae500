//! Heartbeat monitor
//!
//! Every cooperating context feeds the monitor once per loop iteration. The
//! hardware watchdog is only fed while every context that ever fed is fresh,
//! so a single stalled task ends in a hardware reset.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use heapless::{LinearMap, String};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::{MAX_CONTEXT_NAME_LEN, MAX_CONTEXTS};
use crate::control::truncated;

/// Default age after which a context counts as stalled
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_millis(5_000);

/// Context name, truncated to [`MAX_CONTEXT_NAME_LEN`] bytes
pub type ContextName = String<MAX_CONTEXT_NAME_LEN>;

/// Hardware watchdog that can be fed
pub trait Watchdog {
    fn feed(&mut self);
}

#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Must stay below the hardware watchdog timeout and above the slowest
    /// legitimate loop period of any context
    pub stale_after: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

/// Decision taken by [`HeartbeatMonitor::feed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// All contexts are fresh, the watchdog was fed
    Fed,
    /// A context is stale, the watchdog was not fed
    Withheld,
    /// First detection of a stale context; the watchdog was not fed
    TimedOut(ContextName),
}

impl FeedOutcome {
    /// Whether the hardware watchdog was fed
    pub const fn is_fed(&self) -> bool {
        matches!(self, Self::Fed)
    }
}

struct HeartbeatTable<W> {
    last_feed: LinearMap<ContextName, Instant, MAX_CONTEXTS>,
    watchdog: Option<W>,
    timed_out: bool,
    /// A context could not be registered; its liveness is unknown
    overflowed: bool,
}

impl<W> HeartbeatTable<W> {
    fn stale(&self, now: Instant, stale_after: Duration) -> Option<&ContextName> {
        self.last_feed
            .iter()
            .find(|(_, last)| now.saturating_duration_since(**last) > stale_after)
            .map(|(name, _)| name)
    }
}

/// Aggregates per-context heartbeats into one watchdog feed
pub struct HeartbeatMonitor<W> {
    config: HeartbeatConfig,
    table: Mutex<RefCell<HeartbeatTable<W>>>,
}

impl<W: Watchdog> HeartbeatMonitor<W> {
    /// Create a monitor without a hardware watchdog
    ///
    /// Decisions are still computed and reported until one is enabled.
    pub const fn new(config: HeartbeatConfig) -> Self {
        Self {
            config,
            table: Mutex::new(RefCell::new(HeartbeatTable {
                last_feed: LinearMap::new(),
                watchdog: None,
                timed_out: false,
                overflowed: false,
            })),
        }
    }

    /// Start feeding `watchdog`, replacing any previous one
    pub fn enable_watchdog(&self, watchdog: W) {
        #[cfg(feature = "esp32-log")]
        println!("[HeartbeatMonitor] enabling hardware watchdog");

        critical_section::with(|cs| {
            self.table.borrow(cs).borrow_mut().watchdog = Some(watchdog);
        });
    }

    /// Record a heartbeat of `context` and feed the watchdog if all are fresh
    ///
    /// Once a context cannot be registered because [`MAX_CONTEXTS`] are
    /// already known, every later feed is withheld.
    pub fn feed(&self, context: &str, now: Instant) -> FeedOutcome {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            let name = context_name(context);
            if table.last_feed.insert(name, now).is_err() {
                #[cfg(feature = "esp32-log")]
                println!("[HeartbeatMonitor] table full, cannot monitor {}", context);

                table.overflowed = true;
            }
            if table.overflowed {
                return FeedOutcome::Withheld;
            }

            if let Some(stale) = table.stale(now, self.config.stale_after) {
                if table.timed_out {
                    return FeedOutcome::Withheld;
                }
                let stale = stale.clone();

                #[cfg(feature = "esp32-log")]
                println!("[HeartbeatMonitor] watchdog timeout on [{}]", stale);

                table.timed_out = true;
                return FeedOutcome::TimedOut(stale);
            }

            if let Some(watchdog) = table.watchdog.as_mut() {
                watchdog.feed();
            }
            FeedOutcome::Fed
        })
    }

    /// [`Self::feed`] at the current time
    pub fn feed_now(&self, context: &str) -> FeedOutcome {
        self.feed(context, Instant::now())
    }

    /// Whether a feed at `now` would reach the watchdog
    ///
    /// Does not record a heartbeat.
    pub fn should_feed(&self, now: Instant) -> bool {
        critical_section::with(|cs| {
            let table = self.table.borrow(cs).borrow();
            !table.overflowed && table.stale(now, self.config.stale_after).is_none()
        })
    }

    /// Whether a stale context has ever been detected
    pub fn timed_out(&self) -> bool {
        critical_section::with(|cs| self.table.borrow(cs).borrow().timed_out)
    }

    /// Number of contexts that have fed at least once
    pub fn contexts(&self) -> usize {
        critical_section::with(|cs| self.table.borrow(cs).borrow().last_feed.len())
    }

    /// Time since `context` last fed
    pub fn age(&self, context: &str, now: Instant) -> Option<Duration> {
        let name = context_name(context);
        critical_section::with(|cs| {
            let table = self.table.borrow(cs).borrow();
            table
                .last_feed
                .get(&name)
                .map(|last| now.saturating_duration_since(*last))
        })
    }

    pub const fn config(&self) -> &HeartbeatConfig {
        &self.config
    }
}

fn context_name(context: &str) -> ContextName {
    truncated(context)
}

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use doorsign_engine::color::Rgb;
use doorsign_engine::{Animation, ContextId, ContextIdentity, Instant, OutputDriver, Watchdog};

/// Every test thread is its own execution context
pub struct ThreadContext;

static NEXT_CONTEXT: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static CONTEXT: ContextId = ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed));
}

// SAFETY: every thread gets a fresh id from a global counter.
unsafe impl ContextIdentity for ThreadContext {
    fn current() -> ContextId {
        CONTEXT.with(|id| *id)
    }
}

/// Output driver that keeps every flushed frame
#[derive(Clone, Default)]
pub struct RecordingDriver {
    frames: Arc<Mutex<Vec<Vec<Rgb>>>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flushes(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn frames(&self) -> Vec<Vec<Rgb>> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Vec<Rgb>> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) {
        self.frames.lock().unwrap().push(colors.to_vec());
    }
}

/// Watchdog counting its feeds
#[derive(Clone, Default)]
pub struct CountingWatchdog {
    feeds: Arc<AtomicU32>,
}

impl CountingWatchdog {
    pub fn feeds(&self) -> u32 {
        self.feeds.load(Ordering::Relaxed)
    }
}

impl Watchdog for CountingWatchdog {
    fn feed(&mut self) {
        self.feeds.fetch_add(1, Ordering::Relaxed);
    }
}

/// One `update` call as seen by a [`SolidAnimation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub at: u64,
    pub first_frame: bool,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Animation painting every pixel in one color and logging its calls
pub struct SolidAnimation {
    name: &'static str,
    color: Rgb,
    enabled: bool,
    calls: CallLog,
}

impl SolidAnimation {
    pub fn new(name: &'static str, color: Rgb) -> Self {
        Self {
            name,
            color,
            enabled: true,
            calls: CallLog::default(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }
}

impl Animation for SolidAnimation {
    fn name(&self) -> &str {
        self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, now: Instant, first_frame: bool, frame: &mut [Rgb]) {
        self.calls.borrow_mut().push(Call {
            at: now.as_millis(),
            first_frame,
        });
        frame.fill(self.color);
    }
}

pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

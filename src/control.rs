//! State shared between the control task and the animation task
//!
//! The control task posts switch requests and reads status snapshots; the
//! animation task takes requests and publishes snapshots. Every access is a
//! short critical section on a single slot, so a request posted while a frame
//! is being rendered is picked up at the start of the next frame.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{String, Vec};

use crate::config::{MAX_ANIMATIONS, MAX_NAME_LEN};

/// Animation name, truncated to [`MAX_NAME_LEN`] bytes
pub type AnimationName = String<MAX_NAME_LEN>;

/// Names of all enabled animations
pub type AnimationCatalog = Vec<AnimationName, MAX_ANIMATIONS>;

/// Build an [`AnimationName`], truncating at a character boundary
pub fn animation_name(name: &str) -> AnimationName {
    truncated(name)
}

pub(crate) fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut result = String::new();
    for c in text.chars() {
        if result.push(c).is_err() {
            break;
        }
    }
    result
}

/// Request to leave the current animation immediately
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchRequest {
    /// Switch to the animation with this name (case-insensitive)
    Named(AnimationName),
    /// Switch to any other animation
    Random,
}

impl SwitchRequest {
    /// Parse a request as sent by the control task
    ///
    /// An empty name asks for a random animation.
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() {
            Self::Random
        } else {
            Self::Named(animation_name(name))
        }
    }
}

/// Scheduler state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// No enabled animations, output is black
    Idle,
    /// Exactly one animation, never transitions
    Single,
    /// One active animation
    Steady,
    /// Cross-fading from the active animation to the next
    Blending,
}

/// Read-only snapshot of the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub active: Option<AnimationName>,
    pub next: Option<AnimationName>,
}

impl SchedulerStatus {
    pub const IDLE: Self = Self {
        state: SchedulerState::Idle,
        active: None,
        next: None,
    };

    /// Whether a cross-fade is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.next.is_some()
    }
}

/// Shared request slot and status board
pub struct AnimationControl {
    request: Mutex<RefCell<Option<SwitchRequest>>>,
    status: Mutex<RefCell<SchedulerStatus>>,
    catalog: Mutex<RefCell<AnimationCatalog>>,
}

impl AnimationControl {
    pub const fn new() -> Self {
        Self {
            request: Mutex::new(RefCell::new(None)),
            status: Mutex::new(RefCell::new(SchedulerStatus::IDLE)),
            catalog: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Post a switch request, replacing any request not yet taken
    ///
    /// Returns the replaced request.
    pub fn post(&self, request: SwitchRequest) -> Option<SwitchRequest> {
        critical_section::with(|cs| self.request.borrow(cs).borrow_mut().replace(request))
    }

    /// Request a switch by name; an empty name requests a random animation
    pub fn request_animation(&self, name: &str) -> Option<SwitchRequest> {
        self.post(SwitchRequest::from_name(name))
    }

    /// Request a switch to any other animation
    pub fn request_random(&self) -> Option<SwitchRequest> {
        self.post(SwitchRequest::Random)
    }

    /// Take the pending request, leaving the slot empty
    pub fn take_request(&self) -> Option<SwitchRequest> {
        critical_section::with(|cs| self.request.borrow(cs).borrow_mut().take())
    }

    /// Whether a request is waiting
    pub fn has_pending_request(&self) -> bool {
        critical_section::with(|cs| self.request.borrow(cs).borrow().is_some())
    }

    /// Latest scheduler snapshot
    pub fn status(&self) -> SchedulerStatus {
        critical_section::with(|cs| self.status.borrow(cs).borrow().clone())
    }

    /// Names of the enabled animations
    pub fn animations(&self) -> AnimationCatalog {
        critical_section::with(|cs| self.catalog.borrow(cs).borrow().clone())
    }

    pub(crate) fn publish_status(&self, status: SchedulerStatus) {
        critical_section::with(|cs| *self.status.borrow(cs).borrow_mut() = status);
    }

    pub(crate) fn publish_catalog(&self, catalog: AnimationCatalog) {
        critical_section::with(|cs| *self.catalog.borrow(cs).borrow_mut() = catalog);
    }
}

impl Default for AnimationControl {
    fn default() -> Self {
        Self::new()
    }
}

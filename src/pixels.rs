//! Shared pixel buffer
//!
//! The only path to the LED hardware. Writers open an update transaction with
//! [`PixelResource::begin_update`]; transactions nest freely within one
//! context and the hardware is written once, when the outermost transaction
//! ends. Other contexts block until then, so they always see a complete frame.

use core::cell::RefCell;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::gamma::GammaTable;
use crate::lock::{ContextIdentity, ReentrantLock, ReentrantLockGuard};

/// Error returned for pixel writes outside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelError {
    IndexOutOfRange { index: usize, len: usize },
}

struct PixelState<O, const N: usize> {
    /// Colors as set, for read-back
    raw: [Rgb; N],
    /// Gamma-corrected colors staged for the next flush
    staged: [Rgb; N],
    driver: O,
    manual_control: bool,
}

impl<O: OutputDriver, const N: usize> PixelState<O, N> {
    fn flush(&mut self) {
        self.driver.write(&self.staged);
    }
}

/// Owner of the LED buffer, the gamma table and the output driver
pub struct PixelResource<I, O, const N: usize> {
    gamma: GammaTable,
    state: ReentrantLock<I, RefCell<PixelState<O, N>>>,
}

impl<I: ContextIdentity, O: OutputDriver, const N: usize> PixelResource<I, O, N> {
    /// Create a resource with all pixels off
    ///
    /// Nothing is written to the hardware until the first transaction ends.
    pub fn new(driver: O, gamma: GammaTable) -> Self {
        Self {
            gamma,
            state: ReentrantLock::new(RefCell::new(PixelState {
                raw: [BLACK; N],
                staged: [BLACK; N],
                driver,
                manual_control: false,
            })),
        }
    }

    /// Number of pixels
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Open an update transaction
    ///
    /// Blocks while another context has one open. Dropping the returned
    /// transaction ends it.
    pub fn begin_update(&self) -> PixelTransaction<'_, I, O, N> {
        PixelTransaction {
            guard: self.state.lock(),
        }
    }

    /// End an update transaction; same as dropping it
    pub fn end_update(&self, transaction: PixelTransaction<'_, I, O, N>) {
        drop(transaction);
    }

    /// Set a single pixel
    ///
    /// Stores the raw color for read-back and stages the gamma-corrected one.
    pub fn set_pixel(&self, index: usize, color: Rgb) -> Result<(), PixelError> {
        if index >= N {
            return Err(PixelError::IndexOutOfRange { index, len: N });
        }
        let transaction = self.begin_update();
        let mut state = transaction.guard.borrow_mut();
        state.raw[index] = color;
        state.staged[index] = self.gamma.correct_rgb(color);
        Ok(())
    }

    /// Set all pixels in one transaction
    pub fn set_pixels(&self, colors: &[Rgb; N]) {
        let transaction = self.begin_update();
        for (index, color) in colors.iter().enumerate() {
            // Index is always in range here
            let _ = self.set_pixel(index, *color);
        }
        drop(transaction);
    }

    /// Write an animation frame unless manual control is engaged
    ///
    /// The flag is checked inside the transaction that writes the frame, so a
    /// context engaging manual control can never be overwritten by a frame
    /// rendered before it did. Returns whether the frame was written.
    pub fn write_frame(&self, colors: &[Rgb; N]) -> bool {
        let guard = self.state.lock();
        let manual = guard.borrow().manual_control;
        if manual {
            return false;
        }
        let transaction = PixelTransaction { guard };
        self.set_pixels(colors);
        drop(transaction);
        true
    }

    /// Turn all pixels off
    pub fn off(&self) {
        self.set_pixels(&[BLACK; N]);
    }

    /// Last raw color set for `index`
    pub fn get_pixel(&self, index: usize) -> Option<Rgb> {
        let guard = self.state.lock();
        let pixel = guard.borrow().raw.get(index).copied();
        pixel
    }

    /// Copy of all raw colors
    pub fn get_pixels(&self) -> [Rgb; N] {
        let guard = self.state.lock();
        let pixels = guard.borrow().raw;
        pixels
    }

    /// Engage or release manual control
    ///
    /// While engaged the animation scheduler keeps running but does not
    /// write its frames.
    pub fn set_manual_control(&self, manual: bool) {
        let guard = self.state.lock();
        guard.borrow_mut().manual_control = manual;
    }

    /// Whether manual control is engaged
    pub fn manual_control(&self) -> bool {
        let guard = self.state.lock();
        let manual = guard.borrow().manual_control;
        manual
    }

    /// Whether any context has the buffer locked
    pub fn is_locked(&self) -> bool {
        self.state.locked()
    }

    /// Gamma table applied to outgoing colors
    pub const fn gamma(&self) -> &GammaTable {
        &self.gamma
    }
}

/// Open update transaction on a [`PixelResource`]
///
/// The hardware is flushed when the outermost transaction of the owning
/// context is dropped.
pub struct PixelTransaction<'a, I: ContextIdentity, O: OutputDriver, const N: usize> {
    guard: ReentrantLockGuard<'a, I, RefCell<PixelState<O, N>>>,
}

impl<I: ContextIdentity, O: OutputDriver, const N: usize> PixelTransaction<'_, I, O, N> {
    /// Nesting depth of the owning context, including this transaction
    pub fn depth(&self) -> usize {
        self.guard.depth()
    }

    /// End the transaction
    pub fn end(self) {}
}

impl<I: ContextIdentity, O: OutputDriver, const N: usize> Drop for PixelTransaction<'_, I, O, N> {
    fn drop(&mut self) {
        if self.guard.depth() == 1 {
            self.guard.borrow_mut().flush();
        }
    }
}

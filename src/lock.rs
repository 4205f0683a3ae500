//! Reentrant lock shared between execution contexts
//!
//! The owning context may acquire the lock any number of times; every other
//! context blocks until the outermost release. The lock is built from three
//! exclusive sections:
//! - a short bookkeeping section guarding owner and depth,
//! - a hand-off section held by the single context waiting to become owner,
//! - the real lock.
//!
//! Each section is a spin flag whose test-and-set runs inside a
//! `critical-section`, which keeps the lock usable on cores without
//! compare-and-swap atomics.

use core::cell::Cell;
use core::hint::spin_loop;
use core::marker::PhantomData;
use core::ops::Deref;

use critical_section::Mutex;

/// Identity of an execution context (a core, a thread)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u32);

/// Reports which execution context is currently running.
///
/// On a dual-core MCU this is usually the core number, on a host the thread.
///
/// # Safety
///
/// Two contexts that run at the same time must never report the same id.
/// The lock hands out shared access to its data based on this id alone.
pub unsafe trait ContextIdentity {
    /// Identity of the calling context
    fn current() -> ContextId;
}

/// Test-and-set flag used for every exclusive section of the lock
struct SpinFlag {
    held: Mutex<Cell<bool>>,
}

impl SpinFlag {
    const fn new() -> Self {
        Self {
            held: Mutex::new(Cell::new(false)),
        }
    }

    fn try_acquire(&self) -> bool {
        critical_section::with(|cs| {
            let held = self.held.borrow(cs);
            if held.get() {
                false
            } else {
                held.set(true);
                true
            }
        })
    }

    fn acquire(&self) {
        while !self.try_acquire() {
            spin_loop();
        }
    }

    fn release(&self) {
        critical_section::with(|cs| self.held.borrow(cs).set(false));
    }
}

#[derive(Debug, Clone, Copy)]
struct Ownership {
    owner: Option<ContextId>,
    depth: usize,
}

impl Ownership {
    const UNLOCKED: Self = Self {
        owner: None,
        depth: 0,
    };
}

/// Reentrant lock without data
///
/// `acquire`/`release` must be balanced by the owning context. Releasing a
/// lock the caller does not hold panics.
pub struct RawReentrantLock<I> {
    bookkeeping: SpinFlag,
    handoff: SpinFlag,
    lock: SpinFlag,
    ownership: Mutex<Cell<Ownership>>,
    _identity: PhantomData<fn() -> I>,
}

impl<I: ContextIdentity> RawReentrantLock<I> {
    pub const fn new() -> Self {
        Self {
            bookkeeping: SpinFlag::new(),
            handoff: SpinFlag::new(),
            lock: SpinFlag::new(),
            ownership: Mutex::new(Cell::new(Ownership::UNLOCKED)),
            _identity: PhantomData,
        }
    }

    fn ownership(&self) -> Ownership {
        critical_section::with(|cs| self.ownership.borrow(cs).get())
    }

    fn set_ownership(&self, ownership: Ownership) {
        critical_section::with(|cs| self.ownership.borrow(cs).set(ownership));
    }

    /// Block until the calling context holds the lock
    ///
    /// Returns immediately if the caller already owns it.
    pub fn acquire(&self) {
        let me = I::current();
        loop {
            self.bookkeeping.acquire();
            let ownership = self.ownership();
            if ownership.owner == Some(me) {
                self.set_ownership(Ownership {
                    owner: Some(me),
                    depth: ownership.depth + 1,
                });
                self.bookkeeping.release();
                return;
            }
            // The hand-off must be ours before bookkeeping is let go, otherwise
            // a second waiter could slip in between.
            if self.handoff.try_acquire() {
                self.bookkeeping.release();
                break;
            }
            self.bookkeeping.release();
            spin_loop();
        }

        // Taking the real lock and recording the owner happen under one
        // bookkeeping section, so `locked` never sees a held lock without owner.
        loop {
            self.bookkeeping.acquire();
            if self.lock.try_acquire() {
                self.set_ownership(Ownership {
                    owner: Some(me),
                    depth: 1,
                });
                self.bookkeeping.release();
                break;
            }
            self.bookkeeping.release();
            spin_loop();
        }
        self.handoff.release();
    }

    /// Undo one `acquire` of the calling context
    ///
    /// The real lock is released when the depth reaches zero.
    pub fn release(&self) {
        let me = I::current();
        self.bookkeeping.acquire();
        let ownership = self.ownership();
        if ownership.owner != Some(me) || ownership.depth == 0 {
            self.bookkeeping.release();
            panic!("reentrant lock released by a context that does not hold it");
        }

        let depth = ownership.depth - 1;
        if depth == 0 {
            self.set_ownership(Ownership::UNLOCKED);
            self.lock.release();
        } else {
            self.set_ownership(Ownership {
                owner: Some(me),
                depth,
            });
        }
        self.bookkeeping.release();
    }

    /// Whether any context holds the lock
    pub fn locked(&self) -> bool {
        self.bookkeeping.acquire();
        let locked = self.ownership().owner.is_some();
        self.bookkeeping.release();
        locked
    }

    /// Whether the calling context holds the lock
    pub fn is_owned_by_caller(&self) -> bool {
        let me = I::current();
        self.bookkeeping.acquire();
        let mine = self.ownership().owner == Some(me);
        self.bookkeeping.release();
        mine
    }

    /// Number of unreleased acquisitions by the calling context
    ///
    /// # Panics
    ///
    /// Panics if the caller does not own the lock.
    pub fn depth(&self) -> usize {
        let me = I::current();
        self.bookkeeping.acquire();
        let ownership = self.ownership();
        self.bookkeeping.release();
        assert!(
            ownership.owner == Some(me),
            "lock depth queried by a context that does not hold it"
        );
        ownership.depth
    }
}

impl<I: ContextIdentity> Default for RawReentrantLock<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reentrant lock protecting a value
///
/// The guard only hands out `&T`; wrap the value in a `RefCell` for mutation.
pub struct ReentrantLock<I, T> {
    raw: RawReentrantLock<I>,
    data: T,
}

// SAFETY: `&T` is only reachable through a guard, and guards only exist in the
// context that owns the raw lock. `ContextIdentity` guarantees that context is
// unique, so `T` is never touched by two contexts at once.
unsafe impl<I, T: Send> Sync for ReentrantLock<I, T> {}

impl<I: ContextIdentity, T> ReentrantLock<I, T> {
    pub const fn new(data: T) -> Self {
        Self {
            raw: RawReentrantLock::new(),
            data,
        }
    }

    /// Acquire the lock, blocking while another context holds it
    pub fn lock(&self) -> ReentrantLockGuard<'_, I, T> {
        self.raw.acquire();
        ReentrantLockGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Whether any context holds the lock
    pub fn locked(&self) -> bool {
        self.raw.locked()
    }

    /// Whether the calling context holds the lock
    pub fn is_owned_by_caller(&self) -> bool {
        self.raw.is_owned_by_caller()
    }
}

/// Scoped acquisition of a [`ReentrantLock`]
///
/// Released when dropped. Not `Send`: it must be dropped by the context that
/// created it.
pub struct ReentrantLockGuard<'a, I: ContextIdentity, T> {
    lock: &'a ReentrantLock<I, T>,
    _not_send: PhantomData<*const ()>,
}

impl<I: ContextIdentity, T> ReentrantLockGuard<'_, I, T> {
    /// Nesting depth of the owning context, including this guard
    pub fn depth(&self) -> usize {
        self.lock.raw.depth()
    }
}

impl<I: ContextIdentity, T> Deref for ReentrantLockGuard<'_, I, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.lock.data
    }
}

impl<I: ContextIdentity, T> Drop for ReentrantLockGuard<'_, I, T> {
    fn drop(&mut self) {
        self.lock.raw.release();
    }
}

mod common;

mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use doorsign_engine::lock::RawReentrantLock;
    use doorsign_engine::ReentrantLock;

    use super::common::ThreadContext;

    #[test]
    fn test_same_context_counts_depth() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        assert!(!lock.locked());

        for expected in 1..=5 {
            lock.acquire();
            assert_eq!(lock.depth(), expected);
        }
        assert!(lock.is_owned_by_caller());

        for expected in (0..5).rev() {
            lock.release();
            if expected > 0 {
                assert_eq!(lock.depth(), expected);
            }
        }
        assert!(!lock.locked());
        assert!(!lock.is_owned_by_caller());
    }

    #[test]
    #[should_panic(expected = "does not hold it")]
    fn test_release_without_acquire_panics() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        lock.release();
    }

    #[test]
    #[should_panic(expected = "does not hold it")]
    fn test_release_more_than_acquired_panics() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        lock.acquire();
        lock.release();
        lock.release();
    }

    #[test]
    #[should_panic(expected = "does not hold it")]
    fn test_depth_by_non_owner_panics() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        lock.depth();
    }

    #[test]
    fn test_other_context_blocks_until_outermost_release() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        let acquired = AtomicBool::new(false);
        let (holding_tx, holding_rx) = mpsc::channel();

        thread::scope(|s| {
            s.spawn(|| {
                lock.acquire();
                lock.acquire();
                holding_tx.send(()).unwrap();

                thread::sleep(Duration::from_millis(50));
                lock.release();
                thread::sleep(Duration::from_millis(50));
                assert!(!acquired.load(Ordering::SeqCst));
                lock.release();
            });

            holding_rx.recv().unwrap();
            s.spawn(|| {
                assert!(!lock.is_owned_by_caller());
                lock.acquire();
                acquired.store(true, Ordering::SeqCst);
                assert_eq!(lock.depth(), 1);
                lock.release();
            });
        });

        assert!(acquired.load(Ordering::SeqCst));
        assert!(!lock.locked());
    }

    #[test]
    fn test_locked_seen_by_observer_after_handoff() {
        let lock = RawReentrantLock::<ThreadContext>::new();
        let (holding_tx, holding_rx) = mpsc::channel();
        let (checked_tx, checked_rx) = mpsc::channel::<()>();

        thread::scope(|s| {
            lock.acquire();
            let waiter = &lock;
            s.spawn(move || {
                // Waits on the hand-off until the main context lets go
                waiter.acquire();
                holding_tx.send(()).unwrap();
                checked_rx.recv().unwrap();
                waiter.release();
            });

            thread::sleep(Duration::from_millis(20));
            assert!(lock.locked());
            lock.release();

            holding_rx.recv().unwrap();
            s.spawn(|| {
                assert!(lock.locked());
                assert!(!lock.is_owned_by_caller());
                checked_tx.send(()).unwrap();
            });
        });

        assert!(!lock.locked());
    }

    #[test]
    fn test_three_contexts_all_get_the_lock() {
        let lock = ReentrantLock::<ThreadContext, _>::new(std::sync::Mutex::new(0u32));

        thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let outer = lock.lock();
                        let inner = lock.lock();
                        assert_eq!(inner.depth(), 2);
                        *inner.lock().unwrap() += 1;
                        drop(inner);
                        assert_eq!(outer.depth(), 1);
                    }
                });
            }
        });

        assert_eq!(*lock.lock().lock().unwrap(), 600);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = ReentrantLock::<ThreadContext, _>::new(7u8);
        {
            let guard = lock.lock();
            assert_eq!(*guard, 7);
            assert!(lock.locked());
        }
        assert!(!lock.locked());
    }
}

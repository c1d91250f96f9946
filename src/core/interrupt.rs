//! Cooperative thread interruption
//!
//! A producer blocked by backpressure abandons its event when its thread
//! has been interrupted. The flag is per thread and stays set after the
//! producer observes it, so later blocking code on the same thread can react
//! to it as well. While a producer waits, the queue registers a waker with
//! the flag so an interrupt ends the wait at once.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something an interrupt must wake, such as a condition a producer waits on
pub(crate) trait Wake: Send + Sync {
    fn wake(&self);
}

struct InterruptState {
    flag: AtomicBool,
    waker: Mutex<Option<Arc<dyn Wake>>>,
}

thread_local! {
    static STATE: Arc<InterruptState> = Arc::new(InterruptState {
        flag: AtomicBool::new(false),
        waker: Mutex::new(None),
    });
}

/// Handle to one thread's interrupt flag
#[derive(Clone)]
pub struct InterruptHandle {
    state: Arc<InterruptState>,
}

impl InterruptHandle {
    /// Handle for the calling thread
    pub fn current() -> Self {
        Self {
            state: STATE.with(Arc::clone),
        }
    }

    /// Request interruption of the thread this handle belongs to
    ///
    /// Wakes the thread if it is waiting for queue space.
    pub fn interrupt(&self) {
        self.state.flag.store(true, Ordering::SeqCst);
        let waker = self.state.waker.lock().clone();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

/// Registration of a waker for the calling thread; removed on drop
pub(crate) struct WakeRegistration {
    state: Arc<InterruptState>,
}

/// Have interrupts of the calling thread call `waker` until the returned
/// registration is dropped
///
/// Register before checking the flag, so an interrupt either is seen by
/// the check or finds the waker.
pub(crate) fn wake_on_interrupt(waker: Arc<dyn Wake>) -> WakeRegistration {
    let state = STATE.with(Arc::clone);
    *state.waker.lock() = Some(waker);
    WakeRegistration { state }
}

impl Drop for WakeRegistration {
    fn drop(&mut self) {
        *self.state.waker.lock() = None;
    }
}

/// Whether the calling thread has been interrupted; does not clear the flag
pub fn is_interrupted() -> bool {
    STATE.with(|state| state.flag.load(Ordering::SeqCst))
}

/// Clear the calling thread's interrupt flag, returning its previous value
pub fn clear() -> bool {
    STATE.with(|state| state.flag.swap(false, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_is_per_thread() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let worker = std::thread::spawn(move || {
            tx.send(InterruptHandle::current()).unwrap();
            while !is_interrupted() {
                std::thread::yield_now();
            }
            clear()
        });

        let handle = rx.recv().unwrap();
        assert!(!is_interrupted());
        handle.interrupt();

        assert!(worker.join().unwrap());
        assert!(!is_interrupted());
    }

    struct CountingWaker(std::sync::atomic::AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_interrupt_calls_registered_waker() {
        let waker = Arc::new(CountingWaker(std::sync::atomic::AtomicUsize::new(0)));
        let handle = InterruptHandle::current();

        {
            let _registration = wake_on_interrupt(waker.clone());
            handle.interrupt();
        }
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);

        // Unregistered once the registration is gone
        handle.interrupt();
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);
        assert!(clear());
    }

    #[test]
    fn test_clear_resets_flag() {
        InterruptHandle::current().interrupt();
        assert!(is_interrupted());
        assert!(clear());
        assert!(!is_interrupted());
        assert!(!clear());
    }
}

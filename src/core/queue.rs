//! Bounded event queue with backpressure signaling
//!
//! The queue itself is a bounded crossbeam channel. Producers that find it
//! full wait on a shared "drained" condition, which the drain worker signals
//! under the same lock after every dequeue and whenever the queue runs empty.

use super::interrupt::{self, Wake};
use super::log_event::LogEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

/// Why an event was not accepted
#[derive(Debug)]
pub enum EnqueueError {
    /// The queue is at capacity
    Full(LogEvent),
    /// The drain worker's end of the queue is gone
    Closed(LogEvent),
}

/// The lock/condition pair producers wait on for space
pub(crate) struct DrainSignal {
    lock: Mutex<()>,
    drained: Condvar,
}

impl Wake for DrainSignal {
    fn wake(&self) {
        let _guard = self.lock.lock();
        self.drained.notify_all();
    }
}

pub struct EventQueue {
    sender: Sender<LogEvent>,
    capacity: usize,
    signal: Arc<DrainSignal>,
}

impl EventQueue {
    /// Create a queue and the receiving end for its drain worker
    pub fn new(capacity: usize) -> (Self, Receiver<LogEvent>) {
        let (sender, receiver) = bounded(capacity);
        let queue = Self {
            sender,
            capacity,
            signal: Arc::new(DrainSignal {
                lock: Mutex::new(()),
                drained: Condvar::new(),
            }),
        };
        (queue, receiver)
    }

    /// Enqueue without blocking
    pub fn try_enqueue(&self, event: LogEvent) -> Result<(), EnqueueError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(event) => EnqueueError::Full(event),
            TrySendError::Disconnected(event) => EnqueueError::Closed(event),
        })
    }

    /// Enqueue, waiting at most `slice` for the drained signal when full
    ///
    /// The retry after the wait happens once; callers loop and account the
    /// elapsed time themselves. The full check and the wait happen under the
    /// signaling lock, so a dequeue between them cannot be missed. An
    /// interrupted caller gets the event back as `Full` without a retry.
    /// Callers hold a `wake_on_interrupt` registration for `signal()` so the
    /// interrupt also ends the wait.
    pub fn enqueue_or_wait(&self, event: LogEvent, slice: Duration) -> Result<(), EnqueueError> {
        let mut guard = self.signal.lock.lock();
        match self.try_enqueue(event) {
            Err(EnqueueError::Full(event)) => {
                if interrupt::is_interrupted() {
                    return Err(EnqueueError::Full(event));
                }
                self.signal.drained.wait_for(&mut guard, slice);
                drop(guard);
                if interrupt::is_interrupted() {
                    return Err(EnqueueError::Full(event));
                }
                self.try_enqueue(event)
            }
            other => other,
        }
    }

    /// Wake every producer waiting for space
    pub fn notify_drained(&self) {
        self.signal.wake();
    }

    pub(crate) fn signal(&self) -> Arc<DrainSignal> {
        Arc::clone(&self.signal)
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::core::log_level::LogLevel;
    use crate::core::sink::{Cause, Sink};
    use std::time::Instant;

    struct Discard;

    impl Sink for Discard {
        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn write(&self, _level: LogLevel, _text: &str, _cause: Option<&Cause>) -> Result<()> {
            Ok(())
        }
    }

    fn event(text: &str) -> LogEvent {
        LogEvent::new(Arc::new(Discard), LogLevel::Info, text.to_string(), None)
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let (queue, _receiver) = EventQueue::new(2);
        assert!(queue.try_enqueue(event("a")).is_ok());
        assert!(queue.try_enqueue(event("b")).is_ok());

        match queue.try_enqueue(event("c")) {
            Err(EnqueueError::Full(rejected)) => assert_eq!(rejected.text(), "c"),
            other => panic!("expected Full, got {:?}", other),
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn test_closed_when_receiver_dropped() {
        let (queue, receiver) = EventQueue::new(1);
        drop(receiver);
        assert!(matches!(
            queue.try_enqueue(event("a")),
            Err(EnqueueError::Closed(_))
        ));
    }

    #[test]
    fn test_fifo_order() {
        let (queue, receiver) = EventQueue::new(8);
        for text in ["1", "2", "3"] {
            queue.try_enqueue(event(text)).unwrap();
        }
        let drained: Vec<String> = receiver.try_iter().map(|e| e.text().to_string()).collect();
        assert_eq!(drained, vec!["1", "2", "3"]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_wait_times_out_when_nothing_drains() {
        let (queue, _receiver) = EventQueue::new(1);
        queue.try_enqueue(event("a")).unwrap();

        let start = Instant::now();
        let result = queue.enqueue_or_wait(event("b"), Duration::from_millis(50));
        assert!(matches!(result, Err(EnqueueError::Full(_))));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_interrupt_ends_wait_early() {
        let (queue, _receiver) = EventQueue::new(1);
        let queue = Arc::new(queue);
        queue.try_enqueue(event("a")).unwrap();

        let (handle_tx, handle_rx) = crossbeam_channel::bounded(1);
        let producer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                let _registration = interrupt::wake_on_interrupt(queue.signal());
                handle_tx.send(interrupt::InterruptHandle::current()).unwrap();
                let result = queue.enqueue_or_wait(event("b"), Duration::from_secs(10));
                (matches!(result, Err(EnqueueError::Full(_))), Instant::now())
            })
        };

        let handle = handle_rx.recv().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        let interrupted_at = Instant::now();
        handle.interrupt();

        let (rejected, returned_at) = producer.join().unwrap();
        assert!(rejected);
        assert!(returned_at.duration_since(interrupted_at) < Duration::from_secs(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_wait_wakes_on_drained_signal() {
        let (queue, receiver) = EventQueue::new(1);
        let queue = Arc::new(queue);
        queue.try_enqueue(event("a")).unwrap();

        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                let first = receiver.recv().unwrap();
                queue.notify_drained();
                (first, receiver)
            })
        };

        let start = Instant::now();
        let result = queue.enqueue_or_wait(event("b"), Duration::from_secs(10));
        assert!(result.is_ok());
        assert!(start.elapsed() < Duration::from_secs(5));

        let (first, receiver) = consumer.join().unwrap();
        assert_eq!(first.text(), "a");
        assert_eq!(receiver.recv().unwrap().text(), "b");
    }
}

//! The single background thread that drains the event queue

use super::{
    diagnostic::Diagnostic,
    error::{LoggerError, Result},
    log_event::LogEvent,
    pipeline::Pipeline,
};
use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default name of the drain worker thread
pub const DEFAULT_WORKER_NAME: &str = "queued-logger-drain";

pub(crate) struct DrainWorker {
    stop: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

/// Clears the liveness flag however the worker loop ends
struct ExitGuard(Arc<Pipeline>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.set_worker_alive(false);
        if let Some(ref queue) = self.0.queue {
            // Blocked producers re-check liveness and fall back to direct writes
            queue.notify_drained();
        }
    }
}

impl DrainWorker {
    pub(crate) fn spawn(
        name: &str,
        pipeline: Arc<Pipeline>,
        events: Receiver<LogEvent>,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded(1);

        pipeline.set_worker_alive(true);
        let worker_pipeline = Arc::clone(&pipeline);
        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || Self::run(worker_pipeline, events, stop_rx));

        match spawned {
            Ok(handle) => Ok(Self {
                stop: Some(stop_tx),
                handle: Some(handle),
            }),
            Err(e) => {
                pipeline.set_worker_alive(false);
                Err(LoggerError::io_operation(
                    "spawning drain worker",
                    format!("cannot start thread '{}'", name),
                    e,
                ))
            }
        }
    }

    fn run(pipeline: Arc<Pipeline>, events: Receiver<LogEvent>, stop: Receiver<()>) {
        let _exit = ExitGuard(Arc::clone(&pipeline));
        let Some(ref queue) = pipeline.queue else {
            return;
        };

        loop {
            match stop.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Disconnected) => break,
            }

            let event = match events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {
                    queue.notify_drained();
                    select! {
                        recv(events) -> received => match received {
                            Ok(event) => event,
                            Err(_) => break,
                        },
                        recv(stop) -> _ => break,
                    }
                }
            };

            queue.notify_drained();
            pipeline.write_event(&event);
            pipeline.finish_pending();
        }

        // New producers fall back to direct writes while the backlog drains
        pipeline.set_worker_alive(false);
        queue.notify_drained();
        while let Ok(event) = events.try_recv() {
            pipeline.write_event(&event);
            pipeline.finish_pending();
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Ask the worker to stop and wait up to `timeout` for it to exit
    ///
    /// The worker writes whatever is still queued before it exits, so a slow
    /// sink can push the exit past `timeout`.
    pub(crate) fn stop(&mut self, timeout: Duration, pipeline: &Pipeline) -> bool {
        if let Some(stop) = self.stop.take() {
            // Full or disconnected both mean the worker is already stopping
            let _ = stop.try_send(());
        }

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if handle.join().is_err() {
                    eprintln!("[LOGGER ERROR] Drain worker thread panicked during shutdown");
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                pipeline
                    .reporter
                    .report(Diagnostic::WorkerStopTimeout { timeout });
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

//! Timer-driven eviction scheduling.
//!
//! The scheduler owns a dedicated tokio runtime whose only job is to run one
//! sleep-then-evict task per live cache entry. There is no periodic sweep:
//! an entry costs one scheduled task while it lives and nothing once it is
//! evicted or cancelled.

use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::CacheResult;

/// Cancellable handle to a single pending eviction task.
///
/// Cancellation is best-effort: aborting a task that is already running its
/// fire callback does nothing, which is why fire callbacks must re-check
/// that the entry they captured is still current before removing anything.
#[derive(Debug)]
pub(crate) struct EvictionHandle {
    task: JoinHandle<()>,
}

impl EvictionHandle {
    /// Request cancellation of the pending eviction.
    pub(crate) fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for EvictionHandle {
    fn drop(&mut self) {
        // A handle that goes away must not leave its timer armed
        self.task.abort();
    }
}

/// Owns the runtime that executes eviction timers.
#[derive(Debug)]
pub(crate) struct Scheduler {
    /// Taken (and consumed) by `shutdown`; `None` afterwards.
    runtime: Mutex<Option<Runtime>>,
    spawner: Handle,
}

impl Scheduler {
    /// Start a scheduler backed by `worker_threads` timer threads.
    pub(crate) fn new(worker_threads: usize) -> CacheResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("timed-cache-eviction")
            .enable_time()
            .build()?;
        let spawner = runtime.handle().clone();

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            spawner,
        })
    }

    /// Arm a timer that runs `on_fire` once, no earlier than `delay` from now,
    /// unless cancelled first.
    pub(crate) fn schedule<F>(&self, delay: Duration, on_fire: F) -> EvictionHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let task = self.spawner.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        });

        EvictionHandle { task }
    }

    /// Drain the scheduler, waiting at most `timeout` for in-flight fire
    /// callbacks to finish. Timers that are still sleeping are cancelled.
    ///
    /// Idempotent; later calls find the runtime already gone.
    pub(crate) fn shutdown(&self, timeout: Duration) {
        let runtime = self
            .runtime
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());

        if let Some(runtime) = runtime {
            debug!(?timeout, "draining eviction scheduler");
            runtime.shutdown_timeout(timeout);
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // The last owner of the cache can be a fire callback running on one
        // of this runtime's own workers; a blocking runtime drop would panic
        // there, so release it without waiting.
        if let Some(runtime) = self.runtime.get_mut().ok().and_then(|slot| slot.take()) {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    #[test]
    fn test_scheduled_task_fires() {
        let scheduler = Scheduler::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        let _handle = scheduler.schedule(Duration::from_millis(5), move || {
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        scheduler.shutdown(Duration::from_millis(100));
    }

    #[test]
    fn test_cancelled_task_does_not_fire() {
        let scheduler = Scheduler::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        let handle = scheduler.schedule(Duration::from_millis(50), move || {
            tx.send(()).unwrap();
        });
        handle.cancel();

        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
        scheduler.shutdown(Duration::from_millis(100));
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let scheduler = Scheduler::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        let handle = scheduler.schedule(Duration::from_millis(50), move || {
            tx.send(()).unwrap();
        });
        drop(handle);

        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
        scheduler.shutdown(Duration::from_millis(100));
    }

    #[test]
    fn test_shutdown_cancels_sleeping_timers_promptly() {
        let scheduler = Scheduler::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        let _handle = scheduler.schedule(Duration::from_secs(600), move || {
            tx.send(()).unwrap();
        });

        let started = Instant::now();
        scheduler.shutdown(Duration::from_secs(1));

        // The sleeping timer must not hold shutdown for its full TTL
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let scheduler = Scheduler::new(1).unwrap();
        scheduler.shutdown(Duration::from_millis(100));
        scheduler.shutdown(Duration::from_millis(100));
    }
}

//! Background task lifecycle tracking
//!
//! Handle-based arena of background tasks. Every periodic or long-running
//! job an overlay schedules is registered here, so `shutdown` can cancel the
//! lot deterministically and no timer survives teardown.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle identifying one registered background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct RegistryInner {
    next_id: u64,
    handles: HashMap<TaskId, JoinHandle<()>>,
}

/// Handle-based registry of cancellable background tasks.
///
/// Tasks race a shutdown signal; `shutdown` flips the signal and then aborts
/// whatever is still registered. Shutdown is idempotent and also runs on
/// drop, so no task outlives its registry.
#[derive(Debug)]
pub struct TaskRegistry {
    shutdown_tx: watch::Sender<bool>,
    inner: Mutex<RegistryInner>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            inner: Mutex::new(RegistryInner {
                next_id: 0,
                handles: HashMap::new(),
            }),
        }
    }

    /// Spawn a task that runs until it finishes or the registry shuts down.
    pub fn spawn<F>(&self, fut: F) -> TaskId
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                _ = fut => {}
            }
        });
        self.register(handle)
    }

    /// Spawn a task invoking `f` every `interval` until it returns `false`
    /// or the registry shuts down.
    pub fn spawn_interval<F, Fut>(&self, interval: Duration, mut f: F) -> TaskId
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                if !f().await {
                    break;
                }
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
        self.register(handle)
    }

    fn register(&self, handle: JoinHandle<()>) -> TaskId {
        let mut inner = self.inner.lock();
        let id = TaskId(inner.next_id);
        inner.next_id += 1;
        inner.handles.insert(id, handle);
        id
    }

    /// Cancel one task by handle. Unknown handles are ignored.
    pub fn cancel(&self, id: TaskId) {
        if let Some(handle) = self.inner.lock().handles.remove(&id) {
            handle.abort();
        }
    }

    /// Number of tasks still registered.
    ///
    /// Counts registered handles, including tasks that already ran to
    /// completion on their own.
    pub fn registered(&self) -> usize {
        self.inner.lock().handles.len()
    }

    /// Cancel every registered task. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let drained: Vec<_> = self.inner.lock().handles.drain().collect();
        if !drained.is_empty() {
            debug!(tasks = drained.len(), "cancelling background tasks");
        }
        for (_, handle) in drained {
            handle.abort();
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

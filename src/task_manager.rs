//! Manages the lifecycle of the worker tasks of a scan.
use crate::shutdown::CancellationSignal;
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

type Handles = Vec<(String, JoinHandle<()>)>;

/// A centralized manager for spawned worker tasks.
///
/// This struct is responsible for:
/// - Spawning tasks and keeping track of their `JoinHandle`s.
/// - Reporting how many tasks are still running.
/// - Joining every task on shutdown, never aborting one.
#[derive(Clone, Debug)]
pub struct TaskManager {
    handles: Arc<Mutex<Handles>>,
    signal: CancellationSignal,
}

impl TaskManager {
    /// Creates a new `TaskManager` whose tasks observe `signal`.
    pub fn new(signal: CancellationSignal) -> Self {
        Self {
            handles: Arc::new(Mutex::new(Vec::new())),
            signal,
        }
    }

    /// Spawns a new task and adds its handle to the manager.
    pub fn spawn<F>(&self, name: impl Into<String>, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        debug!(task_name = %name, "Spawning task");
        let handle = tokio::spawn(future);
        self.handles().push((name, handle));
    }

    /// Returns a receiver for the cancellation flag.
    pub fn get_shutdown_rx(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// Number of spawned tasks that have not yet finished.
    pub fn running(&self) -> usize {
        self.handles()
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Waits for all managed tasks to complete.
    ///
    /// Returns the number of tasks that panicked.
    pub async fn shutdown(self) -> usize {
        let handles = self.handles().drain(..).collect::<Vec<_>>();
        info!(
            "TaskManager shutting down. Waiting for {} tasks to complete...",
            handles.len()
        );

        let (task_names, handles): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
        debug!(tasks = ?task_names, "Awaiting all tasks.");

        let results = join_all(handles).await;

        let mut panics = 0;
        for (task_name, result) in task_names.iter().zip(results) {
            match result {
                Ok(()) => debug!(task_name = %task_name, "Task shut down gracefully."),
                Err(e) => {
                    error!(task_name = %task_name, error = %e, "Task panicked during shutdown.");
                    panics += 1;
                }
            }
        }

        if panics > 0 {
            error!("{} tasks panicked during shutdown", panics);
        } else {
            info!("All tasks shut down gracefully.");
        }
        panics
    }

    fn handles(&self) -> MutexGuard<'_, Handles> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

type TaskResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Task = Box<dyn Fn() -> TaskResult + Send + Sync>;

/// A small runner for periodic background work, such as sweeping verified
/// presentations into award minting.
///
/// Tasks are plain closures; a failing task is logged and the remaining
/// tasks still run. The scheduler either runs everything once on demand
/// ([`run_pending`](Self::run_pending)) or loops on a tokio task at a
/// fixed interval until its handle is shut down.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<(String, Task)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named task to the scheduler.
    pub fn add_task<F>(&mut self, name: impl Into<String>, task: F)
    where
        F: Fn() -> TaskResult + Send + Sync + 'static,
    {
        let name = name.into();
        info!(task = %name, "task added");
        self.tasks.push((name, Box::new(task)));
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run all registered tasks once, logging failures without aborting.
    pub fn run_pending(&self) {
        for (name, task) in &self.tasks {
            if let Err(e) = task() {
                error!(task = %name, "scheduled task failed: {e}");
            }
        }
    }

    /// Run the task loop on a background tokio task at the given interval.
    ///
    /// Tasks run once immediately, then on every tick. The returned handle
    /// stops the loop.
    pub fn spawn(self, interval: Duration) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            info!("scheduler started");
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_pending(),
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("scheduler stopped");
        });
        SchedulerHandle {
            stop: stop_tx,
            join,
        }
    }
}

/// Handle to a running scheduler loop.
pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.join.await;
    }
}

//! Periodic refresh tasks
//!
//! Fixed-interval background polling for dashboard views, modelled as a
//! cancellable task: starting returns a handle, and a view tearing down
//! cancels (or simply drops) the handle so no timer outlives its owner.
//! Failures inside the job are the job's concern; the schedule itself never
//! retries or backs off.

use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

/// Handle to a running periodic task.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the periodic task.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the underlying task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn `job` on the current tokio runtime, running once per `period`.
///
/// The first run happens one full period after spawning; a run that overlaps
/// a missed tick skips the backlog instead of bursting.
pub fn spawn<F, Fut>(period: Duration, mut job: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The interval's initial tick completes immediately; consume it so
        // the job first runs a full period after spawn.
        interval.tick().await;

        debug!(period_secs = period.as_secs(), "periodic task started");

        loop {
            interval.tick().await;
            job().await;
        }
    });

    PollHandle { task }
}

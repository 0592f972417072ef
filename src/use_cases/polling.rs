use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Shorter periods are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Owns a background polling task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("poller stopped.");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// Runs `job` immediately and then once per `period` until the handle goes away.
pub fn spawn_poller<F, Fut>(period: Duration, mut job: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let period = if period < MIN_POLL_INTERVAL {
        tracing::warn!(
            requested_ms = period.as_millis() as u64,
            min_ms = MIN_POLL_INTERVAL.as_millis() as u64,
            "poll interval too short; using the minimum."
        );
        MIN_POLL_INTERVAL
    } else {
        period
    };
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // A slow backend should not cause a burst of catch-up requests.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            job().await;
        }
    });
    tracing::debug!(period_ms = period.as_millis() as u64, "poller started.");

    PollHandle { task: Some(task) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_poller(period: Duration) -> (PollHandle, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let handle = spawn_poller(period, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (handle, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn when_started_then_runs_immediately_and_every_period() {
        let (handle, runs) = counting_poller(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn when_period_is_zero_then_poller_keeps_running_at_minimum_interval() {
        let (handle, runs) = counting_poller(Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(handle.is_running());

        tokio::time::sleep(MIN_POLL_INTERVAL * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn when_handle_is_dropped_then_no_further_runs_happen() {
        let (handle, runs) = counting_poller(Duration::from_secs(30));
        tokio::time::sleep(Duration::from_millis(1)).await;

        drop(handle);
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn when_views_mount_and_unmount_repeatedly_then_only_live_poller_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..5 {
            let counter = Arc::clone(&runs);
            let handle = spawn_poller(Duration::from_secs(30), move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
            tokio::time::sleep(Duration::from_millis(1)).await;
            handles.push(handle);
            // Unmount everything but the latest view.
            if handles.len() > 1 {
                handles.remove(0).stop();
            }
        }
        let before = runs.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(runs.load(Ordering::SeqCst), before + 1);
        assert_eq!(handles.len(), 1);
    }
}

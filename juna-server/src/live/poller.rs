//! Periodic fetch task publishing through a watch channel.
//!
//! A tick that arrives while the previous fetch is still running drops that
//! fetch and starts a new one. The replacement is never dropped: it runs to
//! completion and ticks missed meanwhile are skipped, so a feed that is
//! always slower than the period still publishes every other request. Only
//! the fetch started last can publish, so snapshots never go backwards.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// One published fetch result.
#[derive(Debug)]
pub struct Snapshot<T> {
    /// Number of the request that produced this snapshot, counting from 1.
    /// Superseded requests leave gaps.
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub data: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            fetched_at: self.fetched_at,
            data: Arc::clone(&self.data),
        }
    }
}

/// Poll settings.
#[derive(Debug, Clone)]
pub struct Poller {
    name: String,
    period: Duration,
}

impl Poller {
    pub fn new(name: impl Into<String>, period: Duration) -> Self {
        Self {
            name: name.into(),
            period,
        }
    }

    /// Start polling. The first fetch starts immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<T, F, Fut>(self, mut fetch: F) -> PollHandle<T>
    where
        T: Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let Poller { name, period } = self;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await;

            let mut generation = 1u64;
            let mut in_flight = Box::pin(fetch());
            let mut replacing = false;

            loop {
                tokio::select! {
                    data = &mut in_flight => {
                        let snapshot = Snapshot {
                            generation,
                            fetched_at: Utc::now(),
                            data: Arc::new(data),
                        };
                        if tx.send(Some(snapshot)).is_err() {
                            debug!(poller = %name, "no subscribers left, stopping");
                            return;
                        }
                        debug!(poller = %name, generation, "published");
                        replacing = false;
                        interval.tick().await;
                    }
                    _ = interval.tick(), if !replacing => {
                        debug!(poller = %name, generation, "fetch superseded, cancelling");
                        replacing = true;
                    }
                }

                generation += 1;
                in_flight = Box::pin(fetch());
            }
        });

        PollHandle {
            rx,
            _task: Arc::new(AbortOnDrop(task)),
        }
    }
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Subscription to a running poller. The task is aborted when the last
/// clone is dropped.
pub struct PollHandle<T> {
    rx: watch::Receiver<Option<Snapshot<T>>>,
    _task: Arc<AbortOnDrop>,
}

impl<T> Clone for PollHandle<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            _task: Arc::clone(&self._task),
        }
    }
}

impl<T> PollHandle<T> {
    /// The latest snapshot, if any fetch has completed.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.rx.borrow().clone()
    }

    /// The latest snapshot, waiting up to `timeout` for the first one.
    pub async fn ready(&self, timeout: Duration) -> Option<Snapshot<T>> {
        if let Some(snapshot) = self.latest() {
            return Some(snapshot);
        }

        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await;
        match waited {
            Ok(Ok(snapshot)) => (*snapshot).clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    struct FlagOnDrop(Arc<AtomicBool>);

    impl Drop for FlagOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn counting(calls: &Arc<AtomicU64>) -> impl FnMut() -> std::future::Ready<u64> + Send + 'static {
        let calls = Arc::clone(calls);
        move || std::future::ready(calls.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test]
    async fn first_snapshot_is_published() {
        let calls = Arc::new(AtomicU64::new(0));
        let handle = Poller::new("test", Duration::from_secs(3600)).spawn(counting(&calls));

        let snapshot = handle.ready(Duration::from_secs(5)).await.unwrap();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(*snapshot.data, 1);
        assert_eq!(handle.latest().unwrap().generation, 1);
    }

    #[tokio::test]
    async fn republishes_every_period() {
        let calls = Arc::new(AtomicU64::new(0));
        let handle = Poller::new("test", Duration::from_millis(10)).spawn(counting(&calls));
        handle.ready(Duration::from_secs(5)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let snapshot = handle.latest().unwrap();

        assert!(snapshot.generation >= 3);
        assert_eq!(*snapshot.data, snapshot.generation);
    }

    #[tokio::test]
    async fn slow_fetch_is_cancelled_by_next_tick() {
        let calls = Arc::new(AtomicU64::new(0));
        let cancelled = Arc::new(AtomicBool::new(false));

        let fetch = {
            let calls = Arc::clone(&calls);
            let cancelled = Arc::clone(&cancelled);
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                let cancelled = Arc::clone(&cancelled);
                async move {
                    if n == 1 {
                        let _guard = FlagOnDrop(cancelled);
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    }
                    n
                }
            }
        };

        let handle = Poller::new("test", Duration::from_millis(20)).spawn(fetch);
        let snapshot = handle.ready(Duration::from_secs(5)).await.unwrap();

        assert!(cancelled.load(Ordering::SeqCst));
        assert_eq!(snapshot.generation, 2);
        assert_eq!(*snapshot.data, 2);
    }

    #[tokio::test]
    async fn fetch_slower_than_period_still_publishes() {
        let calls = Arc::new(AtomicU64::new(0));
        let fetch = {
            let calls = Arc::clone(&calls);
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    n
                }
            }
        };

        let handle = Poller::new("test", Duration::from_millis(20)).spawn(fetch);
        let first = handle.ready(Duration::from_secs(2)).await.unwrap();

        // The first request is cancelled; its replacement runs to completion
        assert_eq!(first.generation, 2);
        assert_eq!(*first.data, 2);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let later = handle.latest().unwrap();
        assert!(later.generation > first.generation);
        assert_eq!(*later.data, later.generation);
    }

    #[tokio::test]
    async fn ready_times_out_without_data() {
        let handle = Poller::new("test", Duration::from_secs(3600)).spawn(|| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        assert!(handle.ready(Duration::from_millis(20)).await.is_none());
    }

    #[tokio::test]
    async fn dropping_last_handle_stops_polling() {
        let calls = Arc::new(AtomicU64::new(0));
        let handle = Poller::new("test", Duration::from_millis(5)).spawn(counting(&calls));
        let clone = handle.clone();

        handle.ready(Duration::from_secs(5)).await.unwrap();
        drop(handle);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(clone.latest().is_some(), "clone keeps the poller alive");

        drop(clone);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let stopped_at = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), stopped_at);
    }
}

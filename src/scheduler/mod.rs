//! Periodic refresh driver
//!
//! Calls `update()` on every registered feed at a fixed tick. Because
//! `update()` is a no-op while a feed is fresh, a short tick only costs a
//! date comparison per feed; real network work happens once per day, plus
//! retries after failures.
//!
//! # Example
//!
//! ```rust,ignore
//! let (tx, rx) = tokio::sync::watch::channel(false);
//! let scheduler = RefreshScheduler::new(Duration::from_secs(1))
//!     .with_feed(zodiac.clone())
//!     .with_feed(blood.clone());
//! tokio::spawn(async move { scheduler.run(rx).await });
//! // later
//! tx.send(true)?;
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::coordinator::Refresh;

/// Snapshot of one feed's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedStatus {
    pub feed: &'static str,
    pub valid: bool,
    pub updating: bool,
}

pub struct RefreshScheduler {
    feeds: Vec<Arc<dyn Refresh>>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            feeds: Vec::new(),
            interval,
        }
    }

    /// Register a feed; feeds are refreshed in registration order
    #[must_use]
    pub fn with_feed(mut self, feed: Arc<dyn Refresh>) -> Self {
        self.feeds.push(feed);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one `update()` on every feed, in order
    pub async fn tick(&self) {
        for feed in &self.feeds {
            feed.update().await;
        }
    }

    pub fn status(&self) -> Vec<FeedStatus> {
        self.feeds
            .iter()
            .map(|feed| FeedStatus {
                feed: feed.feed(),
                valid: feed.is_valid(),
                updating: feed.is_updating(),
            })
            .collect()
    }

    /// Tick until `shutdown` carries `true` or its sender is dropped
    ///
    /// The first tick fires immediately, so every feed is warmed at startup.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            feeds = self.feeds.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Refresh scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingFeed {
        name: &'static str,
        updates: AtomicUsize,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl CountingFeed {
        fn new(name: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                updates: AtomicUsize::new(0),
                log,
            })
        }
    }

    #[async_trait]
    impl Refresh for CountingFeed {
        fn feed(&self) -> &'static str {
            self.name
        }

        async fn update(&self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(self.name);
        }

        fn is_valid(&self) -> bool {
            self.updates.load(Ordering::SeqCst) > 0
        }

        fn is_updating(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_tick_updates_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let zodiac = CountingFeed::new("zodiac", log.clone());
        let blood = CountingFeed::new("blood", log.clone());
        let scheduler = RefreshScheduler::new(Duration::from_secs(1))
            .with_feed(zodiac.clone())
            .with_feed(blood.clone());

        scheduler.tick().await;

        assert_eq!(*log.lock().unwrap(), vec!["zodiac", "blood"]);
        assert!(scheduler.status().iter().all(|s| s.valid));
    }

    #[tokio::test]
    async fn test_status_before_first_tick() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let scheduler = RefreshScheduler::new(Duration::from_secs(1))
            .with_feed(CountingFeed::new("blood", log));

        let status = scheduler.status();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].feed, "blood");
        assert!(!status[0].valid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_until_shutdown() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let feed = CountingFeed::new("zodiac", log);
        let scheduler = Arc::new(
            RefreshScheduler::new(Duration::from_secs(1)).with_feed(feed.clone()),
        );
        let (tx, rx) = watch::channel(false);

        let handle = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(rx).await })
        };

        tokio::time::sleep(Duration::from_millis(3500)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        // immediate first tick plus one per elapsed second
        assert_eq!(feed.updates.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_run_stops_when_sender_dropped() {
        let scheduler = RefreshScheduler::new(Duration::from_secs(3600));
        let (tx, rx) = watch::channel(false);
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), scheduler.run(rx))
            .await
            .expect("scheduler should stop");
    }
}

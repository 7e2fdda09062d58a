//! Shared per-feed state: the entry store, the in-progress flag and the clock
//!
//! Readers take a short read lock and never wait on network I/O. A refresh
//! holds a [`RefreshGuard`] for its whole duration; at most one guard exists
//! per feed at any time.

use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::{Clock, EntryStore};
use crate::metrics;
use crate::models::FeedEntry;

pub struct FeedState<E: FeedEntry> {
    feed: &'static str,
    store: RwLock<EntryStore<E>>,
    updating: AtomicBool,
    clock: Arc<dyn Clock>,
}

impl<E: FeedEntry> FeedState<E> {
    /// Empty, never-refreshed state for the feed named `feed`
    pub fn new(feed: &'static str, clock: Arc<dyn Clock>) -> Self {
        Self {
            feed,
            store: RwLock::new(EntryStore::new()),
            updating: AtomicBool::new(false),
            clock,
        }
    }

    pub fn feed(&self) -> &'static str {
        self.feed
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Current entry for `key`, or a placeholder when there is none
    pub fn get(&self, key: E::Key) -> E {
        self.read_store().get_or_placeholder(key)
    }

    /// Keys ordered by ascending rank
    pub fn ranking(&self) -> Vec<E::Key> {
        self.read_store().ranking()
    }

    /// Copy of every stored entry, in key order
    pub fn entries(&self) -> Vec<E> {
        self.read_store().entries().cloned().collect()
    }

    pub fn is_valid(&self) -> bool {
        self.read_store().is_valid()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    pub fn last_refreshed(&self) -> Option<NaiveDate> {
        self.read_store().last_refreshed()
    }

    /// Whether a refresh would do anything today
    pub fn is_due(&self) -> bool {
        self.read_store().is_due(self.today())
    }

    /// Claim the refresh slot
    ///
    /// Returns `None` when the store is fresh for today or another refresh is
    /// already running. On success the refresh date is advanced to today and,
    /// if the stored entries are from an earlier day, they are dropped.
    pub fn begin_refresh(&self) -> Option<RefreshGuard<'_, E>> {
        let today = self.today();
        if !self.read_store().is_due(today) {
            tracing::trace!(feed = self.feed, %today, "Feed is fresh, skipping refresh");
            return None;
        }

        self.claim(today)
    }

    /// Take the in-progress flag and start the attempt for `today`
    ///
    /// Staleness is checked again under the write lock once the flag is held:
    /// a caller that saw a due feed may only get here after another refresh
    /// has already finished for the day.
    fn claim(&self, today: NaiveDate) -> Option<RefreshGuard<'_, E>> {
        if self
            .updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(feed = self.feed, "Refresh already in progress");
            return None;
        }

        let rolled_over = {
            let mut store = self.write_store();
            if !store.is_due(today) {
                drop(store);
                self.updating.store(false, Ordering::Release);
                tracing::debug!(feed = self.feed, %today, "Feed refreshed meanwhile, skipping");
                return None;
            }
            store.begin_attempt(today)
        };
        if rolled_over {
            tracing::debug!(feed = self.feed, %today, "Starting a new day, previous entries dropped");
        }

        metrics::set_refresh_in_progress(self.feed, true);

        Some(RefreshGuard {
            state: self,
            today,
            failed: false,
        })
    }

    fn read_store(&self) -> RwLockReadGuard<'_, EntryStore<E>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, EntryStore<E>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive right to write a feed's entries
///
/// Dropping the guard releases the in-progress flag, including when the
/// refresh future is cancelled part way.
pub struct RefreshGuard<'a, E: FeedEntry> {
    state: &'a FeedState<E>,
    today: NaiveDate,
    failed: bool,
}

impl<E: FeedEntry> RefreshGuard<'_, E> {
    /// Day this refresh is for
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn feed(&self) -> &'static str {
        self.state.feed
    }

    /// Whether `key` is absent or invalid in the store
    pub fn needs_refresh(&self, key: E::Key) -> bool {
        self.state.read_store().needs_refresh(key)
    }

    pub fn insert(&self, entry: E) {
        self.state.write_store().insert(entry);
    }

    /// Replace every entry in one step
    pub fn replace_all(&self, entries: Vec<E>) {
        self.state.write_store().replace_all(entries);
    }

    /// Mark the attempt failed so the next staleness check fires again
    pub fn fail(&mut self) {
        if !self.failed {
            self.failed = true;
            self.state.write_store().reset_refreshed();
        }
    }
}

impl<E: FeedEntry> Drop for RefreshGuard<'_, E> {
    fn drop(&mut self) {
        self.state.updating.store(false, Ordering::Release);
        metrics::set_refresh_in_progress(self.state.feed, false);
    }
}

//! Per-feed entry storage and the ranking view derived from it

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{FeedEntry, FeedKey};

/// Mapping from feed key to its current entry, plus refresh bookkeeping
///
/// Entries are kept in key order so that ties in the ranking come out in a
/// stable order.
#[derive(Debug, Clone)]
pub struct EntryStore<E: FeedEntry> {
    entries: BTreeMap<E::Key, E>,

    /// Day of the last refresh attempt; `None` forces the next attempt
    last_refreshed: Option<NaiveDate>,

    /// Day the stored entries belong to
    data_date: Option<NaiveDate>,
}

impl<E: FeedEntry> Default for EntryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FeedEntry> EntryStore<E> {
    /// Empty store, never refreshed
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            last_refreshed: None,
            data_date: None,
        }
    }

    pub fn get(&self, key: E::Key) -> Option<&E> {
        self.entries.get(&key)
    }

    /// Stored entry, or an empty placeholder for `key`
    pub fn get_or_placeholder(&self, key: E::Key) -> E {
        self.entries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| E::placeholder(key))
    }

    /// Insert or overwrite the entry for its key
    pub fn insert(&mut self, entry: E) {
        self.entries.insert(entry.key(), entry);
    }

    /// Swap in a complete new set of entries
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = E>) {
        self.entries = entries.into_iter().map(|e| (e.key(), e)).collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    /// Whether `key` still has to be fetched (absent or invalid)
    pub fn needs_refresh(&self, key: E::Key) -> bool {
        !self.entries.get(&key).is_some_and(FeedEntry::is_valid)
    }

    /// Every key of the feed is present and valid
    pub fn is_valid(&self) -> bool {
        E::Key::all().iter().all(|key| !self.needs_refresh(*key))
    }

    /// Staleness guard: a new day has started or some key is missing/invalid
    pub fn is_due(&self, today: NaiveDate) -> bool {
        let new_day = self.last_refreshed.map_or(true, |last| today > last);
        new_day || !self.is_valid()
    }

    pub fn last_refreshed(&self) -> Option<NaiveDate> {
        self.last_refreshed
    }

    pub fn data_date(&self) -> Option<NaiveDate> {
        self.data_date
    }

    /// Record the start of an attempt for `today`
    ///
    /// The refresh date is advanced before any I/O happens. When the stored
    /// entries belong to an earlier day they are dropped; returns `true` in
    /// that case.
    pub fn begin_attempt(&mut self, today: NaiveDate) -> bool {
        self.last_refreshed = Some(today);

        if self.data_date == Some(today) {
            return false;
        }

        self.entries.clear();
        self.data_date = Some(today);
        true
    }

    /// Forget the last attempt so the next staleness check fires
    pub fn reset_refreshed(&mut self) {
        self.last_refreshed = None;
    }

    /// Keys ordered by ascending rank
    ///
    /// Computed from the current entries on every call.
    pub fn ranking(&self) -> Vec<E::Key> {
        let mut entries: Vec<&E> = self.entries.values().collect();
        entries.sort_by_key(|e| e.rank());
        entries.into_iter().map(FeedEntry::key).collect()
    }
}

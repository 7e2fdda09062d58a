//! Blood-type feed coordinator
//!
//! One refresh fetches the index page once, then one detail page per blood
//! type that is missing or invalid in the store. Types whose entry is already
//! valid for today are never re-fetched.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::Refresh;
use crate::cache::{Clock, FeedState, RefreshGuard};
use crate::crawler::PageSource;
use crate::error::FortuneErrorTrait;
use crate::metrics;
use crate::models::{BloodEntry, BloodType, FeedEntry};
use crate::parser::BloodPageParser;
use crate::utils::error::{FetchError, ParseError, RefreshError};
use crate::utils::resolve_url;

const FEED: &str = "blood";

/// Outcome of one successful pass over the index
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BloodRefreshStats {
    /// Detail pages requested
    pub fetched: usize,
    /// Types skipped because their entry was already valid
    pub skipped: usize,
    /// Detail pages that parsed into an invalid entry
    pub invalid: usize,
}

pub struct BloodCache<S> {
    source: S,
    index_url: String,
    parser: BloodPageParser,
    state: FeedState<BloodEntry>,
}

impl<S: PageSource> BloodCache<S> {
    pub fn new(source: S, index_url: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            index_url: index_url.into(),
            parser: BloodPageParser::new(),
            state: FeedState::new(FEED, clock),
        }
    }

    /// Stored entry for `blood_type`, or a placeholder
    pub fn get(&self, blood_type: BloodType) -> BloodEntry {
        self.state.get(blood_type)
    }

    /// Blood types ordered by ascending rank
    pub fn ranking(&self) -> Vec<BloodType> {
        self.state.ranking()
    }

    pub fn entries(&self) -> Vec<BloodEntry> {
        self.state.entries()
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    pub fn is_updating(&self) -> bool {
        self.state.is_updating()
    }

    pub fn state(&self) -> &FeedState<BloodEntry> {
        &self.state
    }

    /// Refresh stale or invalid entries
    ///
    /// Returns immediately when the feed is fresh or another refresh is
    /// running. Failures are logged and leave the feed due for retry.
    #[instrument(skip(self), fields(feed = FEED))]
    pub async fn update(&self) {
        let Some(mut guard) = self.state.begin_refresh() else {
            return;
        };

        metrics::record_refresh_attempt(FEED);
        let _timer = metrics::start_refresh_timer(FEED);

        match self.refresh(&guard).await {
            Ok(stats) => {
                info!(
                    fetched = stats.fetched,
                    skipped = stats.skipped,
                    invalid = stats.invalid,
                    valid = self.state.is_valid(),
                    "Blood-type refresh finished"
                );
            }
            Err(e) => {
                guard.fail();
                metrics::record_refresh_failure(FEED);
                warn!(
                    error = %e,
                    category = e.category().label(),
                    recoverable = e.is_recoverable(),
                    "Blood-type refresh failed, will retry"
                );
            }
        }
    }

    async fn refresh(
        &self,
        guard: &RefreshGuard<'_, BloodEntry>,
    ) -> Result<BloodRefreshStats, RefreshError> {
        metrics::record_fetch(FEED);
        let index = self.source.fetch(&self.index_url).await?;

        let links = self.parser.discover_links(&index);
        if links.is_empty() {
            let err = ParseError::MalformedPayload("index lists no blood types".to_string());
            return Err(err.into());
        }

        let mut stats = BloodRefreshStats::default();
        let mut failed = 0;

        for (label, href) in links {
            let Some(blood_type) = BloodType::from_label(&label) else {
                debug!(label = %label, "Skipping unrecognized index label");
                continue;
            };

            if !guard.needs_refresh(blood_type) {
                stats.skipped += 1;
                continue;
            }

            stats.fetched += 1;
            let entry = match self.fetch_entry(blood_type, &href).await {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(blood_type = %blood_type, error = %e, "Detail page failed");
                    failed += 1;
                    BloodEntry::placeholder(blood_type)
                }
            };

            if !entry.is_valid() {
                stats.invalid += 1;
            }
            guard.insert(entry);
        }

        if failed > 0 {
            return Err(RefreshError::Partial {
                failed,
                attempted: stats.fetched,
            });
        }

        Ok(stats)
    }

    async fn fetch_entry(
        &self,
        blood_type: BloodType,
        href: &str,
    ) -> Result<BloodEntry, RefreshError> {
        let url = resolve_url(&self.index_url, href)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        metrics::record_fetch(FEED);
        let html = self.source.fetch(&url).await?;

        let entry = self.parser.parse_detail(&html, blood_type, &url);
        if !entry.is_valid() {
            debug!(blood_type = %blood_type, url = %url, rank = entry.rank, "Detail page yielded an incomplete entry");
        }
        Ok(entry)
    }
}

#[async_trait]
impl<S: PageSource> Refresh for BloodCache<S> {
    fn feed(&self) -> &'static str {
        FEED
    }

    async fn update(&self) {
        BloodCache::update(self).await;
    }

    fn is_valid(&self) -> bool {
        BloodCache::is_valid(self)
    }

    fn is_updating(&self) -> bool {
        BloodCache::is_updating(self)
    }
}

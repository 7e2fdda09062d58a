//! Zodiac feed coordinator
//!
//! The horoscope API returns every sign in one response, so a refresh is a
//! single fetch whose parsed result replaces the store wholesale.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::Refresh;
use crate::cache::{Clock, FeedState, RefreshGuard};
use crate::crawler::PageSource;
use crate::error::FortuneErrorTrait;
use crate::metrics;
use crate::models::{ZodiacEntry, ZodiacSign};
use crate::parser::parse_horoscope;
use crate::utils::date_key;
use crate::utils::error::RefreshError;

const FEED: &str = "zodiac";

pub struct ZodiacCache<S> {
    source: S,
    api_base: String,
    state: FeedState<ZodiacEntry>,
}

impl<S: PageSource> ZodiacCache<S> {
    pub fn new(source: S, api_base: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            api_base: api_base.into(),
            state: FeedState::new(FEED, clock),
        }
    }

    /// Stored entry for `sign`, or a placeholder
    pub fn get(&self, sign: ZodiacSign) -> ZodiacEntry {
        self.state.get(sign)
    }

    /// Signs ordered by ascending rank
    pub fn ranking(&self) -> Vec<ZodiacSign> {
        self.state.ranking()
    }

    pub fn entries(&self) -> Vec<ZodiacEntry> {
        self.state.entries()
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    pub fn is_updating(&self) -> bool {
        self.state.is_updating()
    }

    pub fn state(&self) -> &FeedState<ZodiacEntry> {
        &self.state
    }

    /// API URL for the day's horoscope: `<base>/YYYY/MM/DD`
    pub fn url_for(&self, date: chrono::NaiveDate) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), date_key(date))
    }

    /// Refresh the feed if it is stale
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
            Ok(count) => {
                info!(
                    signs = count,
                    valid = self.state.is_valid(),
                    "Zodiac refresh finished"
                );
            }
            Err(e) => {
                guard.fail();
                metrics::record_refresh_failure(FEED);
                warn!(
                    error = %e,
                    category = e.category().label(),
                    recoverable = e.is_recoverable(),
                    "Zodiac refresh failed, will retry"
                );
            }
        }
    }

    async fn refresh(&self, guard: &RefreshGuard<'_, ZodiacEntry>) -> Result<usize, RefreshError> {
        let today = guard.today();
        let url = self.url_for(today);

        metrics::record_fetch(FEED);
        let body = self.source.fetch(&url).await?;

        let entries = parse_horoscope(&body, today)?;
        let count = entries.len();
        guard.replace_all(entries);

        Ok(count)
    }
}

#[async_trait]
impl<S: PageSource> Refresh for ZodiacCache<S> {
    fn feed(&self) -> &'static str {
        FEED
    }

    async fn update(&self) {
        ZodiacCache::update(self).await;
    }

    fn is_valid(&self) -> bool {
        ZodiacCache::is_valid(self)
    }

    fn is_updating(&self) -> bool {
        ZodiacCache::is_updating(self)
    }
}

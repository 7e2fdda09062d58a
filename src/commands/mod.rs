pub mod blood;
pub mod omikuji;
pub mod watch;
pub mod zodiac;

use anyhow::{Context, Result};
use std::sync::Arc;

use fortune_cache::cache::{Clock, SystemClock};
use fortune_cache::config::Config;
use fortune_cache::coordinator::{BloodCache, ZodiacCache};
use fortune_cache::crawler::FortuneFetcher;

// Re-export command functions for convenience
pub use blood::blood;
pub use omikuji::omikuji;
pub use watch::watch;
pub use zodiac::zodiac;

/// Both feed caches sharing one HTTP client and one clock
pub struct Feeds {
    pub blood: Arc<BloodCache<Arc<FortuneFetcher>>>,
    pub zodiac: Arc<ZodiacCache<Arc<FortuneFetcher>>>,
}

impl Feeds {
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Arc::new(
            FortuneFetcher::new(&config.fetcher).context("Failed to create HTTP client")?,
        );

        let clock: Arc<dyn Clock> = match config.utc_offset() {
            Some(offset) => Arc::new(SystemClock::with_offset(offset)),
            None => Arc::new(SystemClock::local()),
        };

        Ok(Self {
            blood: Arc::new(BloodCache::new(
                fetcher.clone(),
                config.sources.blood_index_url.clone(),
                clock.clone(),
            )),
            zodiac: Arc::new(ZodiacCache::new(
                fetcher,
                config.sources.zodiac_api_base.clone(),
                clock,
            )),
        })
    }
}

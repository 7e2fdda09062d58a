//! fortune-cache - daily fortune feeds behind a single-flight cache
//!
//! Scrapes the daily blood-type ranking and fetches the daily zodiac
//! horoscope, keeping both in memory so readers never wait on the network.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - HTTP fetching with rate limiting and retry
//! - [`parser`] - HTML and JSON extraction
//! - [`models`] - Feed keys and entries
//! - [`cache`] - Per-feed entry store and staleness guard
//! - [`coordinator`] - Refresh orchestration for each feed
//! - [`scheduler`] - Periodic refresh driver
//! - [`omikuji`] - Weighted fortune-slip draw
//! - [`metrics`] - Prometheus counters
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fortune_cache::cache::SystemClock;
//! use fortune_cache::config::Config;
//! use fortune_cache::coordinator::ZodiacCache;
//! use fortune_cache::crawler::FortuneFetcher;
//! use fortune_cache::models::ZodiacSign;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = FortuneFetcher::new(&config.fetcher)?;
//!     let zodiac = ZodiacCache::new(
//!         fetcher,
//!         config.sources.zodiac_api_base.clone(),
//!         Arc::new(SystemClock::local()),
//!     );
//!     zodiac.update().await;
//!     println!("{:?}", zodiac.get(ZodiacSign::Leo));
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod crawler;
pub mod error;
pub mod metrics;
pub mod models;
pub mod omikuji;
pub mod parser;
pub mod scheduler;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{Clock, SystemClock};
    pub use crate::config::Config;
    pub use crate::coordinator::{BloodCache, Refresh, ZodiacCache};
    pub use crate::crawler::{FortuneFetcher, PageSource};
    pub use crate::error::{ErrorCategory, FortuneErrorTrait};
    pub use crate::models::{BloodEntry, BloodType, FeedEntry, FeedKey, ZodiacEntry, ZodiacSign};
    pub use crate::scheduler::RefreshScheduler;
}

// Direct re-exports for convenience
pub use models::{BloodEntry, BloodType, ZodiacEntry, ZodiacSign};

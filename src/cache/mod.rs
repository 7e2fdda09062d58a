//! In-memory daily cache for fortune feeds
//!
//! Each feed keeps one [`EntryStore`] behind a [`FeedState`]:
//! - entries are refreshed at most once per calendar day
//! - entries from a previous day are dropped when the new day's refresh starts
//! - a failed refresh resets the refresh date so the next request retries
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fortune_cache::cache::{FeedState, SystemClock};
//!
//! let state: FeedState<ZodiacEntry> = FeedState::new("zodiac", Arc::new(SystemClock::local()));
//! if let Some(guard) = state.begin_refresh() {
//!     guard.replace_all(fetched_entries);
//! }
//! let ranking = state.ranking();
//! ```

pub mod clock;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use state::{FeedState, RefreshGuard};
pub use store::EntryStore;

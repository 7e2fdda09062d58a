//! Refresh coordinators, one per feed
//!
//! A coordinator owns a feed's [`FeedState`](crate::cache::FeedState) and
//! knows how to repopulate it from upstream. Reads never block on a refresh;
//! `update` is idempotent within a day and single-flight per feed.

pub mod blood;
pub mod zodiac;

use async_trait::async_trait;

pub use blood::BloodCache;
pub use zodiac::ZodiacCache;

/// Feed-independent view of a coordinator, used by the scheduler
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Short feed name used in logs and metrics
    fn feed(&self) -> &'static str;

    /// Refresh the feed if it is stale; errors are absorbed and logged
    async fn update(&self);

    fn is_valid(&self) -> bool;

    fn is_updating(&self) -> bool;
}

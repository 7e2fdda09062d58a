//! Outbound HTTP access for the fortune feeds
//!
//! [`PageSource`] is the seam between the refresh coordinators and the
//! network; [`fetcher::FortuneFetcher`] is the production implementation.

pub mod fetcher;
pub mod headers;

use async_trait::async_trait;
use std::sync::Arc;

use crate::utils::error::FetchError;

pub use fetcher::{decode_body, FortuneFetcher};

/// Anything that can turn a URL into page text
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

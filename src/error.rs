//! Error classification for refresh failures
//!
//! The error enums live in [`crate::utils::error`]; this module adds the
//! recoverability and category used when a coordinator logs a failed refresh.
//!
//! - [`FortuneErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Coarse classification for log fields
//!
//! ```rust,ignore
//! use fortune_cache::error::FortuneErrorTrait;
//!
//! if let Err(e) = result {
//!     tracing::warn!(category = e.category().label(), recoverable = e.is_recoverable(), "{e}");
//! }
//! ```

pub use crate::utils::error::{FetchError, ParseError, RefreshError};

/// Common trait for all fortune-cache error types
pub trait FortuneErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later refresh may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, status)
    Network,
    /// Parsing and data extraction errors
    Parsing,
}

impl ErrorCategory {
    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
        }
    }
}

impl FortuneErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::ServerError(status) => *status == 429 || *status >= 500,
            Self::InvalidUrl(_) => false,
            Self::Http(_) | Self::Timeout | Self::MaxRetriesExceeded => true,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Network
    }
}

impl FortuneErrorTrait for ParseError {
    // Feeds are re-published daily, so a malformed payload may be fixed upstream.
    fn is_recoverable(&self) -> bool {
        true
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl FortuneErrorTrait for RefreshError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::Partial { .. } => true,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) | Self::Partial { .. } => ErrorCategory::Network,
            Self::Parse(_) => ErrorCategory::Parsing,
        }
    }
}

//! Error types for the fortune feeds
//!
//! This module defines the error enums raised inside the fetch and extraction
//! steps. None of them ever reach a cache reader: the refresh coordinators
//! collapse them into stale or placeholder state.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while extracting entries from a payload
///
/// A missing HTML element is not an error; it shows up as an empty field on
/// an invalid entry instead. These variants cover payloads that cannot be
/// used at all.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Payload is not valid JSON or not the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The horoscope object has no records for the requested date
    #[error("No records for date {0}")]
    MissingDate(String),

    /// A record carries a sign that is not in the lookup table
    #[error("Unknown zodiac sign: {0}")]
    UnknownSign(String),

    /// A record carries the same sign twice
    #[error("Duplicate zodiac sign: {0}")]
    DuplicateSign(String),

    /// A numeric field is absent or not a number
    #[error("Invalid numeric field '{field}': {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// A text field is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Errors that abort a refresh attempt
#[derive(Error, Debug)]
pub enum RefreshError {
    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// One or more per-key fetches failed and were stored as placeholders
    #[error("{failed} of {attempted} detail pages failed")]
    Partial { failed: usize, attempted: usize },
}

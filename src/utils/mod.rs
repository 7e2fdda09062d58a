//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Resolve a possibly relative `href` against the page it was found on
pub fn resolve_url(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base).with_context(|| format!("Invalid base URL: {base}"))?;
    let joined = base
        .join(href.trim())
        .with_context(|| format!("Cannot resolve '{href}' against {base}"))?;

    Ok(joined.to_string())
}

/// Format a date the way the horoscope API keys its records (`YYYY/MM/DD`)
pub fn date_key(date: chrono::NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT,
};

/// Build browser-like headers for the fortune sites
///
/// The blood-type site rejects requests that do not look like they come from
/// a desktop browser. An unrepresentable `user_agent` is skipped with a warning.
///
/// # Examples
///
/// ```
/// use fortune_cache::crawler::headers::build_browser_headers;
///
/// let headers = build_browser_headers("Mozilla/5.0 (Windows NT 10.0; Win64; x64)");
/// assert!(headers.contains_key("user-agent"));
/// ```
pub fn build_browser_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    match HeaderValue::from_str(user_agent) {
        Ok(value) => {
            headers.insert(USER_AGENT, value);
        }
        Err(_) => tracing::warn!(user_agent = %user_agent, "Ignoring invalid User-Agent"),
    }

    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ja-JP,ja;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    headers
}

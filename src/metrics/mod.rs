//! Prometheus metrics for feed refreshes
//!
//! Tracks, per feed:
//! - refresh attempts and failures
//! - upstream page fetches
//! - whether a refresh is currently running and how long it took
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! Until then, and if initialization fails, metrics operations are no-ops.

use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

struct RefreshMetrics {
    attempts: CounterVec,
    failures: CounterVec,
    fetches: CounterVec,
    in_progress: GaugeVec,
    duration: HistogramVec,
}

static REFRESH_METRICS: OnceLock<RefreshMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Register all refresh metrics with the default registry
///
/// Safe to call more than once; later calls do nothing.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = fortune_cache::metrics::init_metrics() {
///     tracing::warn!("Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = RefreshMetrics {
        attempts: register_counter_vec!(
            "fortune_refresh_attempts_total",
            "Refresh attempts that passed the staleness and in-progress checks",
            &["feed"]
        )?,
        failures: register_counter_vec!(
            "fortune_refresh_failures_total",
            "Refresh attempts that ended with an error",
            &["feed"]
        )?,
        fetches: register_counter_vec!(
            "fortune_fetches_total",
            "Upstream pages requested",
            &["feed"]
        )?,
        in_progress: register_gauge_vec!(
            "fortune_refresh_in_progress",
            "Whether a refresh is running (1 = yes, 0 = no)",
            &["feed"]
        )?,
        duration: register_histogram_vec!(
            "fortune_refresh_duration_seconds",
            "Time spent in one refresh attempt",
            &["feed"],
            vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
        )?,
    };

    REFRESH_METRICS
        .set(metrics)
        .map_err(|_| "Refresh metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

pub fn metrics_initialized() -> bool {
    REFRESH_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn record_refresh_attempt(feed: &str) {
    if let Some(m) = REFRESH_METRICS.get() {
        m.attempts.with_label_values(&[feed]).inc();
    }
}

pub fn record_refresh_failure(feed: &str) {
    if let Some(m) = REFRESH_METRICS.get() {
        m.failures.with_label_values(&[feed]).inc();
    }
}

pub fn record_fetch(feed: &str) {
    if let Some(m) = REFRESH_METRICS.get() {
        m.fetches.with_label_values(&[feed]).inc();
    }
}

pub fn set_refresh_in_progress(feed: &str, in_progress: bool) {
    if let Some(m) = REFRESH_METRICS.get() {
        m.in_progress
            .with_label_values(&[feed])
            .set(if in_progress { 1.0 } else { 0.0 });
    }
}

/// Histogram timer guard that records duration on drop
pub struct MetricsTimer {
    timer: Option<prometheus::HistogramTimer>,
}

impl MetricsTimer {
    fn new(timer: prometheus::HistogramTimer) -> Self {
        Self { timer: Some(timer) }
    }

    fn noop() -> Self {
        Self { timer: None }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop_and_record();
        }
    }
}

/// Start timing a refresh of `feed`
pub fn start_refresh_timer(feed: &str) -> MetricsTimer {
    match REFRESH_METRICS.get() {
        Some(m) => MetricsTimer::new(m.duration.with_label_values(&[feed]).start_timer()),
        None => MetricsTimer::noop(),
    }
}

// ============================================================================
// Tests
// ============================================================================

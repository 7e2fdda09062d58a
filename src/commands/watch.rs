use anyhow::Result;
use tokio::sync::watch;

use fortune_cache::config::Config;
use fortune_cache::metrics;
use fortune_cache::scheduler::RefreshScheduler;

use super::Feeds;

pub async fn watch(config: &Config) -> Result<()> {
    if let Err(e) = metrics::init_metrics() {
        tracing::warn!("Metrics initialization failed: {}", e);
    }

    let feeds = Feeds::from_config(config)?;
    let scheduler = RefreshScheduler::new(config.refresh_interval())
        .with_feed(feeds.zodiac.clone())
        .with_feed(feeds.blood.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for ctrl-c"),
        }
        let _ = shutdown_tx.send(true);
    });

    println!("Watching fortune feeds (ctrl-c to stop)...");
    scheduler.run(shutdown_rx).await;

    for status in scheduler.status() {
        println!(
            "  {}: {}",
            status.feed,
            if status.valid { "valid" } else { "invalid" }
        );
    }

    if let Some(report) = metrics_report() {
        print!("{report}");
    }

    Ok(())
}

/// Prometheus text for everything recorded during the run
fn metrics_report() -> Option<String> {
    if !metrics::metrics_initialized() {
        return None;
    }
    match metrics::encode_metrics() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode metrics");
            None
        }
    }
}

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fortune_cache::config::Config;

#[derive(Parser)]
#[command(
    name = "fortune",
    version,
    about = "Daily blood-type and zodiac fortunes with an in-memory refresh cache",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML config file; environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's blood-type fortune, or the ranking
    Blood {
        /// Blood type (A, B, AB, O); omit for the ranking
        blood_type: Option<String>,
    },

    /// Today's zodiac fortune, or the ranking
    Zodiac {
        /// Sign name, e.g. "leo"
        #[arg(short, long)]
        sign: Option<String>,

        /// Birthday as month/day, e.g. "12/25"; takes precedence over --sign
        #[arg(short, long)]
        birthday: Option<String>,
    },

    /// Draw an omikuji slip
    Omikuji {
        /// Directory holding 00.png..06.png
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Keep both feeds refreshed until ctrl-c
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!("fortune starting");

    match cli.command {
        Commands::Blood { blood_type } => {
            tracing::info!(blood_type = ?blood_type, "Starting blood command");
            commands::blood(&config, blood_type).await?;
        }

        Commands::Zodiac { sign, birthday } => {
            tracing::info!(sign = ?sign, birthday = ?birthday, "Starting zodiac command");
            commands::zodiac(&config, sign, birthday).await?;
        }

        Commands::Omikuji { dir } => {
            commands::omikuji(dir)?;
        }

        Commands::Watch => {
            tracing::info!(
                interval_secs = config.refresh.interval_secs,
                "Starting watch command"
            );
            commands::watch(&config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fortune=debug,fortune_cache=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("fortune={level},fortune_cache={level},warn"))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use megasena_stats::api::build_router;
use megasena_stats::api::state::{spawn_loader, AppState};
use megasena_stats::config::AppConfig;
use megasena_stats::display::{display_notice, display_stats, reveal_selection, selection_line};
use megasena_stats::generate::{generate, rng_from_seed, GenerationMode};
use megasena_stats::provider::load_stats;
use megasena_stats::source::source_from_config;

#[derive(Parser)]
#[command(name = "megasena")]
#[command(about = "Mega-Sena draw statistics and game generator")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./megasena.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Read the draw history from a local JSON file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Fetch the draw history from this URL
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show hot, cold and overdue numbers
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Also print the per-number table
        #[arg(long)]
        table: bool,
    },

    /// Generate games
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Generation strategy (defaults to the config file)
        #[arg(short, long)]
        mode: Option<GenerationMode>,

        /// Number of games
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print each game at once instead of ball by ball
        #[arg(long)]
        no_reveal: bool,
    },

    /// Start the API server
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting megasena v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Stats { source, table } => {
            apply_source_args(&mut config, source)?;
            let draw_source = source_from_config(&config.source)?;
            let loaded = load_stats(draw_source.as_ref(), &config.fallback).await;
            display_stats(&loaded, table);
        }
        Commands::Generate {
            source,
            mode,
            count,
            seed,
            no_reveal,
        } => {
            apply_source_args(&mut config, source)?;
            if count == 0 || count > config.generator.max_batch {
                anyhow::bail!(
                    "--count must be between 1 and {}",
                    config.generator.max_batch
                );
            }
            let mode = mode.unwrap_or(config.generator.default_mode);

            let draw_source = source_from_config(&config.source)?;
            let loaded = if mode == GenerationMode::Smart {
                Some(load_stats(draw_source.as_ref(), &config.fallback).await)
            } else {
                None
            };

            if let Some(notice) = loaded.as_ref().and_then(|l| l.notice.as_deref()) {
                display_notice(notice);
            }
            let snapshot = loaded.as_ref().and_then(|l| l.snapshot.as_deref());

            let interval = if no_reveal {
                Duration::ZERO
            } else {
                Duration::from_millis(config.generator.reveal_interval_ms)
            };

            let mut rng = rng_from_seed(seed);
            let mut stdout = std::io::stdout();
            for index in 1..=count {
                let generated = generate(mode, snapshot, &mut rng)?;
                if interval.is_zero() {
                    println!("{}", selection_line(index, &generated));
                } else {
                    reveal_selection(&mut stdout, index, &generated, interval).await?;
                }
            }
        }
        Commands::Serve { source, host, port } => {
            apply_source_args(&mut config, source)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let draw_source = source_from_config(&config.source)?;
            let state = AppState::new(config.generator.clone());
            spawn_loader(state.clone(), Arc::clone(&draw_source), config.fallback.clone());

            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api/health", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn apply_source_args(config: &mut AppConfig, args: SourceArgs) -> Result<()> {
    if let Some(url) = args.url {
        config.source.url = url;
        config.source.file = None;
    }
    if let Some(file) = args.file {
        config.source.file = Some(file);
    }
    config.validate().context("Invalid source options")?;
    Ok(())
}

//! `redmatch`: match a local music library against the tracker catalog.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use redmatch_core::{
    load_config, metrics::register_metrics, validate_config, validate_red_fields, AlbumQuery,
    BatchOptions, BatchRunner, Config, JsonLibrary, RedactedClient, RedactedClientConfig,
    Reconciler, SanitizedConfig, SqliteResponseCache,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "redmatch", version = VERSION, about)]
struct Args {
    /// Configuration file
    #[arg(long, env = "REDMATCH_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Log as JSON lines instead of plain text
    #[arg(long)]
    json_logs: bool,

    /// Print Prometheus metrics after the command finishes
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match albums and write tracker fields back to the library
    Match {
        /// Library file (JSON array of albums)
        #[arg(long)]
        library: PathBuf,

        /// Re-match albums that already have tracker fields
        #[arg(long)]
        force: bool,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Album filter terms, e.g. `albumartist:Beatles 1969`
        query: Vec<String>,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.json_logs);

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(args: Args) -> Result<()> {
    validate_red_fields().context("Output field schema is misconfigured")?;

    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    match args.command {
        Command::Config => {
            let sanitized = SanitizedConfig::from(&config);
            println!("{}", serde_json::to_string_pretty(&sanitized)?);
        }
        Command::Match {
            library,
            force,
            dry_run,
            query,
        } => {
            run_match(&config, library, AlbumQuery::parse(&query), BatchOptions { force, dry_run })
                .await?;
        }
    }

    if args.metrics {
        print_metrics()?;
    }

    Ok(())
}

async fn run_match(
    config: &Config,
    library_path: PathBuf,
    query: AlbumQuery,
    options: BatchOptions,
) -> Result<()> {
    let mut client = RedactedClient::new(RedactedClientConfig {
        url: config.api.url.clone(),
        api_key: config.api.api_key.clone(),
        timeout: config.api.timeout(),
        min_request_interval: config.api.min_request_interval(),
    })
    .context("Failed to create tracker client")?;

    if config.cache.enabled {
        let cache = SqliteResponseCache::new(&config.cache.path, config.cache.ttl())
            .with_context(|| format!("Failed to open response cache {:?}", config.cache.path))?;
        let purged = cache.purge_expired().context("Failed to purge response cache")?;
        info!(
            "Response cache at {:?} ({} expired entries purged)",
            config.cache.path, purged
        );
        client = client.with_cache(Arc::new(cache));
    }

    let library = JsonLibrary::open(&library_path)
        .with_context(|| format!("Failed to open library {:?}", library_path))?;
    let reconciler =
        Reconciler::new(config.matching.clone()).context("Failed to create reconciler")?;
    let runner = BatchRunner::new(reconciler, Arc::new(client));

    let summary = runner
        .run(&library, &query, options)
        .await
        .context("Batch run failed")?;

    if !options.dry_run && summary.modified > 0 {
        library
            .flush()
            .with_context(|| format!("Failed to write library {:?}", library_path))?;
    }

    println!(
        "Total: {}  Modified: {}  Unmodified: {}  Skipped: {}",
        summary.total, summary.modified, summary.unmodified, summary.skipped
    );
    Ok(())
}

fn print_metrics() -> Result<()> {
    let registry = Registry::new();
    register_metrics(&registry).context("Failed to register metrics")?;

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    print!("{}", String::from_utf8(buffer)?);
    Ok(())
}

//! Siteglass main entry point
//!
//! Command-line interface for the Siteglass scrape API.

use clap::Parser;
use siteglass::browser::provisioner_for;
use siteglass::config::load_config_with_hash;
use siteglass::server::serve;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Siteglass: a bounded headless-browser site scraper
///
/// Siteglass serves an HTTP API that crawls a budget-bounded slice of one
/// website with a headless browser and returns an aggregated content
/// report per request.
#[derive(Parser, Debug)]
#[command(name = "siteglass")]
#[command(version)]
#[command(about = "A bounded headless-browser site scraper API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve the browser binary and exit without serving
    #[arg(long)]
    check_browser: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.check_browser {
        handle_check_browser(config).await
    } else {
        handle_serve(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("siteglass=info,warn"),
            1 => EnvFilter::new("siteglass=debug,info"),
            2 => EnvFilter::new("siteglass=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --check-browser: resolves the browser binary and exits
async fn handle_check_browser(config: siteglass::config::Config) -> anyhow::Result<()> {
    println!("=== Siteglass Browser Check ===\n");

    let provisioner = provisioner_for(&config);
    println!("Environment: {}", provisioner.environment());
    println!("Binary source: {}", provisioner.binary_source());

    match provisioner.launch_plan().await {
        Ok(plan) => {
            println!("Executable: {}", plan.executable.display());
            if !plan.args.is_empty() {
                println!("Launch args: {}", plan.args.join(" "));
            }
            println!("\n✓ Browser binary resolved");
            Ok(())
        }
        Err(e) => {
            println!("\n✗ Browser resolution failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the default mode: runs the HTTP server
async fn handle_serve(config: siteglass::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Browser environment: {:?}, crawl defaults: {} pages / depth {}",
        config.browser.environment,
        config.crawler.default_max_pages,
        config.crawler.default_max_depth
    );

    match serve(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}

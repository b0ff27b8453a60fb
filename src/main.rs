//! StorePulse - Sales statistics and AI insights for WooCommerce stores
//!
//! A CLI tool that fetches recent orders from a WooCommerce store,
//! summarizes sales per product and spend per customer, and asks a
//! language model for practical recommendations.
//!
//! Exit codes:
//!   0 - Success, or no orders in the window
//!   1 - Runtime error (configuration, store API, report file, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod insight;
mod models;
mod report;
mod runner;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use insight::{InsightGenerator, OpenAiClient};
use models::RunReport;
use runner::{RunOptions, RunOutcome};
use store::WooCommerceClient;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up credentials from a local .env file, if any
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("StorePulse v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {}", path.display());
    }

    match run_pipeline(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .storepulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Credentials are read from SHOP_URL, WC_KEY, WC_SECRET and OPENAI_API_KEY.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Resolve configuration, build the clients and execute one run.
async fn run_pipeline(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let settings = config
        .resolve(&args)
        .context("Incomplete configuration")?;
    debug!("Settings: {:?}", settings);

    let source =
        WooCommerceClient::new(settings.store.clone()).context("Failed to create store client")?;
    let model = OpenAiClient::new(settings.llm.clone())
        .context("Failed to create language model client")?;
    let insights = InsightGenerator::new(model, settings.llm.language.clone());

    let options = RunOptions {
        show_progress: !args.quiet,
    };

    let outcome = runner::run(&source, &insights, &options)
        .await
        .context("Failed to fetch orders")?;

    match outcome {
        RunOutcome::NoOrders => Ok(()),
        RunOutcome::Completed(report) => {
            if let Some(ref path) = args.output {
                save_report(&report, path, args.format)?;
                println!("\n✅ Report saved to: {}", path.display());
            }
            Ok(())
        }
    }
}

/// Write the run report in the requested format.
fn save_report(report: &RunReport, path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Json => report::generate_json_report(report)?,
        OutputFormat::Markdown => report::generate_markdown_report(report),
    };

    std::fs::write(path, &output)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path).map_err(Into::into);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

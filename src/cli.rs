//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every value can also come from the
//! environment (or a `.env` file).

use clap::Parser;
use std::path::PathBuf;

/// StorePulse - sales statistics and AI insights for WooCommerce stores
///
/// Fetches the last 30 days of orders (up to 50), summarizes sales per
/// product and spend per customer, and asks a language model for
/// practical recommendations.
///
/// Examples:
///   storepulse
///   storepulse --shop-url https://shop.example.com --language English
///   storepulse --output report.md
///   storepulse --output report.json --format json
///   storepulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the WooCommerce shop
    #[arg(long, value_name = "URL", env = "SHOP_URL")]
    pub shop_url: Option<String>,

    /// WooCommerce REST API consumer key
    #[arg(long, value_name = "KEY", env = "WC_KEY", hide_env_values = true)]
    pub wc_key: Option<String>,

    /// WooCommerce REST API consumer secret
    #[arg(long, value_name = "SECRET", env = "WC_SECRET", hide_env_values = true)]
    pub wc_secret: Option<String>,

    /// OpenAI API key
    #[arg(
        long,
        value_name = "KEY",
        env = "OPENAI_API_KEY",
        hide_env_values = true
    )]
    pub openai_api_key: Option<String>,

    /// Language model to use for insights
    ///
    /// Default: from config or gpt-5-mini.
    #[arg(short, long, env = "STOREPULSE_MODEL")]
    pub model: Option<String>,

    /// Language the recommendations are written in
    ///
    /// Default: from config or Greek.
    #[arg(short, long, env = "STOREPULSE_LANGUAGE")]
    pub language: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, value_name = "URL", env = "OPENAI_API_URL")]
    pub openai_api_url: Option<String>,

    /// Store API request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub store_timeout: Option<u64>,

    /// Language model request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub llm_timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .storepulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the full run report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report file format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .storepulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.shop_url {
            if !is_http_url(url) {
                return Err("Shop URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref url) = self.openai_api_url {
            if !is_http_url(url) {
                return Err("OpenAI API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.store_timeout == Some(0) || self.llm_timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref language) = self.language {
            if language.trim().is_empty() {
                return Err("Language must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

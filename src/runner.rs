//! End-to-end run: fetch, aggregate, generate insight.
//!
//! Steps run strictly in sequence. A fetch failure ends the run and is
//! returned to the caller; aggregation failures degrade to empty
//! statistics and insight failures to the fallback text.

use crate::analysis::{summarize_customers, summarize_products};
use crate::error::FetchError;
use crate::insight::{InsightGenerator, LanguageModel};
use crate::models::{CustomerStats, ProductStats, ReportMetadata, RunReport};
use crate::report::{render_customer_stats, render_product_stats};
use crate::store::{lookback_start, OrderSource};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info, warn};

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Show spinners while waiting on the network.
    pub show_progress: bool,
}

/// How a run ended, when the fetch succeeded.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The store returned no orders; nothing else was invoked.
    NoOrders,
    /// Statistics and insight were produced.
    Completed(RunReport),
}

/// Execute one run against `source`.
pub async fn run<S, M>(
    source: &S,
    insights: &InsightGenerator<M>,
    options: &RunOptions,
) -> Result<RunOutcome, FetchError>
where
    S: OrderSource + ?Sized,
    M: LanguageModel,
{
    let since = lookback_start(Utc::now());

    // Step 1: Fetch orders
    println!("📡 Fetching orders from {}...", source.store_url());
    let progress = spinner("Waiting for store API...", options.show_progress);
    let fetched = source.fetch_orders(since).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let orders = fetched?;

    if orders.is_empty() {
        warn!("No orders found since {}", since);
        println!("⚠️  No orders found.");
        return Ok(RunOutcome::NoOrders);
    }

    println!("📦 Orders: {}", orders.len());

    // Step 2: Aggregate
    let products = summarize_products(&orders).unwrap_or_else(|e| {
        error!("Product aggregation failed: {}", e);
        ProductStats::new()
    });
    println!("📈 Product stats:\n{}", render_product_stats(&products));

    let customers = summarize_customers(&orders).unwrap_or_else(|e| {
        error!("Customer aggregation failed: {}", e);
        CustomerStats::new()
    });
    println!("👥 Customers:\n{}", render_customer_stats(&customers));

    // Step 3: Insight
    let progress = spinner("Generating AI insights...", options.show_progress);
    let insight = insights.generate(&products).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    if insight.is_fallback() {
        warn!("Reporting fallback insight text");
    }
    println!("🧠 AI insights:\n{}", insight);

    info!(
        "Run complete: {} orders, {} products, {} customers",
        orders.len(),
        products.len(),
        customers.len()
    );

    let metadata = ReportMetadata {
        store_url: source.store_url().to_string(),
        generated_at: Utc::now(),
        orders_since: since,
        orders_count: orders.len(),
        model_used: insights.model_name().to_string(),
    };

    Ok(RunOutcome::Completed(RunReport {
        metadata,
        products,
        customers,
        insight,
    }))
}

fn spinner(message: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

//! Run report rendering.
//!
//! Console listings for the phase output, plus Markdown and JSON
//! reports of a completed run.

use crate::analysis::{top_customers, top_products, total_units};
use crate::models::{CustomerStats, Insight, ProductStats, ReportMetadata, RunReport};
use anyhow::Result;

/// Render product statistics as indented console lines.
pub fn render_product_stats(stats: &ProductStats) -> String {
    if stats.is_empty() {
        return "   (none)".to_string();
    }

    stats
        .iter()
        .map(|(name, qty)| format!("   - {}: {}", name, qty))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render customer statistics as indented console lines.
pub fn render_customer_stats(stats: &CustomerStats) -> String {
    if stats.is_empty() {
        return "   (none)".to_string();
    }

    stats
        .iter()
        .map(|(email, summary)| {
            format!(
                "   - {}: {} orders, {} spent",
                email, summary.orders_count, summary.total_spent
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("# StorePulse Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_products_section(&report.products));
    output.push_str(&generate_customers_section(&report.customers));
    output.push_str(&generate_insight_section(&report.insight));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Store:** {}\n", metadata.store_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Orders Since:** {}\n",
        metadata.orders_since.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Orders:** {}\n", metadata.orders_count));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push('\n');

    section
}

/// Generate the products table, best sellers first.
fn generate_products_section(products: &ProductStats) -> String {
    let mut section = String::new();

    section.push_str("## Products\n\n");

    if products.is_empty() {
        section.push_str("No product data available.\n\n");
        return section;
    }

    section.push_str(&format!(
        "{} units across {} products.\n\n",
        total_units(products),
        products.len()
    ));
    section.push_str("| Product | Units Sold |\n");
    section.push_str("|---------|------------|\n");

    for (name, qty) in top_products(products, products.len()) {
        section.push_str(&format!("| {} | {} |\n", escape_cell(name), qty));
    }
    section.push('\n');

    section
}

/// Generate the customers table, biggest spenders first.
fn generate_customers_section(customers: &CustomerStats) -> String {
    let mut section = String::new();

    section.push_str("## Customers\n\n");

    if customers.is_empty() {
        section.push_str("No customer data available.\n\n");
        return section;
    }

    section.push_str("| Customer | Orders | Total Spent |\n");
    section.push_str("|----------|--------|-------------|\n");

    for (email, summary) in top_customers(customers, customers.len()) {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(email),
            summary.orders_count,
            summary.total_spent
        ));
    }
    section.push('\n');

    section
}

/// Generate the AI insight section.
fn generate_insight_section(insight: &Insight) -> String {
    format!("## AI Insights\n\n{}\n\n", insight)
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by StorePulse*\n".to_string()
}

/// Make `text` safe inside a single table row.
fn escape_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

//! Data models for store orders and the statistics derived from them.
//!
//! Orders are deserialized leniently: fields the aggregators depend on are
//! wrapped in [`Lenient`] so a structurally wrong value survives the fetch
//! and is reported by the aggregation step instead of failing the download.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Text reported when the language model could not produce recommendations.
pub const FALLBACK_INSIGHT: &str = "⚠️ Could not generate AI recommendations.";

/// Customer key used when an order carries no billing email.
pub const UNKNOWN_CUSTOMER: &str = "unknown";

/// A field that either has the expected shape or is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(Value),
}

/// One element of the orders array. Elements that are not JSON objects
/// are kept raw and reported by the aggregators.
pub type OrderRecord = Lenient<Order>;

/// One order as returned by the WooCommerce `orders` endpoint.
///
/// Only the fields the statistics need are modelled; everything else in the
/// payload is ignored. Only JSON objects deserialize into an `Order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Order {
    /// Store-assigned order id.
    pub id: Option<Value>,

    /// Billing details of the customer.
    pub billing: Option<Lenient<Billing>>,

    /// Order total, a decimal string in WooCommerce payloads.
    pub total: Option<Value>,

    /// Purchased products.
    pub line_items: Option<Lenient<Vec<LineItem>>>,
}

impl TryFrom<Map<String, Value>> for Order {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut take = |name: &str| fields.remove(name).unwrap_or(Value::Null);

        Ok(Order {
            id: serde_json::from_value(take("id"))?,
            billing: serde_json::from_value(take("billing"))?,
            total: serde_json::from_value(take("total"))?,
            line_items: serde_json::from_value(take("line_items"))?,
        })
    }
}

impl Order {
    /// Human-readable order id for log lines.
    pub fn label(&self) -> String {
        match &self.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "?".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Parsed order total. Absent or unparseable totals count as zero.
    pub fn total_amount(&self) -> Decimal {
        let parsed = match &self.total {
            Some(Value::String(s)) => parse_decimal(s.trim()),
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            _ => None,
        };
        parsed.unwrap_or(Decimal::ZERO)
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Billing section of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    /// Scalar emails are kept in their string form.
    #[serde(default, deserialize_with = "scalar_text")]
    pub email: Option<String>,
}

/// One product/quantity pair within an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name. Missing names become the empty string; numbers and
    /// booleans are kept in their string form.
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,

    /// Units purchased. Non-numeric or negative quantities count as zero.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u64,
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or scalar, found {}",
            other
        ))),
    }
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(&value))
}

fn quantity_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Units sold per product name.
pub type ProductStats = BTreeMap<String, u64>;

/// Order count and spend per customer email.
pub type CustomerStats = BTreeMap<String, CustomerSummary>;

/// Aggregated activity of one customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Number of orders placed.
    pub orders_count: u64,
    /// Sum of the order totals.
    pub total_spent: Decimal,
}

/// Natural-language recommendations for the store owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    /// Text produced by the language model.
    Generated(String),
    /// The model call failed; renders as [`FALLBACK_INSIGHT`].
    Fallback,
}

impl Insight {
    pub fn as_str(&self) -> &str {
        match self {
            Insight::Generated(text) => text,
            Insight::Fallback => FALLBACK_INSIGHT,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Insight::Fallback)
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Metadata about one run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Base URL of the store that was queried.
    pub store_url: String,
    /// Time the run finished.
    pub generated_at: DateTime<Utc>,
    /// Lower bound of the order creation window.
    pub orders_since: DateTime<Utc>,
    /// Number of orders fetched.
    pub orders_count: usize,
    /// Language model used for the insight.
    pub model_used: String,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: ReportMetadata,
    pub products: ProductStats,
    pub customers: CustomerStats,
    pub insight: Insight,
}

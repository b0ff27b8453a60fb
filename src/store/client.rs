//! WooCommerce REST client.
//!
//! Fetches a single page of recent orders using HTTP Basic authentication
//! with the store's consumer key and secret.

use crate::config::StoreSettings;
use crate::error::FetchError;
use crate::models::OrderRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::StatusCode;
use tracing::{debug, info};

/// Maximum number of orders requested per run.
pub const PAGE_SIZE: u32 = 50;

/// How far back the order window reaches.
pub const LOOKBACK_DAYS: i64 = 30;

/// Start of the order window for a run starting at `now`.
pub fn lookback_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(LOOKBACK_DAYS)
}

/// Query parameters for the orders endpoint.
pub fn orders_query(since: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("per_page", PAGE_SIZE.to_string()),
        ("after", since.to_rfc3339_opts(SecondsFormat::Millis, true)),
    ]
}

/// Anything that can supply the order batch for a run.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Base URL of the store, for reporting.
    fn store_url(&self) -> &str;

    /// Fetch orders created after `since`, in the order the source returns them.
    async fn fetch_orders(&self, since: DateTime<Utc>) -> Result<Vec<OrderRecord>, FetchError>;
}

/// Client for the WooCommerce `orders` endpoint.
pub struct WooCommerceClient {
    settings: StoreSettings,
    http_client: reqwest::Client,
}

impl WooCommerceClient {
    pub fn new(settings: StoreSettings) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            settings,
            http_client,
        })
    }

    /// Full URL of the orders endpoint.
    pub fn orders_url(&self) -> String {
        format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.orders_path
        )
    }

    fn classify(&self, err: reqwest::Error, url: &str) -> FetchError {
        if err.is_builder() {
            FetchError::InvalidUrl {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_timeout() {
            FetchError::Timeout {
                seconds: self.settings.timeout_seconds,
                source: err,
            }
        } else if err.is_connect() {
            FetchError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl OrderSource for WooCommerceClient {
    fn store_url(&self) -> &str {
        &self.settings.base_url
    }

    async fn fetch_orders(&self, since: DateTime<Utc>) -> Result<Vec<OrderRecord>, FetchError> {
        let url = self.orders_url();
        let query = orders_query(since);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.settings.api_key, Some(&self.settings.api_secret))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.classify(e, &url))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized { status });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        // A `null` body means no orders.
        let orders: Vec<OrderRecord> = response
            .json::<Option<Vec<OrderRecord>>>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.classify(e, &url)
                } else {
                    FetchError::Decode(e)
                }
            })?
            .unwrap_or_default();

        info!("Fetched {} orders from {}", orders.len(), url);
        Ok(orders)
    }
}

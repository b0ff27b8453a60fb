//! Error types.
//!
//! Fetching is fail-hard and surfaces a [`FetchError`] to the runner.
//! Aggregation and insight generation are fail-soft: their errors are
//! logged by the caller and replaced with a default value.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving orders from the store API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid store URL {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot connect to store at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store request timed out after {seconds}s")]
    Timeout {
        seconds: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("store rejected the API credentials ({status})")]
    Unauthorized { status: StatusCode },

    #[error("store API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode orders response")]
    Decode(#[source] reqwest::Error),

    #[error("store request failed")]
    Request(#[source] reqwest::Error),
}

/// Structural problem found while reducing an order batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("order #{index} (id {order}) has malformed line_items")]
    MalformedLineItems { order: String, index: usize },

    #[error("order #{index} (id {order}) has malformed billing details")]
    MalformedBilling { order: String, index: usize },

    #[error("order #{index} is not an order object")]
    MalformedOrder { index: usize },

    #[error("order #{index} (id {order}) overflows the quantity of {product:?}")]
    QuantityOverflow {
        order: String,
        index: usize,
        product: String,
    },

    #[error("order #{index} (id {order}) overflows the spend of {customer}")]
    SpendOverflow {
        order: String,
        index: usize,
        customer: String,
    },
}

/// Failure while asking the language model for recommendations.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("cannot connect to language model API at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("language model request timed out after {seconds}s")]
    Timeout {
        seconds: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("language model API rejected the API key ({status})")]
    Unauthorized { status: StatusCode },

    #[error("language model API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode language model response")]
    Decode(#[source] reqwest::Error),

    #[error("language model request failed")]
    Request(#[source] reqwest::Error),

    #[error("language model returned no choices")]
    NoChoices,

    #[error("language model choice has no message content")]
    MissingContent,
}

/// Configuration could not be loaded or is incomplete.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value {0}")]
    Missing(&'static str),

    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

//! Order source for the store API.
//!
//! This module provides the WooCommerce client and the [`OrderSource`]
//! seam the runner depends on.

pub mod client;

pub use client::{lookback_start, OrderSource, WooCommerceClient};

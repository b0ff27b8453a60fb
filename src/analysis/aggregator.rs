//! Order aggregation and statistics.
//!
//! This module reduces a batch of orders to per-product quantities and
//! per-customer spend, plus ranking helpers used by the reports.
//!
//! Both reducers return an [`AggregateError`] when an order is structurally
//! malformed; the caller decides which default to fall back to.

use crate::error::AggregateError;
use crate::models::{
    CustomerStats, CustomerSummary, Lenient, Order, OrderRecord, ProductStats, UNKNOWN_CUSTOMER,
};

fn order_at(record: &OrderRecord, index: usize) -> Result<&Order, AggregateError> {
    match record {
        Lenient::Valid(order) => Ok(order),
        Lenient::Malformed(_) => Err(AggregateError::MalformedOrder { index }),
    }
}

/// Sum line-item quantities per product name across all orders.
pub fn summarize_products(orders: &[OrderRecord]) -> Result<ProductStats, AggregateError> {
    let mut stats = ProductStats::new();

    for (index, record) in orders.iter().enumerate() {
        let order = order_at(record, index)?;
        let items = match &order.line_items {
            None => continue,
            Some(Lenient::Valid(items)) => items,
            Some(Lenient::Malformed(_)) => {
                return Err(AggregateError::MalformedLineItems {
                    order: order.label(),
                    index,
                })
            }
        };

        for item in items {
            let qty = stats.entry(item.name.clone()).or_insert(0);
            *qty = qty
                .checked_add(item.quantity)
                .ok_or_else(|| AggregateError::QuantityOverflow {
                    order: order.label(),
                    index,
                    product: item.name.clone(),
                })?;
        }
    }

    Ok(stats)
}

/// Count orders and sum totals per billing email.
///
/// Orders without a billing email are grouped under [`UNKNOWN_CUSTOMER`].
/// Emails are compared verbatim.
pub fn summarize_customers(orders: &[OrderRecord]) -> Result<CustomerStats, AggregateError> {
    let mut customers = CustomerStats::new();

    for (index, record) in orders.iter().enumerate() {
        let order = order_at(record, index)?;
        let email = match &order.billing {
            None => None,
            Some(Lenient::Valid(billing)) => billing.email.as_deref(),
            Some(Lenient::Malformed(_)) => {
                return Err(AggregateError::MalformedBilling {
                    order: order.label(),
                    index,
                })
            }
        };

        let key = match email {
            Some(email) if !email.is_empty() => email,
            _ => UNKNOWN_CUSTOMER,
        };

        let entry = customers.entry(key.to_string()).or_default();
        entry.orders_count += 1;
        entry.total_spent = entry
            .total_spent
            .checked_add(order.total_amount())
            .ok_or_else(|| AggregateError::SpendOverflow {
                order: order.label(),
                index,
                customer: key.to_string(),
            })?;
    }

    Ok(customers)
}

/// Best-selling products, highest quantity first. Ties sort by name.
pub fn top_products(stats: &ProductStats, n: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = stats
        .iter()
        .map(|(name, qty)| (name.as_str(), *qty))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);
    ranked
}

/// Customers ranked by total spend, highest first. Ties sort by email.
pub fn top_customers(stats: &CustomerStats, n: usize) -> Vec<(&str, &CustomerSummary)> {
    let mut ranked: Vec<(&str, &CustomerSummary)> = stats
        .iter()
        .map(|(email, summary)| (email.as_str(), summary))
        .collect();

    ranked.sort_by(|a, b| {
        b.1.total_spent
            .cmp(&a.1.total_spent)
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.truncate(n);
    ranked
}

/// Total units sold across all products, saturating at `u64::MAX`.
pub fn total_units(stats: &ProductStats) -> u64 {
    stats
        .values()
        .fold(0u64, |total, qty| total.saturating_add(*qty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn orders(value: serde_json::Value) -> Vec<OrderRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summarize_products() {
        let batch = orders(json!([
            { "line_items": [{ "name": "A", "quantity": 2 }] },
            { "line_items": [{ "name": "A", "quantity": 3 }, { "name": "B", "quantity": 1 }] }
        ]));

        let stats = summarize_products(&batch).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.get("A"), Some(&5));
        assert_eq!(stats.get("B"), Some(&1));
        assert_eq!(stats.get("C"), None);
    }

    #[test]
    fn test_summarize_products_skips_empty_orders() {
        let batch = orders(json!([
            {},
            { "line_items": [] },
            { "line_items": [{ "name": "A", "quantity": "bad" }] },
            { "line_items": [{ "name": "B", "quantity": 4 }] }
        ]));

        let stats = summarize_products(&batch).unwrap();

        assert_eq!(stats.get("A"), Some(&0));
        assert_eq!(stats.get("B"), Some(&4));
    }

    #[test]
    fn test_summarize_products_malformed() {
        let batch = orders(json!([
            { "id": 1, "line_items": [{ "name": "A", "quantity": 2 }] },
            { "id": 2, "line_items": { "name": "A" } }
        ]));

        let err = summarize_products(&batch).unwrap_err();
        assert_eq!(
            err,
            AggregateError::MalformedLineItems {
                order: "2".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_summarize_products_rejects_non_object_order() {
        let batch = orders(json!([
            { "line_items": [{ "name": "A", "quantity": 1 }] },
            null
        ]));

        let err = summarize_products(&batch).unwrap_err();
        assert_eq!(err, AggregateError::MalformedOrder { index: 1 });

        let err = summarize_customers(&batch).unwrap_err();
        assert_eq!(err, AggregateError::MalformedOrder { index: 1 });
    }

    #[test]
    fn test_summarize_products_quantity_overflow() {
        let batch = orders(json!([
            { "id": 1, "line_items": [{ "name": "A", "quantity": u64::MAX }] },
            { "id": 2, "line_items": [{ "name": "A", "quantity": 1 }] }
        ]));

        let err = summarize_products(&batch).unwrap_err();
        assert_eq!(
            err,
            AggregateError::QuantityOverflow {
                order: "2".to_string(),
                index: 1,
                product: "A".to_string(),
            }
        );
    }

    #[test]
    fn test_summarize_customers_spend_overflow() {
        let batch = orders(json!([
            { "id": 1, "billing": { "email": "x@y.com" }, "total": "79228162514264337593543950335" },
            { "id": 2, "billing": { "email": "x@y.com" }, "total": "1" }
        ]));

        let err = summarize_customers(&batch).unwrap_err();
        assert_eq!(
            err,
            AggregateError::SpendOverflow {
                order: "2".to_string(),
                index: 1,
                customer: "x@y.com".to_string(),
            }
        );
    }

    #[test]
    fn test_total_units_saturates() {
        let stats: ProductStats = [("A", u64::MAX), ("B", 3)]
            .into_iter()
            .map(|(n, q)| (n.to_string(), q))
            .collect();

        assert_eq!(total_units(&stats), u64::MAX);
    }

    #[test]
    fn test_summarize_customers() {
        let batch = orders(json!([
            { "billing": { "email": "x@y.com" }, "total": "10.50" },
            { "billing": { "email": "x@y.com" }, "total": "5" },
            { "total": "2" }
        ]));

        let customers = summarize_customers(&batch).unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(
            customers["x@y.com"],
            CustomerSummary {
                orders_count: 2,
                total_spent: Decimal::new(155, 1),
            }
        );
        assert_eq!(
            customers[UNKNOWN_CUSTOMER],
            CustomerSummary {
                orders_count: 1,
                total_spent: Decimal::new(2, 0),
            }
        );
    }

    #[test]
    fn test_summarize_customers_keys() {
        let batch = orders(json!([
            { "billing": { "email": "" }, "total": "1" },
            { "billing": {}, "total": null },
            { "billing": { "email": "X@y.com" }, "total": "abc" },
            { "billing": { "email": "x@y.com" } }
        ]));

        let customers = summarize_customers(&batch).unwrap();

        assert_eq!(customers[UNKNOWN_CUSTOMER].orders_count, 2);
        assert_eq!(customers[UNKNOWN_CUSTOMER].total_spent, Decimal::ONE);
        assert_eq!(customers["X@y.com"].orders_count, 1);
        assert_eq!(customers["X@y.com"].total_spent, Decimal::ZERO);
        assert_eq!(customers["x@y.com"].orders_count, 1);
    }

    #[test]
    fn test_orders_count_matches_batch_size() {
        let batch = orders(json!([
            { "billing": { "email": "a@x.com" }, "total": "3.10" },
            { "billing": { "email": "b@x.com" }, "total": 7 },
            { "billing": { "email": "a@x.com" }, "total": "1" },
            {},
            { "billing": { "email": "c@x.com" } }
        ]));

        let customers = summarize_customers(&batch).unwrap();
        let counted: u64 = customers.values().map(|c| c.orders_count).sum();

        assert_eq!(counted, batch.len() as u64);
    }

    #[test]
    fn test_summarize_customers_malformed() {
        let batch = orders(json!([{ "id": "A-9", "billing": "x@y.com" }]));

        let err = summarize_customers(&batch).unwrap_err();
        assert_eq!(
            err,
            AggregateError::MalformedBilling {
                order: "A-9".to_string(),
                index: 0
            }
        );
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let batch = orders(json!([
            { "billing": { "email": "a@x.com" }, "total": "4.99",
              "line_items": [{ "name": "Mug", "quantity": 2 }] },
            { "total": "12", "line_items": [{ "name": "Tee", "quantity": 1 }] }
        ]));

        assert_eq!(
            summarize_products(&batch).unwrap(),
            summarize_products(&batch).unwrap()
        );
        assert_eq!(
            summarize_customers(&batch).unwrap(),
            summarize_customers(&batch).unwrap()
        );
    }

    #[test]
    fn test_top_products() {
        let stats: ProductStats = [("Mug", 3), ("Cap", 7), ("Tee", 3), ("Pin", 1)]
            .into_iter()
            .map(|(n, q)| (n.to_string(), q))
            .collect();

        let top = top_products(&stats, 3);

        assert_eq!(top, vec![("Cap", 7), ("Mug", 3), ("Tee", 3)]);
        assert_eq!(total_units(&stats), 14);
    }

    #[test]
    fn test_top_customers() {
        let batch = orders(json!([
            { "billing": { "email": "low@x.com" }, "total": "5" },
            { "billing": { "email": "high@x.com" }, "total": "50" },
            { "billing": { "email": "mid@x.com" }, "total": "20" },
            { "billing": { "email": "low@x.com" }, "total": "1.5" }
        ]));
        let customers = summarize_customers(&batch).unwrap();

        let top = top_customers(&customers, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "high@x.com");
        assert_eq!(top[1].0, "mid@x.com");
    }
}

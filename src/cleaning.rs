//! Coerces the timestamp columns of the orders table into typed values.
//!
//! The source data carries dates as plain text and occasionally holds
//! malformed or empty values. Parsing is tolerant: a value that cannot be
//! parsed becomes `None` instead of aborting the run.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::models::{Order, OrderCsv};

/// The orders-table columns that hold date/time text.
pub const ORDER_DATE_COLUMNS: [&str; 3] = [
    "order_purchase_timestamp",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
];

/// Parse a timestamp cell. Accepts `YYYY-MM-DD HH:MM:SS` and the date-only
/// form `YYYY-MM-DD` (normalized to midnight). Anything else, including an
/// empty cell, is `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

/// Convert raw order rows into typed records. Metric fields are left at
/// their defaults for the metrics step to fill in.
pub fn clean_orders(raw: &[OrderCsv]) -> Vec<Order> {
    let mut coerced_to_null = 0usize;

    let orders = raw
        .iter()
        .map(|row| {
            let purchased_at = parse_timestamp(&row.order_purchase_timestamp);
            let delivered_at = row
                .order_delivered_customer_date
                .as_deref()
                .and_then(parse_timestamp);
            let estimated_delivery_at = parse_timestamp(&row.order_estimated_delivery_date);

            if purchased_at.is_none() && !row.order_purchase_timestamp.trim().is_empty() {
                coerced_to_null += 1;
            }
            if estimated_delivery_at.is_none()
                && !row.order_estimated_delivery_date.trim().is_empty()
            {
                coerced_to_null += 1;
            }
            if delivered_at.is_none()
                && row
                    .order_delivered_customer_date
                    .as_deref()
                    .is_some_and(|v| !v.trim().is_empty())
            {
                coerced_to_null += 1;
            }

            Order {
                order_id: row.order_id.clone(),
                customer_id: row.customer_id.clone(),
                status: row.order_status.clone(),
                purchased_at,
                delivered_at,
                estimated_delivery_at,
                delivery_time_days: None,
                late_delivery_days: 0,
            }
        })
        .collect();

    if coerced_to_null > 0 {
        warn!(
            "Coerced {} unparseable timestamp values to null across {:?}",
            coerced_to_null, ORDER_DATE_COLUMNS
        );
    }

    orders
}

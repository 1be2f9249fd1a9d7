//! Derives the two per-order delivery metrics from cleaned timestamps.

use chrono::NaiveDateTime;

use crate::models::Order;

/// Whole days from purchase to customer delivery, truncated toward zero.
/// `None` when either timestamp is missing.
pub fn delivery_time_days(
    purchased_at: Option<NaiveDateTime>,
    delivered_at: Option<NaiveDateTime>,
) -> Option<i64> {
    match (purchased_at, delivered_at) {
        (Some(purchased), Some(delivered)) => Some((delivered - purchased).num_days()),
        _ => None,
    }
}

/// Whole days delivered after the estimated date, clamped at zero.
///
/// Undelivered orders and early deliveries both map to 0: the metric only
/// measures lateness. `Order::delivery_status` keeps the pending case
/// distinguishable.
pub fn late_delivery_days(
    delivered_at: Option<NaiveDateTime>,
    estimated_delivery_at: Option<NaiveDateTime>,
) -> i64 {
    match (delivered_at, estimated_delivery_at) {
        (Some(delivered), Some(estimated)) => (delivered - estimated).num_days().max(0),
        _ => 0,
    }
}

/// Fill in both derived metric fields on every order.
pub fn derive_delivery_metrics(orders: &mut [Order]) {
    for order in orders.iter_mut() {
        order.delivery_time_days = delivery_time_days(order.purchased_at, order.delivered_at);
        order.late_delivery_days =
            late_delivery_days(order.delivered_at, order.estimated_delivery_at);
    }
}

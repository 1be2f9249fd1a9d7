//! Read-only reductions over the cleaned orders and payments tables.
//!
//! Each aggregate is an independent pass; nothing here mutates its input.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Order, Payment};

/// Descriptive statistics over one numeric metric, nulls excluded.
///
/// Measures are absent (`None`) rather than NaN when there are no values,
/// and `std` additionally needs at least two values (sample std, ddof 1).
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub count: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStats {
    pub fn describe(values: &[f64]) -> Self {
        let count = values.len() as u64;
        if values.is_empty() {
            return SummaryStats {
                count: 0,
                mean: None,
                std: None,
                min: None,
                p25: None,
                p50: None,
                p75: None,
                max: None,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std = if values.len() > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (n - 1.0)).sqrt())
        } else {
            None
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        SummaryStats {
            count,
            mean: Some(mean),
            std,
            min: Some(sorted[0]),
            p25: Some(quantile(&sorted, 0.25)),
            p50: Some(quantile(&sorted, 0.50)),
            p75: Some(quantile(&sorted, 0.75)),
            max: Some(sorted[sorted.len() - 1]),
        }
    }
}

/// Linear-interpolation quantile over an ascending-sorted non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Statistics for both derived delivery metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub delivery_time_days: SummaryStats,
    pub late_delivery_days: SummaryStats,
}

pub fn summarize_delivery_metrics(orders: &[Order]) -> MetricSummary {
    let delivery_times: Vec<f64> = orders
        .iter()
        .filter_map(|o| o.delivery_time_days)
        .map(|d| d as f64)
        .collect();
    let late_days: Vec<f64> = orders.iter().map(|o| o.late_delivery_days as f64).collect();

    MetricSummary {
        delivery_time_days: SummaryStats::describe(&delivery_times),
        late_delivery_days: SummaryStats::describe(&late_days),
    }
}

/// Percent of orders delivered after their estimated date. 0.0 for an empty
/// table. Callers round to two decimals at the presentation boundary.
pub fn late_delivery_rate(orders: &[Order]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    let late = orders.iter().filter(|o| o.late_delivery_days > 0).count();
    late as f64 / orders.len() as f64 * 100.0
}

/// Summed payment value per payment type.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTypeTotal {
    pub payment_type: String,
    pub total_value: f64,
}

/// Left outer join of orders to payments on `order_id`, grouped by payment
/// type, summing values. Payments whose order id does not appear in the
/// orders table are dropped; orders without payments contribute nothing to
/// any sum. Output rows are sorted ascending by payment-type name so the
/// grouping order is reproducible.
pub fn payment_totals_by_type(orders: &[Order], payments: &[Payment]) -> Vec<PaymentTypeTotal> {
    let order_ids: HashSet<&str> = orders.iter().map(|o| o.order_id.as_str()).collect();

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for payment in payments {
        if order_ids.contains(payment.order_id.as_str()) {
            *totals.entry(payment.payment_type.to_string()).or_insert(0.0) += payment.value;
        }
    }

    totals
        .into_iter()
        .map(|(payment_type, total_value)| PaymentTypeTotal {
            payment_type,
            total_value,
        })
        .collect()
}

/// One row of the daily order trend.
#[derive(Debug, Clone, Serialize)]
pub struct DailyOrderCount {
    pub date: NaiveDate,
    pub order_count: u64,
}

/// Orders per purchase calendar date, ascending by date. Orders whose
/// purchase timestamp failed to parse are excluded.
pub fn daily_order_trend(orders: &[Order]) -> Vec<DailyOrderCount> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for order in orders {
        if let Some(purchased) = order.purchased_at {
            *counts.entry(purchased.date()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(date, order_count)| DailyOrderCount { date, order_count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentType;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn order(id: &str, purchased: Option<&str>, late_days: i64) -> Order {
        Order {
            order_id: id.to_string(),
            customer_id: format!("c-{id}"),
            status: "delivered".to_string(),
            purchased_at: purchased.map(ts),
            delivered_at: None,
            estimated_delivery_at: None,
            delivery_time_days: None,
            late_delivery_days: late_days,
        }
    }

    fn payment(order_id: &str, payment_type: &str, value: f64) -> Payment {
        Payment {
            order_id: order_id.to_string(),
            sequential: 1,
            payment_type: PaymentType::from(payment_type),
            installments: 1,
            value,
        }
    }

    #[test]
    fn test_describe_known_values() {
        let stats = SummaryStats::describe(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.p25, Some(1.75));
        assert_eq!(stats.p50, Some(2.5));
        assert_eq!(stats.p75, Some(3.25));
        // Sample std of 1..4
        let std = stats.std.unwrap();
        assert!((std - 1.2909944487).abs() < 1e-9);
    }

    #[test]
    fn test_describe_empty_and_singleton() {
        let empty = SummaryStats::describe(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.std, None);

        let one = SummaryStats::describe(&[4.0]);
        assert_eq!(one.count, 1);
        assert_eq!(one.mean, Some(4.0));
        assert_eq!(one.std, None);
        assert_eq!(one.p50, Some(4.0));
    }

    #[test]
    fn test_summary_ignores_null_delivery_times() {
        let mut orders = vec![order("o1", None, 0), order("o2", None, 0)];
        orders[0].delivery_time_days = Some(4);

        let summary = summarize_delivery_metrics(&orders);
        assert_eq!(summary.delivery_time_days.count, 1);
        assert_eq!(summary.delivery_time_days.mean, Some(4.0));
        // late_delivery_days has no nulls, every order counts
        assert_eq!(summary.late_delivery_days.count, 2);
    }

    #[test]
    fn test_late_rate_half_late() {
        let orders = vec![
            order("o1", None, 0),
            order("o2", None, 1),
            order("o3", None, 0),
            order("o4", None, 2),
        ];
        let rate = late_delivery_rate(&orders);
        assert_eq!(format!("{rate:.2}"), "50.00");
    }

    #[test]
    fn test_late_rate_empty_table() {
        assert_eq!(late_delivery_rate(&[]), 0.0);
    }

    #[test]
    fn test_payment_totals_sums_split_payments() {
        let orders = vec![order("o1", None, 0)];
        let payments = vec![
            payment("o1", "credit_card", 100.0),
            payment("o1", "credit_card", 50.0),
        ];

        let totals = payment_totals_by_type(&orders, &payments);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].payment_type, "credit_card");
        assert_eq!(totals[0].total_value, 150.0);
    }

    #[test]
    fn test_payment_totals_drops_unmatched_and_sorts_by_type() {
        let orders = vec![order("o1", None, 0), order("o2", None, 0)];
        let payments = vec![
            payment("o2", "voucher", 20.0),
            payment("o1", "boleto", 35.0),
            payment("ghost", "credit_card", 999.0),
        ];

        let totals = payment_totals_by_type(&orders, &payments);
        let types: Vec<&str> = totals.iter().map(|t| t.payment_type.as_str()).collect();
        assert_eq!(types, vec!["boleto", "voucher"]);

        // Left-join invariant: the grand total equals the sum of payment
        // values whose order id exists in the orders table.
        let grand: f64 = totals.iter().map(|t| t.total_value).sum();
        assert_eq!(grand, 55.0);
    }

    #[test]
    fn test_daily_trend_counts_and_ordering() {
        let orders = vec![
            order("o1", Some("2024-01-02 10:00:00"), 0),
            order("o2", Some("2024-01-01 09:00:00"), 0),
            order("o3", Some("2024-01-02 18:30:00"), 0),
            order("o4", None, 0),
        ];

        let trend = daily_order_trend(&orders);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date.to_string(), "2024-01-01");
        assert_eq!(trend[0].order_count, 1);
        assert_eq!(trend[1].date.to_string(), "2024-01-02");
        assert_eq!(trend[1].order_count, 2);

        // Total across rows equals the count of orders with a parsed
        // purchase timestamp.
        let total: u64 = trend.iter().map(|r| r.order_count).sum();
        assert_eq!(total, 3);
    }
}

//! Shared pipeline runner behind the REST handlers.
//!
//! One run of the pipeline produces an immutable snapshot; the service
//! memoizes the latest snapshot and rebuilds it from scratch on refresh.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::analytics::{
    daily_order_trend, late_delivery_rate, payment_totals_by_type, summarize_delivery_metrics,
    DailyOrderCount, MetricSummary, PaymentTypeTotal,
};
use crate::cleaning::clean_orders;
use crate::datasets::Datasets;
use crate::metrics::derive_delivery_metrics;
use crate::models::{Order, Payment};

/// Result of one full pipeline run: cleaned orders plus the four aggregates.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub generated_at: NaiveDateTime,
    pub table_counts: Vec<(&'static str, usize)>,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
    pub summary: MetricSummary,
    pub late_delivery_rate_pct: f64,
    pub payment_totals: Vec<PaymentTypeTotal>,
    pub daily_trend: Vec<DailyOrderCount>,
}

impl DashboardSnapshot {
    /// Load, clean, derive and aggregate in one linear pass.
    pub fn build(data_dir: &Path) -> Result<Self> {
        let datasets = Datasets::load(data_dir)?;
        let table_counts = datasets.table_counts();

        let mut orders = clean_orders(&datasets.orders);
        derive_delivery_metrics(&mut orders);

        let payments: Vec<Payment> = datasets.payments.iter().map(|p| p.to_payment()).collect();

        let summary = summarize_delivery_metrics(&orders);
        let late_delivery_rate_pct = late_delivery_rate(&orders);
        let payment_totals = payment_totals_by_type(&orders, &payments);
        let daily_trend = daily_order_trend(&orders);

        info!(
            "Snapshot built: {} orders, late rate {:.2}%, {} payment types, {} trend days",
            orders.len(),
            late_delivery_rate_pct,
            payment_totals.len(),
            daily_trend.len(),
        );

        Ok(DashboardSnapshot {
            generated_at: chrono::Utc::now().naive_utc(),
            table_counts,
            orders,
            payments,
            summary,
            late_delivery_rate_pct,
            payment_totals,
            daily_trend,
        })
    }
}

/// Memoizing wrapper shared by all handlers.
pub struct DashboardService {
    data_dir: PathBuf,
    cache: RwLock<Option<Arc<DashboardSnapshot>>>,
}

impl DashboardService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: RwLock::new(None),
        }
    }

    /// Current snapshot, building one on first use.
    pub async fn snapshot(&self) -> Result<Arc<DashboardSnapshot>> {
        if let Some(snapshot) = self.cache.read().await.as_ref() {
            return Ok(snapshot.clone());
        }
        self.refresh().await
    }

    /// Re-run the whole pipeline from the input files.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        let snapshot = Arc::new(DashboardSnapshot::build(&self.data_dir)?);
        *self.cache.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;
    use std::fs;
    use tempfile::TempDir;

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(datasets::ORDERS_FILE),
            "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date\n\
             o1,c1,delivered,2024-01-01 10:00:00,,,2024-01-05 14:00:00,2024-01-04 00:00:00\n\
             o2,c2,shipped,2024-01-02 09:30:00,,,,2024-01-09 00:00:00\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::CUSTOMERS_FILE),
            "customer_id,customer_unique_id,customer_zip_code_prefix,customer_city,customer_state\nc1,u1,01310,sao paulo,SP\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::ORDER_ITEMS_FILE),
            "order_id,order_item_id,product_id,seller_id,shipping_limit_date,price,freight_value\no1,1,p1,s1,2024-01-03 00:00:00,59.90,12.50\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::PRODUCTS_FILE),
            "product_id,product_category_name,product_weight_g,product_length_cm,product_height_cm,product_width_cm\np1,electronics,500,20,10,15\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::SELLERS_FILE),
            "seller_id,seller_zip_code_prefix,seller_city,seller_state\ns1,04571,sao paulo,SP\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::PAYMENTS_FILE),
            "order_id,payment_sequential,payment_type,payment_installments,payment_value\n\
             o1,1,credit_card,3,72.40\n\
             o2,1,boleto,1,35.00\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(datasets::REVIEWS_FILE),
            "review_id,order_id,review_score,review_creation_date,review_answer_timestamp\nr1,o1,5,2024-01-06 00:00:00,\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_snapshot_build_end_to_end() {
        let dir = fixture_dir();
        let snapshot = DashboardSnapshot::build(dir.path()).unwrap();

        assert_eq!(snapshot.orders.len(), 2);
        assert_eq!(snapshot.orders[0].delivery_time_days, Some(4));
        assert_eq!(snapshot.orders[0].late_delivery_days, 1);
        assert_eq!(snapshot.orders[1].delivery_time_days, None);

        // One of two orders is late
        assert_eq!(format!("{:.2}", snapshot.late_delivery_rate_pct), "50.00");

        let types: Vec<&str> = snapshot
            .payment_totals
            .iter()
            .map(|t| t.payment_type.as_str())
            .collect();
        assert_eq!(types, vec!["boleto", "credit_card"]);

        assert_eq!(snapshot.daily_trend.len(), 2);
    }

    #[tokio::test]
    async fn test_service_memoizes_until_refresh() {
        let dir = fixture_dir();
        let service = DashboardService::new(dir.path());

        let first = service.snapshot().await.unwrap();
        let second = service.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let rebuilt = service.refresh().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
    }
}

//! Loads the seven e-commerce CSV datasets into typed in-memory tables.

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::models::{
    CustomerCsv, OrderCsv, OrderItemCsv, PaymentCsv, ProductCsv, ReviewCsv, SellerCsv,
};

pub const ORDERS_FILE: &str = "orders_dataset.csv";
pub const CUSTOMERS_FILE: &str = "customers_dataset.csv";
pub const ORDER_ITEMS_FILE: &str = "order_items_dataset.csv";
pub const PRODUCTS_FILE: &str = "products_dataset.csv";
pub const SELLERS_FILE: &str = "sellers_dataset.csv";
pub const PAYMENTS_FILE: &str = "order_payments_dataset.csv";
pub const REVIEWS_FILE: &str = "order_reviews_dataset.csv";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {path}")]
    Missing { path: PathBuf },

    #[error("malformed csv in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// All seven source tables, loaded eagerly into memory.
#[derive(Debug, Default)]
pub struct Datasets {
    pub orders: Vec<OrderCsv>,
    pub customers: Vec<CustomerCsv>,
    pub order_items: Vec<OrderItemCsv>,
    pub products: Vec<ProductCsv>,
    pub sellers: Vec<SellerCsv>,
    pub payments: Vec<PaymentCsv>,
    pub reviews: Vec<ReviewCsv>,
}

impl Datasets {
    /// Read all seven files from `dir`. Any missing file or structurally
    /// malformed row aborts the load.
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let datasets = Datasets {
            orders: load_table(dir, ORDERS_FILE)?,
            customers: load_table(dir, CUSTOMERS_FILE)?,
            order_items: load_table(dir, ORDER_ITEMS_FILE)?,
            products: load_table(dir, PRODUCTS_FILE)?,
            sellers: load_table(dir, SELLERS_FILE)?,
            payments: load_table(dir, PAYMENTS_FILE)?,
            reviews: load_table(dir, REVIEWS_FILE)?,
        };

        info!(
            "Loaded {} orders, {} customers, {} items, {} products, {} sellers, {} payments, {} reviews",
            datasets.orders.len(),
            datasets.customers.len(),
            datasets.order_items.len(),
            datasets.products.len(),
            datasets.sellers.len(),
            datasets.payments.len(),
            datasets.reviews.len(),
        );

        Ok(datasets)
    }

    /// Row counts per table, in load order, for the dataset overview.
    pub fn table_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("orders", self.orders.len()),
            ("customers", self.customers.len()),
            ("order_items", self.order_items.len()),
            ("products", self.products.len()),
            ("sellers", self.sellers.len()),
            ("payments", self.payments.len()),
            ("reviews", self.reviews.len()),
        ]
    }
}

fn load_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, DatasetError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(DatasetError::Missing { path });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .map_err(|source| DatasetError::Malformed {
            path: path.clone(),
            source,
        })?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|source| DatasetError::Malformed {
            path: path.clone(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        dir
    }

    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join(ORDERS_FILE),
            "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date\n\
             o1,c1,delivered,2024-01-01 10:00:00,2024-01-01 11:00:00,2024-01-02 08:00:00,2024-01-05 14:00:00,2024-01-04 00:00:00\n\
             o2,c2,shipped,2024-01-02 09:30:00,2024-01-02 10:00:00,2024-01-03 08:00:00,,2024-01-09 00:00:00\n",
        )
        .unwrap();
        fs::write(
            dir.join(CUSTOMERS_FILE),
            "customer_id,customer_unique_id,customer_zip_code_prefix,customer_city,customer_state\n\
             c1,u1,01310,sao paulo,SP\n\
             c2,u2,20040,rio de janeiro,RJ\n",
        )
        .unwrap();
        fs::write(
            dir.join(ORDER_ITEMS_FILE),
            "order_id,order_item_id,product_id,seller_id,shipping_limit_date,price,freight_value\n\
             o1,1,p1,s1,2024-01-03 00:00:00,59.90,12.50\n",
        )
        .unwrap();
        fs::write(
            dir.join(PRODUCTS_FILE),
            "product_id,product_category_name,product_weight_g,product_length_cm,product_height_cm,product_width_cm\n\
             p1,electronics,500,20,10,15\n",
        )
        .unwrap();
        fs::write(
            dir.join(SELLERS_FILE),
            "seller_id,seller_zip_code_prefix,seller_city,seller_state\n\
             s1,04571,sao paulo,SP\n",
        )
        .unwrap();
        fs::write(
            dir.join(PAYMENTS_FILE),
            "order_id,payment_sequential,payment_type,payment_installments,payment_value\n\
             o1,1,credit_card,3,72.40\n\
             o2,1,boleto,1,35.00\n",
        )
        .unwrap();
        fs::write(
            dir.join(REVIEWS_FILE),
            "review_id,order_id,review_score,review_creation_date,review_answer_timestamp\n\
             r1,o1,5,2024-01-06 00:00:00,2024-01-07 12:00:00\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_fixture_dir() {
        let dir = write_fixture_dir();
        let datasets = Datasets::load(dir.path()).unwrap();

        assert_eq!(datasets.orders.len(), 2);
        assert_eq!(datasets.payments.len(), 2);
        assert_eq!(datasets.customers.len(), 2);
        assert_eq!(datasets.orders[0].order_id, "o1");
        // Empty delivered field parses as None
        assert!(datasets.orders[1].order_delivered_customer_date.is_none());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = write_fixture_dir();
        fs::remove_file(dir.path().join(REVIEWS_FILE)).unwrap();

        let err = Datasets::load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Missing { .. }));
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = write_fixture_dir();
        // Payment value is not numeric
        fs::write(
            dir.path().join(PAYMENTS_FILE),
            "order_id,payment_sequential,payment_type,payment_installments,payment_value\n\
             o1,1,credit_card,3,not-a-number\n",
        )
        .unwrap();

        let err = Datasets::load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
    }

    #[test]
    fn test_table_counts_cover_all_seven() {
        let dir = write_fixture_dir();
        let datasets = Datasets::load(dir.path()).unwrap();
        let counts = datasets.table_counts();
        assert_eq!(counts.len(), 7);
        assert!(counts.contains(&("orders", 2)));
    }
}

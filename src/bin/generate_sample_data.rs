//! Sample dataset generator for the order analytics dashboard.
//!
//! Writes a consistent set of the seven CSV files with controlled random
//! variation, including undelivered orders and a small fraction of
//! malformed timestamps to exercise the tolerant cleaning step.
//!
//! Usage:
//!   cargo run --release --bin generate_sample_data -- [OPTIONS]

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use csv::WriterBuilder;
use ecom_insights::datasets;
use ecom_insights::models::{
    CustomerCsv, OrderCsv, OrderItemCsv, PaymentCsv, ProductCsv, ReviewCsv, SellerCsv,
};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Generate a synthetic e-commerce dataset
#[derive(Parser, Debug)]
#[command(name = "generate_sample_data")]
#[command(about = "Generate sample e-commerce CSV datasets")]
struct Args {
    /// Number of orders to generate
    #[arg(long, default_value = "500")]
    orders: usize,

    /// Number of products in the catalog
    #[arg(long, default_value = "50")]
    products: usize,

    /// Number of sellers
    #[arg(long, default_value = "20")]
    sellers: usize,

    /// Fraction of orders never delivered (0.0 - 1.0)
    #[arg(long, default_value = "0.08")]
    undelivered_rate: f64,

    /// Fraction of delivered timestamps written malformed (0.0 - 1.0)
    #[arg(long, default_value = "0.02")]
    malformed_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the seven CSV files
    #[arg(long, default_value = "data/sample")]
    out_dir: PathBuf,
}

const CITIES: [(&str, &str); 6] = [
    ("sao paulo", "SP"),
    ("rio de janeiro", "RJ"),
    ("belo horizonte", "MG"),
    ("curitiba", "PR"),
    ("porto alegre", "RS"),
    ("salvador", "BA"),
];

const CATEGORIES: [&str; 6] = [
    "electronics",
    "furniture",
    "toys",
    "books",
    "sports_leisure",
    "health_beauty",
];

const PAYMENT_TYPES: [(&str, f64); 4] = [
    ("credit_card", 0.74),
    ("boleto", 0.19),
    ("voucher", 0.04),
    ("debit_card", 0.03),
];

fn hex_id(rng: &mut StdRng) -> String {
    format!("{:032x}", rng.gen::<u128>())
}

fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn random_purchase_time(rng: &mut StdRng) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    base + Duration::days(rng.gen_range(0..540)) + Duration::seconds(rng.gen_range(0..86_400))
}

fn pick_payment_type(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.gen();
    let mut acc = 0.0;
    for (name, weight) in PAYMENT_TYPES {
        acc += weight;
        if roll < acc {
            return name;
        }
    }
    PAYMENT_TYPES[0].0
}

fn write_csv<T: serde::Serialize>(path: PathBuf, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&args.out_dir)?;

    // Catalog entities
    let products: Vec<ProductCsv> = (0..args.products)
        .map(|_| ProductCsv {
            product_id: hex_id(&mut rng),
            product_category_name: Some(CATEGORIES.choose(&mut rng).unwrap().to_string()),
            product_weight_g: Some(rng.gen_range(100.0..8000.0)),
            product_length_cm: Some(rng.gen_range(10.0..80.0)),
            product_height_cm: Some(rng.gen_range(2.0..50.0)),
            product_width_cm: Some(rng.gen_range(5.0..60.0)),
        })
        .collect();

    let sellers: Vec<SellerCsv> = (0..args.sellers)
        .map(|_| {
            let (city, state) = *CITIES.choose(&mut rng).unwrap();
            SellerCsv {
                seller_id: hex_id(&mut rng),
                seller_zip_code_prefix: format!("{:05}", rng.gen_range(1000..99000)),
                seller_city: city.to_string(),
                seller_state: state.to_string(),
            }
        })
        .collect();

    let mut customers = Vec::with_capacity(args.orders);
    let mut orders = Vec::with_capacity(args.orders);
    let mut items = Vec::new();
    let mut payments = Vec::new();
    let mut reviews = Vec::new();

    for _ in 0..args.orders {
        let order_id = hex_id(&mut rng);
        let customer_id = hex_id(&mut rng);
        let (city, state) = *CITIES.choose(&mut rng).unwrap();
        customers.push(CustomerCsv {
            customer_id: customer_id.clone(),
            customer_unique_id: hex_id(&mut rng),
            customer_zip_code_prefix: format!("{:05}", rng.gen_range(1000..99000)),
            customer_city: city.to_string(),
            customer_state: state.to_string(),
        });

        let purchased = random_purchase_time(&mut rng);
        let estimated = (purchased + Duration::days(rng.gen_range(5..=20)))
            .date()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let undelivered = rng.gen::<f64>() < args.undelivered_rate;
        let delivered = if undelivered {
            None
        } else {
            Some(
                estimated
                    + Duration::days(rng.gen_range(-4..=6))
                    + Duration::seconds(rng.gen_range(0..86_400)),
            )
        };

        let delivered_field = match delivered {
            None => None,
            // Deliberately corrupt value, cleans to null downstream
            Some(_) if rng.gen::<f64>() < args.malformed_rate => {
                Some("0000-00-00 00:00:00".to_string())
            }
            Some(ts) => Some(fmt_ts(ts)),
        };

        orders.push(OrderCsv {
            order_id: order_id.clone(),
            customer_id,
            order_status: if undelivered { "shipped" } else { "delivered" }.to_string(),
            order_purchase_timestamp: fmt_ts(purchased),
            order_approved_at: Some(fmt_ts(purchased + Duration::minutes(rng.gen_range(5..600)))),
            order_delivered_carrier_date: delivered
                .map(|ts| fmt_ts(ts - Duration::days(rng.gen_range(1..4)))),
            order_delivered_customer_date: delivered_field,
            order_estimated_delivery_date: fmt_ts(estimated),
        });

        let item_count = rng.gen_range(1..=3);
        let mut order_total = 0.0;
        for item_id in 1..=item_count {
            let product = products.choose(&mut rng).unwrap();
            let seller = sellers.choose(&mut rng).unwrap();
            let price = (rng.gen_range(10.0..300.0f64) * 100.0).round() / 100.0;
            let freight = (rng.gen_range(5.0..40.0f64) * 100.0).round() / 100.0;
            order_total += price + freight;
            items.push(OrderItemCsv {
                order_id: order_id.clone(),
                order_item_id: item_id,
                product_id: product.product_id.clone(),
                seller_id: seller.seller_id.clone(),
                shipping_limit_date: fmt_ts(purchased + Duration::days(3)),
                price,
                freight_value: freight,
            });
        }

        // Occasionally split payment across a voucher plus a main method
        let split = rng.gen::<f64>() < 0.1;
        if split {
            let voucher_part = (order_total * rng.gen_range(0.1..0.4) * 100.0).round() / 100.0;
            payments.push(PaymentCsv {
                order_id: order_id.clone(),
                payment_sequential: 1,
                payment_type: "voucher".to_string(),
                payment_installments: 1,
                payment_value: voucher_part,
            });
            payments.push(PaymentCsv {
                order_id: order_id.clone(),
                payment_sequential: 2,
                payment_type: pick_payment_type(&mut rng).to_string(),
                payment_installments: rng.gen_range(1..=10),
                payment_value: ((order_total - voucher_part) * 100.0).round() / 100.0,
            });
        } else {
            payments.push(PaymentCsv {
                order_id: order_id.clone(),
                payment_sequential: 1,
                payment_type: pick_payment_type(&mut rng).to_string(),
                payment_installments: rng.gen_range(1..=10),
                payment_value: (order_total * 100.0).round() / 100.0,
            });
        }

        if !undelivered && rng.gen::<f64>() < 0.8 {
            let created = delivered.unwrap_or(estimated) + Duration::days(1);
            reviews.push(ReviewCsv {
                review_id: hex_id(&mut rng),
                order_id: order_id.clone(),
                review_score: *[5, 5, 4, 4, 3, 2, 1].choose(&mut rng).unwrap(),
                review_creation_date: fmt_ts(created),
                review_answer_timestamp: Some(fmt_ts(created + Duration::days(2))),
            });
        }
    }

    write_csv(args.out_dir.join(datasets::ORDERS_FILE), &orders)?;
    write_csv(args.out_dir.join(datasets::CUSTOMERS_FILE), &customers)?;
    write_csv(args.out_dir.join(datasets::ORDER_ITEMS_FILE), &items)?;
    write_csv(args.out_dir.join(datasets::PRODUCTS_FILE), &products)?;
    write_csv(args.out_dir.join(datasets::SELLERS_FILE), &sellers)?;
    write_csv(args.out_dir.join(datasets::PAYMENTS_FILE), &payments)?;
    write_csv(args.out_dir.join(datasets::REVIEWS_FILE), &reviews)?;

    info!(
        "Generated {} orders, {} items, {} payments, {} reviews in {:?}",
        orders.len(),
        items.len(),
        payments.len(),
        reviews.len(),
        args.out_dir
    );

    Ok(())
}

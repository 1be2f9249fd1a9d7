//! Terminal dashboard for e-commerce order analytics.
//!
//! Runs the whole pipeline (load, clean, derive, aggregate) once and
//! renders each aggregate as text.
//!
//! Run: ./target/release/ecom_insights [data-dir]

use anyhow::Result;
use ecom_insights::api::DashboardSnapshot;
use ecom_insights::models::DeliveryStatus;
use std::env;
use std::path::PathBuf;

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(70));
    println!("  {}", title);
    println!("{}\n", "═".repeat(70));
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:>10.2}"),
        None => format!("{:>10}", "-"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    let data_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));

    let snapshot = DashboardSnapshot::build(&data_dir)?;

    println!("\n{}", "█".repeat(70));
    println!("{}  E-COMMERCE ORDER ANALYTICS  {}", "█".repeat(20), "█".repeat(20));
    println!("{}", "█".repeat(70));

    // 1. Dataset overview
    print_section_header("1. DATASET OVERVIEW");
    println!("  {:14} {:>10}", "Table", "Rows");
    println!("  {}", "─".repeat(26));
    for (table, rows) in &snapshot.table_counts {
        println!("  {:14} {:>10}", table, rows);
    }

    // 2. Delivery metric statistics
    print_section_header("2. DELIVERY PERFORMANCE STATISTICS");
    let delivery = &snapshot.summary.delivery_time_days;
    let late = &snapshot.summary.late_delivery_days;
    println!("  {:8} {:>14} {:>14}", "", "delivery_days", "late_days");
    println!("  {}", "─".repeat(40));
    println!("  {:8} {:>14} {:>14}", "count", delivery.count, late.count);
    for (label, d, l) in [
        ("mean", delivery.mean, late.mean),
        ("std", delivery.std, late.std),
        ("min", delivery.min, late.min),
        ("25%", delivery.p25, late.p25),
        ("50%", delivery.p50, late.p50),
        ("75%", delivery.p75, late.p75),
        ("max", delivery.max, late.max),
    ] {
        println!("  {:8} {:>14} {:>14}", label, fmt_stat(d), fmt_stat(l));
    }

    let mut on_time = 0usize;
    let mut late_count = 0usize;
    let mut pending = 0usize;
    for order in &snapshot.orders {
        match order.delivery_status() {
            DeliveryStatus::OnTime => on_time += 1,
            DeliveryStatus::Late(_) => late_count += 1,
            DeliveryStatus::Pending => pending += 1,
        }
    }
    println!();
    println!("  Delivered on time:  {:>8}", on_time);
    println!("  Delivered late:     {:>8}", late_count);
    println!("  Pending/undelivered:{:>8}", pending);

    // 3. Late delivery metric
    print_section_header("3. LATE DELIVERIES");
    println!(
        "  Percentage of Late Deliveries: {:.2}%",
        snapshot.late_delivery_rate_pct
    );

    // 4. Payment totals by type
    print_section_header("4. TOTAL PAYMENT VALUE BY PAYMENT TYPE");
    let max_total = snapshot
        .payment_totals
        .iter()
        .map(|t| t.total_value)
        .fold(0.0f64, f64::max)
        .max(1.0);
    println!("  {:14} {:>14}", "Type", "Total Value");
    println!("  {}", "─".repeat(62));
    for row in &snapshot.payment_totals {
        let bar_len = (row.total_value / max_total * 30.0) as usize;
        let bar: String = "█".repeat(bar_len);
        println!("  {:14} {:>14.2} {}", row.payment_type, row.total_value, bar);
    }

    // 5. Daily order trend (last 30 days with data)
    print_section_header("5. DAILY ORDER TREND");
    let total_days = snapshot.daily_trend.len();
    let total_counted: u64 = snapshot.daily_trend.iter().map(|r| r.order_count).sum();
    println!(
        "  {} distinct purchase dates, {} orders counted",
        total_days, total_counted
    );
    let tail_start = total_days.saturating_sub(30);
    let tail = &snapshot.daily_trend[tail_start..];
    let max_count = tail.iter().map(|r| r.order_count).max().unwrap_or(1).max(1);
    println!();
    println!("  {:12} {:>8}  {}", "Date", "Orders", "Trend");
    println!("  {}", "─".repeat(62));
    for row in tail {
        let bar_len = (row.order_count as f64 / max_count as f64 * 40.0) as usize;
        let bar: String = "▓".repeat(bar_len);
        println!("  {:12} {:>8}  {}", row.date.to_string(), row.order_count, bar);
    }

    println!("\n{}", "█".repeat(70));
    Ok(())
}

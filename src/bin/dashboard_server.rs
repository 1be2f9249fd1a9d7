//! REST API server for the order analytics dashboard.
//!
//! Serves every pipeline aggregate as JSON for a dashboard frontend.
//!
//! Usage:
//!   ./target/release/dashboard_server [options]
//!
//! Options:
//!   --port PORT        Port to listen on (default: 8080)
//!   --data-dir PATH    Directory holding the seven CSV files (default: data/sample)
//!
//! Endpoints:
//!   GET  /api/v1/health             - Health check
//!   GET  /api/v1/overview           - Table row counts + late rate
//!   GET  /api/v1/orders             - Cleaned orders (optional ?limit=N)
//!   GET  /api/v1/orders/summary     - Descriptive statistics
//!   GET  /api/v1/metrics/late-rate  - Late-delivery percentage
//!   GET  /api/v1/payments/by-type   - Payment totals by type
//!   GET  /api/v1/orders/daily-trend - Orders per purchase date
//!   POST /api/v1/refresh            - Re-run the pipeline from disk

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use ecom_insights::api::{handlers, DashboardService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_banner(port: u16, data_dir: &str) {
    println!("============================================================");
    println!("         E-COMMERCE ORDER ANALYTICS API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  Data:     {}", data_dir);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/v1/health              Health check");
    println!("  GET  /api/v1/overview            Dataset overview");
    println!("  GET  /api/v1/orders              Cleaned orders");
    println!("  GET  /api/v1/orders/summary      Metric statistics");
    println!("  GET  /api/v1/metrics/late-rate   Late-delivery rate");
    println!("  GET  /api/v1/payments/by-type    Payment totals");
    println!("  GET  /api/v1/orders/daily-trend  Daily order trend");
    println!("  POST /api/v1/refresh             Rebuild from disk");
    println!();
    println!("============================================================");
}

fn create_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/overview", get(handlers::overview))
        .route("/api/v1/orders", get(handlers::orders))
        .route("/api/v1/orders/summary", get(handlers::orders_summary))
        .route("/api/v1/metrics/late-rate", get(handlers::late_rate))
        .route("/api/v1/payments/by-type", get(handlers::payment_totals))
        .route("/api/v1/orders/daily-trend", get(handlers::daily_trend))
        .route("/api/v1/refresh", post(handlers::refresh))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut port: u16 = 8080;
    let mut data_dir = "data/sample".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                if i < args.len() {
                    port = args[i].parse().unwrap_or(8080);
                }
            }
            "--data-dir" => {
                i += 1;
                if i < args.len() {
                    data_dir = args[i].clone();
                }
            }
            _ => {}
        }
        i += 1;
    }

    print_banner(port, &data_dir);

    let service = Arc::new(DashboardService::new(&data_dir));

    // Build the first snapshot up front so a broken data dir fails here
    // instead of on the first request.
    service.snapshot().await?;

    let app = create_router(service);
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    tracing::info!("Starting REST server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! REST handlers exposing each aggregate as JSON.
//!
//! These are thin adapters over the shared [`DashboardService`]; the
//! presenter (dashboard frontend) consumes them directly.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::service::DashboardService;
use crate::analytics::{DailyOrderCount, MetricSummary, PaymentTypeTotal};
use crate::models::Order;

type ApiError = (StatusCode, Json<Value>);

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn internal_error(err: anyhow::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

#[derive(Serialize)]
pub struct TableCountResponse {
    pub table: String,
    pub rows: usize,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub generated_at: String,
    pub tables: Vec<TableCountResponse>,
    pub total_orders: usize,
    pub late_delivery_rate_pct: f64,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn overview(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    Ok(Json(OverviewResponse {
        generated_at: snapshot
            .generated_at
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
        tables: snapshot
            .table_counts
            .iter()
            .map(|(table, rows)| TableCountResponse {
                table: table.to_string(),
                rows: *rows,
            })
            .collect(),
        total_orders: snapshot.orders.len(),
        late_delivery_rate_pct: round2(snapshot.late_delivery_rate_pct),
    }))
}

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub limit: Option<usize>,
}

/// Cleaned orders table for inspection, first `limit` rows (default 100).
pub async fn orders(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    let limit = query.limit.unwrap_or(100).min(snapshot.orders.len());
    Ok(Json(snapshot.orders[..limit].to_vec()))
}

pub async fn orders_summary(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<MetricSummary>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    Ok(Json(snapshot.summary.clone()))
}

pub async fn late_rate(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    Ok(Json(json!({
        "late_delivery_rate_pct": round2(snapshot.late_delivery_rate_pct),
    })))
}

pub async fn payment_totals(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<Vec<PaymentTypeTotal>>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    Ok(Json(snapshot.payment_totals.clone()))
}

pub async fn daily_trend(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<Vec<DailyOrderCount>>, ApiError> {
    let snapshot = service.snapshot().await.map_err(internal_error)?;
    Ok(Json(snapshot.daily_trend.clone()))
}

pub async fn refresh(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = service.refresh().await.map_err(internal_error)?;
    Ok(Json(json!({
        "status": "refreshed",
        "total_orders": snapshot.orders.len(),
    })))
}

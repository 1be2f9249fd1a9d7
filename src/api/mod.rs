//! REST interface to the order analytics pipeline.

pub mod handlers;
pub mod service;

pub use service::{DashboardService, DashboardSnapshot};

pub mod analytics;
pub mod api;
pub mod cleaning;
pub mod datasets;
pub mod metrics;
pub mod models;

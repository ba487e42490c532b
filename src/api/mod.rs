//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod routes;
mod send;

// Re-export all handlers for use in server/app.rs
pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use send::{send_email, SendEmailResponse};

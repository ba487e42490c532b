//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::mailer::MailerStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: TemplateHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub loaded: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub emails: MailerStatsSnapshot,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let loaded = state.mailer.template_count();

    // With no templates loaded every send fails
    let status = if loaded > 0 { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        templates: TemplateHealthResponse { loaded },
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        emails: state.mailer.stats(),
    })
}

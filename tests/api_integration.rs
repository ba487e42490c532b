//! Handler-level tests wiring the HTTP layer to an in-memory transport.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::json;

use courier_mail_service::api::{health, send_email, stats};
use courier_mail_service::config::Settings;
use courier_mail_service::error::AppError;
use courier_mail_service::mailer::{Mailer, SendRequest};
use courier_mail_service::server::AppState;
use courier_mail_service::template::TemplateStore;
use courier_mail_service::transport::MemoryMailTransport;

fn test_state(transport: Arc<MemoryMailTransport>) -> AppState {
    let settings: Settings = serde_json::from_value(json!({})).unwrap();

    let mut templates = TemplateStore::new();
    templates
        .register("welcome", "<h1>Welcome, {{name}}!</h1>")
        .unwrap();

    let retry = courier_mail_service::config::RetryConfig {
        max_retries: 3,
        base_delay_ms: 1,
    };
    let mailer = Arc::new(Mailer::new(
        Arc::new(templates),
        transport,
        &settings.sender,
        &retry,
    ));

    AppState::new(settings, mailer)
}

fn send_request(to: &str, template: &str) -> SendRequest {
    serde_json::from_value(json!({
        "to": to,
        "subject": "Welcome",
        "template": template,
        "context": { "name": "Ada" },
    }))
    .unwrap()
}

#[tokio::test]
async fn send_endpoint_reports_delivery() {
    let transport = Arc::new(MemoryMailTransport::new());
    let state = test_state(transport.clone());

    let response = send_email(
        State(state),
        Json(send_request("user@example.com", "welcome")),
    )
    .await
    .unwrap();

    assert!(response.0.delivered);
    assert_eq!(transport.sent().await.len(), 1);
}

#[tokio::test]
async fn send_endpoint_rejects_invalid_recipient() {
    let state = test_state(Arc::new(MemoryMailTransport::new()));

    let result = send_email(
        State(state),
        Json(send_request("not-an-address", "welcome")),
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn send_endpoint_reports_unknown_template_as_undelivered() {
    let transport = Arc::new(MemoryMailTransport::new());
    let state = test_state(transport.clone());

    // A bad template is not an HTTP error: the contract is the boolean
    let response = send_email(
        State(state),
        Json(send_request("user@example.com", "missing")),
    )
    .await
    .unwrap();

    assert!(!response.0.delivered);
    assert_eq!(transport.delivery_attempts(), 0);
}

#[tokio::test]
async fn send_endpoint_reports_exhausted_retries_as_undelivered() {
    let transport = Arc::new(MemoryMailTransport::failing(u32::MAX));
    let state = test_state(transport.clone());

    let response = send_email(
        State(state),
        Json(send_request("user@example.com", "welcome")),
    )
    .await
    .unwrap();

    assert!(!response.0.delivered);
    assert_eq!(transport.delivery_attempts(), 4);
}

#[tokio::test]
async fn health_reports_loaded_templates() {
    let state = test_state(Arc::new(MemoryMailTransport::new()));

    let response = health(State(state)).await;

    assert_eq!(response.0.status, "healthy");
    assert_eq!(response.0.templates.loaded, 1);
    assert_eq!(response.0.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn stats_reflect_send_outcomes() {
    let transport = Arc::new(MemoryMailTransport::new());
    let state = test_state(transport);

    send_email(
        State(state.clone()),
        Json(send_request("user@example.com", "welcome")),
    )
    .await
    .unwrap();

    let response = stats(State(state)).await;
    assert_eq!(response.0.emails.total_requests, 1);
    assert_eq!(response.0.emails.total_delivered, 1);
}

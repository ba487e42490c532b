//! End-to-end mailer behavior against the in-memory transport.
//!
//! These tests pin down the retry contract: one render per send, bounded
//! delivery attempts, exponentially growing waits, and a boolean result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;

use courier_mail_service::config::{RetryConfig, SenderConfig};
use courier_mail_service::mailer::{Mailer, Priority, SendRequest};
use courier_mail_service::template::TemplateStore;
use courier_mail_service::transport::MemoryMailTransport;

fn test_templates() -> TemplateStore {
    let mut store = TemplateStore::new();
    store
        .register("welcome", "<h1>Welcome, {{name}}!</h1>")
        .unwrap();
    store
}

/// Mailer wired to the given transport with a short backoff base so
/// retry tests stay fast.
fn test_mailer(transport: Arc<MemoryMailTransport>, base_delay_ms: u64) -> Mailer {
    let sender = SenderConfig {
        name: "Acme Notifications".to_string(),
        address: "noreply@acme.test".to_string(),
    };
    let retry = RetryConfig {
        max_retries: 3,
        base_delay_ms,
    };
    Mailer::new(Arc::new(test_templates()), transport, &sender, &retry)
}

fn welcome_request() -> SendRequest {
    serde_json::from_value(json!({
        "to": "user@example.com",
        "subject": "Welcome",
        "template": "welcome",
        "context": { "name": "Ada" },
    }))
    .unwrap()
}

#[tokio::test]
async fn delivers_on_first_attempt() {
    let transport = Arc::new(MemoryMailTransport::new());
    let mailer = test_mailer(transport.clone(), 1);

    assert!(mailer.send(welcome_request()).await);

    assert_eq!(transport.delivery_attempts(), 1);
    let sent = transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body_html, "<h1>Welcome, Ada!</h1>");
    assert_eq!(sent[0].from_name, "Acme Notifications");
    assert_eq!(sent[0].from_address, "noreply@acme.test");

    let stats = mailer.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.total_delivered, 1);
    assert_eq!(stats.total_retries, 0);
}

#[tokio::test]
async fn stamps_priority_headers_on_the_message() {
    let transport = Arc::new(MemoryMailTransport::new());
    let mailer = test_mailer(transport.clone(), 1);

    let mut request = welcome_request();
    request.priority = Priority::High;
    assert!(mailer.send(request).await);

    let sent = transport.sent().await;
    assert_eq!(
        sent[0].headers,
        vec![
            ("X-Priority".to_string(), "1".to_string()),
            ("X-MSMail-Priority".to_string(), "High".to_string()),
            ("Importance".to_string(), "high".to_string()),
        ]
    );
}

#[tokio::test]
async fn retries_transient_failures_then_succeeds() {
    let transport = Arc::new(MemoryMailTransport::failing(2));
    let mailer = test_mailer(transport.clone(), 1);

    assert!(mailer.send(welcome_request()).await);

    // Two rejected attempts, then one accepted
    assert_eq!(transport.delivery_attempts(), 3);
    assert_eq!(transport.sent().await.len(), 1);

    let stats = mailer.stats();
    assert_eq!(stats.total_delivered, 1);
    assert_eq!(stats.total_retries, 2);
    assert_eq!(stats.total_failed, 0);
}

#[tokio::test]
async fn gives_up_after_four_attempts() {
    let transport = Arc::new(MemoryMailTransport::failing(u32::MAX));
    let mailer = test_mailer(transport.clone(), 1);

    assert!(!mailer.send(welcome_request()).await);

    // Attempts 0 through 3, then failure is reported via the result only
    assert_eq!(transport.delivery_attempts(), 4);
    assert!(transport.sent().await.is_empty());

    let stats = mailer.stats();
    assert_eq!(stats.total_failed, 1);
    assert_eq!(stats.total_retries, 3);
}

#[tokio::test]
async fn backoff_waits_double_between_attempts() {
    let transport = Arc::new(MemoryMailTransport::failing(3));
    let mailer = test_mailer(transport.clone(), 20);

    let started = Instant::now();
    assert!(mailer.send(welcome_request()).await);
    let elapsed = started.elapsed();

    // Waits of 20ms, 40ms, and 80ms separate the four attempts
    assert_eq!(transport.delivery_attempts(), 4);
    assert!(
        elapsed >= Duration::from_millis(140),
        "expected at least 140ms of backoff, got {:?}",
        elapsed
    );
}

#[tokio::test]
async fn missing_template_skips_delivery_entirely() {
    let transport = Arc::new(MemoryMailTransport::new());
    let mailer = test_mailer(transport.clone(), 1);

    let mut request = welcome_request();
    request.template = "does-not-exist".to_string();

    assert!(!mailer.send(request).await);

    assert_eq!(transport.delivery_attempts(), 0);
    let stats = mailer.stats();
    assert_eq!(stats.template_failures, 1);
    assert_eq!(stats.total_failed, 0);
}

#[tokio::test]
async fn unbound_context_variable_is_permanent() {
    let transport = Arc::new(MemoryMailTransport::new());
    let mailer = test_mailer(transport.clone(), 1);

    let mut request = welcome_request();
    request.context = json!({});

    assert!(!mailer.send(request).await);
    assert_eq!(transport.delivery_attempts(), 0);
}

#[tokio::test]
async fn starting_attempt_index_shrinks_the_budget() {
    let transport = Arc::new(MemoryMailTransport::failing(u32::MAX));
    let mailer = test_mailer(transport.clone(), 1);

    let mut request = welcome_request();
    request.attempt = 3;

    assert!(!mailer.send(request).await);

    // Already at the ceiling: one attempt, no retries
    assert_eq!(transport.delivery_attempts(), 1);
}

#[tokio::test]
async fn rendering_is_identical_across_sends() {
    let transport = Arc::new(MemoryMailTransport::new());
    let mailer = test_mailer(transport.clone(), 1);

    assert!(mailer.send(welcome_request()).await);
    assert!(mailer.send(welcome_request()).await);

    let sent = transport.sent().await;
    assert_eq!(sent[0].body_html.as_bytes(), sent[1].body_html.as_bytes());
}

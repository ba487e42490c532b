use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::{RetryConfig, SenderConfig};
use crate::metrics::EmailMetrics;
use crate::template::{TemplateError, TemplateStore};
use crate::transport::MailTransport;

use super::backoff::RetryPolicy;
use super::types::{OutboundEmail, SendRequest};

/// Statistics for the mailer
#[derive(Debug, Default)]
pub struct MailerStats {
    /// Total send requests accepted
    pub total_requests: AtomicU64,
    /// Total emails accepted by the transport
    pub total_delivered: AtomicU64,
    /// Total sends that exhausted every delivery attempt
    pub total_failed: AtomicU64,
    /// Total delivery retries
    pub total_retries: AtomicU64,
    /// Total sends abandoned on a template failure
    pub template_failures: AtomicU64,
}

impl MailerStats {
    pub fn snapshot(&self) -> MailerStatsSnapshot {
        MailerStatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            total_retries: self.total_retries.load(Ordering::Relaxed),
            template_failures: self.template_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of mailer statistics
#[derive(Debug, Clone, Serialize)]
pub struct MailerStatsSnapshot {
    pub total_requests: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
    pub total_retries: u64,
    pub template_failures: u64,
}

/// Renders templated emails and submits them through a delivery
/// transport, retrying transient failures with exponential backoff.
///
/// The public contract is boolean: `true` means the transport accepted
/// the message, `false` means the template failed to render or every
/// delivery attempt was exhausted. Callers that need the distinction
/// have the log and metric side channels.
pub struct Mailer {
    templates: Arc<TemplateStore>,
    transport: Arc<dyn MailTransport>,
    from_name: String,
    from_address: String,
    retry: RetryPolicy,
    stats: MailerStats,
}

impl Mailer {
    pub fn new(
        templates: Arc<TemplateStore>,
        transport: Arc<dyn MailTransport>,
        sender: &SenderConfig,
        retry: &RetryConfig,
    ) -> Self {
        Self {
            templates,
            transport,
            from_name: sender.name.clone(),
            from_address: sender.address.clone(),
            retry: RetryPolicy::new(retry.max_retries, Duration::from_millis(retry.base_delay_ms)),
            stats: MailerStats::default(),
        }
    }

    /// Get mailer statistics
    pub fn stats(&self) -> MailerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of templates available for rendering
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Render and deliver one email.
    ///
    /// A template failure is permanent and returns `false` without any
    /// delivery attempt. A delivery failure is retried after an
    /// exponentially growing wait until the attempt ceiling is reached.
    #[tracing::instrument(
        name = "mailer.send",
        skip(self, request),
        fields(
            template = %request.template,
            priority = %request.priority.as_str()
        )
    )]
    pub async fn send(&self, request: SendRequest) -> bool {
        let message_id = Uuid::new_v4();
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        EmailMetrics::record_request(request.priority);

        let email = match self.render(&request) {
            Ok(email) => email,
            Err(e) => {
                self.stats.template_failures.fetch_add(1, Ordering::Relaxed);
                EmailMetrics::record_template_failure();
                tracing::error!(
                    message_id = %message_id,
                    template = %request.template,
                    error = %e,
                    "Template rendering failed, send abandoned"
                );
                return false;
            }
        };

        let mut attempt = request.attempt;
        loop {
            match self.transport.deliver(&email).await {
                Ok(()) => {
                    self.stats.total_delivered.fetch_add(1, Ordering::Relaxed);
                    EmailMetrics::record_delivered();
                    tracing::debug!(
                        message_id = %message_id,
                        attempt = attempt,
                        "Email delivered"
                    );
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        message_id = %message_id,
                        attempt = attempt,
                        error = %e,
                        "Email delivery failed"
                    );

                    if attempt >= self.retry.max_retries() {
                        self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                        EmailMetrics::record_failed();
                        tracing::error!(
                            message_id = %message_id,
                            last_attempt = attempt,
                            "Delivery attempts exhausted, giving up"
                        );
                        return false;
                    }

                    let delay = self.retry.delay_for(attempt);
                    tokio::time::sleep(delay).await;

                    self.stats.total_retries.fetch_add(1, Ordering::Relaxed);
                    EmailMetrics::record_retry();
                    attempt += 1;
                }
            }
        }
    }

    fn render(&self, request: &SendRequest) -> Result<OutboundEmail, TemplateError> {
        let body_html = self.templates.render(&request.template, &request.context)?;

        Ok(OutboundEmail {
            from_name: self.from_name.clone(),
            from_address: self.from_address.clone(),
            to: request.to.clone(),
            subject: request.subject.clone(),
            body_html,
            headers: request
                .priority
                .headers()
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }
}

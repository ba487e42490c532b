//! Prometheus metrics for the mail service.
//!
//! Counters cover the send pipeline end to end: requests by priority,
//! deliveries, retries, exhausted sends, and permanent template failures.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::mailer::Priority;

/// Prefix for all metrics
const METRIC_PREFIX: &str = "courier";

lazy_static! {
    /// Total send requests by priority
    pub static ref EMAILS_REQUESTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_emails_requested_total", METRIC_PREFIX),
        "Total email send requests",
        &["priority"]
    ).unwrap();

    /// Total emails accepted by the transport
    pub static ref EMAILS_DELIVERED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_delivered_total", METRIC_PREFIX),
        "Total emails accepted by the delivery transport"
    ).unwrap();

    /// Total sends that exhausted every delivery attempt
    pub static ref EMAILS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_failed_total", METRIC_PREFIX),
        "Total sends that exhausted their delivery attempts"
    ).unwrap();

    /// Total delivery retries after a transient failure
    pub static ref DELIVERY_RETRIES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_delivery_retries_total", METRIC_PREFIX),
        "Total delivery retries after a transient failure"
    ).unwrap();

    /// Total sends abandoned because the template failed to render
    pub static ref TEMPLATE_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_template_failures_total", METRIC_PREFIX),
        "Total sends abandoned on a template rendering failure"
    ).unwrap();
}

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording send-pipeline metrics
pub struct EmailMetrics;

impl EmailMetrics {
    /// Record an incoming send request
    pub fn record_request(priority: Priority) {
        EMAILS_REQUESTED_TOTAL
            .with_label_values(&[priority.as_str()])
            .inc();
    }

    /// Record a successful delivery
    pub fn record_delivered() {
        EMAILS_DELIVERED_TOTAL.inc();
    }

    /// Record a send that ran out of attempts
    pub fn record_failed() {
        EMAILS_FAILED_TOTAL.inc();
    }

    /// Record a retry after a transient delivery failure
    pub fn record_retry() {
        DELIVERY_RETRIES_TOTAL.inc();
    }

    /// Record a permanent template failure
    pub fn record_template_failure() {
        TEMPLATE_FAILURES_TOTAL.inc();
    }
}

//! Email sending with template rendering and bounded retry.
//!
//! The [`Mailer`] is the core of the service: it renders a template
//! against a JSON context, stamps the configured sender identity and
//! priority headers onto the message, and hands it to a
//! [`MailTransport`](crate::transport::MailTransport). Transient
//! delivery failures are retried with exponential backoff (1s, 2s, 4s
//! by default) up to a fixed attempt ceiling; template failures are
//! permanent and never retried.

mod backoff;
mod sender;
mod types;

pub use backoff::RetryPolicy;
pub use sender::{Mailer, MailerStats, MailerStatsSnapshot};
pub use types::{OutboundEmail, Priority, SendRequest};

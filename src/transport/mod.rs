//! Delivery backends for outbound mail.
//!
//! This module defines the abstraction layer between the mailer and the
//! wire: an SMTP backend with a lettre-managed connection pool for
//! production, and an in-memory backend for tests and local development.
//! Delivery errors are transient from the mailer's point of view and
//! subject to its retry policy.

use async_trait::async_trait;
use thiserror::Error;

use crate::mailer::OutboundEmail;

mod memory;
mod smtp;

pub use memory::MemoryMailTransport;
pub use smtp::SmtpMailTransport;

/// Errors that can occur while handing a message to the wire.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A mailbox address failed to parse
    #[error("Invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// A header name was not valid ASCII
    #[error("Invalid header name: {0}")]
    Header(String),

    /// The message could not be assembled
    #[error("Failed to assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP conversation failed
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The backend refused the message
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// A backend capable of delivering one fully-formed message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt delivery of a single message.
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

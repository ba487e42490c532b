use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::{self, HeaderName, HeaderValue};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::mailer::OutboundEmail;

use super::{DeliveryError, MailTransport};

/// SMTP delivery backend with a pooled connection.
///
/// The transport is built once at startup and shared for the process
/// lifetime. Connection reuse, pool sizing, and idle reaping are
/// delegated to lettre.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        };

        let pool = PoolConfig::new()
            .max_size(config.pool_max_size)
            .idle_timeout(Duration::from_secs(config.pool_idle_timeout_seconds));

        let mut builder = builder.port(config.port).pool_config(pool);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    /// Assemble a lettre [`Message`], including the priority headers.
    fn build_message(email: &OutboundEmail) -> Result<Message, DeliveryError> {
        let from = Mailbox::new(
            Some(email.from_name.clone()),
            email.from_address.parse()?,
        );
        let to: Mailbox = email.to.parse()?;

        let mut message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(header::ContentType::TEXT_HTML)
            .body(email.body_html.clone())?;

        for (name, value) in &email.headers {
            let header_name = HeaderName::new_from_ascii(name.clone())
                .map_err(|_| DeliveryError::Header(name.clone()))?;
            message
                .headers_mut()
                .insert_raw(HeaderValue::new(header_name, value.clone()));
        }

        Ok(message)
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let message = Self::build_message(email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

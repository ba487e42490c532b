use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::mailer::OutboundEmail;

use super::{DeliveryError, MailTransport};

/// In-memory delivery backend.
///
/// Records every message it accepts and can be armed to reject the next
/// N deliveries, which makes retry behavior observable in tests. Also
/// usable as a local-development sink.
#[derive(Default)]
pub struct MemoryMailTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_remaining: AtomicU32,
    attempts: AtomicU32,
}

impl MemoryMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects the next `failures` deliveries, then
    /// accepts everything.
    pub fn failing(failures: u32) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_remaining: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
        }
    }

    /// Messages accepted so far.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }

    /// Total delivery attempts, including rejected ones.
    pub fn delivery_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for MemoryMailTransport {
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let reject = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if reject {
            return Err(DeliveryError::Rejected(
                "simulated transport failure".to_string(),
            ));
        }

        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

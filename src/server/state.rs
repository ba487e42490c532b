use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub mailer: Arc<Mailer>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings, mailer: Arc<Mailer>) -> Self {
        Self {
            settings: Arc::new(settings),
            mailer,
            start_time: Instant::now(),
        }
    }
}

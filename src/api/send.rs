use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::mailer::SendRequest;
use crate::server::AppState;

/// Response for the send operation.
///
/// `delivered` is the whole contract: a send that exhausted its retries
/// or referenced a bad template is still a 200 with `delivered: false`.
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    /// Whether the transport accepted the message
    pub delivered: bool,
    /// Timestamp of the operation
    pub timestamp: DateTime<Utc>,
}

/// Send one templated email
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendEmailResponse>> {
    validate(&request)?;

    let delivered = state.mailer.send(request).await;

    Ok(Json(SendEmailResponse {
        delivered,
        timestamp: Utc::now(),
    }))
}

fn validate(request: &SendRequest) -> Result<()> {
    if request.to.trim().is_empty() {
        return Err(AppError::Validation("recipient must not be empty".to_string()));
    }
    if request.to.parse::<Mailbox>().is_err() {
        return Err(AppError::Validation(format!(
            "invalid recipient address: {}",
            request.to
        )));
    }
    if request.template.is_empty() {
        return Err(AppError::Validation("template must not be empty".to_string()));
    }
    if !request.context.is_object() {
        return Err(AppError::Validation(
            "context must be a JSON object".to_string(),
        ));
    }
    Ok(())
}

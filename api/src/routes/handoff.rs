use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use voucherbot_core::error::ApiError;
use voucherbot_core::reply::format_message_for_tag;
use voucherbot_core::{ContactRecord, HandoffReport, SessionContext};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Chat messages above this size are rejected before classification.
pub const MAX_MESSAGE_BYTES: usize = 8000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/handoff/detect", post(detect_handoff))
        .route("/v1/handoff/message", post(format_handoff_message))
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct DetectHandoffRequest {
    /// Raw user message
    pub message: String,
    /// Session state from earlier turns
    #[serde(default)]
    pub context: SessionContext,
    /// Also render the user-facing reply envelope
    #[serde(default)]
    pub include_reply: bool,
    /// The assistant's own answer, returned as the reply when no handoff is required
    #[serde(default)]
    pub fallback_response: Option<String>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct FormatMessageRequest {
    /// "user_request" or "discrimination_case"
    pub reason: String,
    pub contact: ContactRecord,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct FormatMessageResponse {
    pub message: String,
}

fn validate_message(message: &str) -> Result<(), AppError> {
    if message.len() > MAX_MESSAGE_BYTES {
        return Err(AppError::Validation {
            message: format!(
                "message is {} bytes, the limit is {MAX_MESSAGE_BYTES}",
                message.len()
            ),
            field: Some("message".to_string()),
            received: None,
            docs_hint: Some("Send one chat turn per request.".to_string()),
        });
    }
    Ok(())
}

/// Decide whether a chat message must be handed to a human caseworker.
#[utoipa::path(
    post,
    path = "/v1/handoff/detect",
    request_body = DetectHandoffRequest,
    responses(
        (status = 200, description = "Verdict for the message", body = HandoffReport),
        (status = 400, description = "Invalid body or message too large", body = ApiError)
    ),
    tag = "handoff"
)]
pub async fn detect_handoff(
    State(state): State<AppState>,
    AppJson(req): AppJson<DetectHandoffRequest>,
) -> Result<Json<HandoffReport>, AppError> {
    validate_message(&req.message)?;

    let classification = state.detector.classify(&req.message, &req.context);
    let mut report = HandoffReport::from(classification);
    if req.include_reply {
        report = report.with_reply(req.fallback_response);
    }

    Ok(Json(report))
}

/// Render the handoff notice for a reason and contact.
#[utoipa::path(
    post,
    path = "/v1/handoff/message",
    request_body = FormatMessageRequest,
    responses(
        (status = 200, description = "Formatted notice", body = FormatMessageResponse),
        (status = 400, description = "Unknown reason or invalid body", body = ApiError)
    ),
    tag = "handoff"
)]
pub async fn format_handoff_message(
    AppJson(req): AppJson<FormatMessageRequest>,
) -> Result<Json<FormatMessageResponse>, AppError> {
    let message = format_message_for_tag(&req.reason, &req.contact)?;
    Ok(Json(FormatMessageResponse { message }))
}

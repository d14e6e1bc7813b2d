use serde::Serialize;
use utoipa::ToSchema;

/// Failures of the handoff core. None of these come from user input: they
/// signal a caller or configuration bug.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HandoffError {
    /// A reason tag outside `user_request` / `discrimination_case`.
    #[error("no reply template for handoff reason '{0}'")]
    UnknownReason(String),
    /// A contact directory that violates its invariants.
    #[error("invalid contact directory: {0}")]
    InvalidConfiguration(String),
}

/// Structured error response returned by the HTTP surface.
/// Carries enough context for a chat orchestrator to fix its request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "internal_error")
    pub error: String,
    /// Human/agent-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

//! Request extractors that turn axum rejections into structured `ApiError` bodies.
//!
//! Use `AppJson<T>` in handler signatures instead of `axum::Json<T>`: a body
//! that fails to parse yields a 400 `validation_failed` JSON error rather than
//! axum's plain-text 4xx.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

/// Convert a `JsonRejection` into `AppError::Validation`, naming the offending
/// field when serde reports one.
pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    let field = serde_field_name(&body_text).unwrap_or_else(|| "body".to_string());

    AppError::Validation {
        message: format!("Invalid request body: {body_text}"),
        field: Some(field),
        received: None,
        docs_hint: Some(
            "Check the request body against the schema at /api-doc/openapi.json.".to_string(),
        ),
    }
}

/// Field name from serde's "missing field `x`" / "unknown field `x`" messages.
fn serde_field_name(msg: &str) -> Option<String> {
    ["missing field `", "unknown field `"]
        .into_iter()
        .find_map(|marker| {
            let after = &msg[msg.find(marker)? + marker.len()..];
            let end = after.find('`')?;
            Some(after[..end].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_missing_field() {
        let msg = "Failed to deserialize the JSON body into the target type: \
                   missing field `contact` at line 1 column 25";
        assert_eq!(serde_field_name(msg), Some("contact".to_string()));
    }

    #[test]
    fn names_unknown_field() {
        let msg = "unknown field `voucher`, expected one of `voucher_program`, `borough`";
        assert_eq!(serde_field_name(msg), Some("voucher".to_string()));
    }

    #[test]
    fn type_errors_have_no_field() {
        assert_eq!(
            serde_field_name("invalid type: integer `7`, expected a string"),
            None
        );
    }
}

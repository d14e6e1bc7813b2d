use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use voucherbot_core::contacts::normalize_program_name;
use voucherbot_core::error::ApiError;
use voucherbot_core::{Borough, ContactRecord};

use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/contacts/resolve", post(resolve_contact))
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct ResolveContactRequest {
    #[serde(default, alias = "voucher_type")]
    pub voucher_program: Option<String>,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub is_discrimination: bool,
    /// Route discrimination cases to the program's borough office when one exists
    #[serde(default)]
    pub use_borough_office: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ResolveContactResponse {
    pub contact: ContactRecord,
    /// Program key after synonym normalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borough: Option<Borough>,
    /// Independent fair-housing advocate, included for discrimination cases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_housing: Option<ContactRecord>,
}

/// Resolve the human contact for a program, borough and case kind.
#[utoipa::path(
    post,
    path = "/v1/contacts/resolve",
    request_body = ResolveContactRequest,
    responses(
        (status = 200, description = "Resolved contact", body = ResolveContactResponse),
        (status = 400, description = "Invalid body", body = ApiError)
    ),
    tag = "contacts"
)]
pub async fn resolve_contact(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResolveContactRequest>,
) -> Json<ResolveContactResponse> {
    let directory = state.detector.directory();
    let program = req.voucher_program.as_deref();
    let borough = req.borough.as_deref();
    let contact = directory.resolve(
        program,
        borough,
        req.is_discrimination,
        req.use_borough_office,
    );

    Json(ResolveContactResponse {
        contact,
        normalized_program: program.and_then(normalize_program_name),
        borough: borough.and_then(Borough::parse),
        fair_housing: req
            .is_discrimination
            .then(|| directory.fair_housing().clone()),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn state() -> State<AppState> {
        State(AppState::new(Default::default()))
    }

    #[tokio::test]
    async fn resolve_returns_borough_office_for_regular_requests() {
        let Json(response) = resolve_contact(
            state(),
            AppJson(ResolveContactRequest {
                voucher_program: Some("Section-8".to_string()),
                borough: Some("brooklyn".to_string()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.contact.name, "Brooklyn NYCHA Section 8 Office");
        assert_eq!(response.normalized_program.as_deref(), Some("SECTION 8"));
        assert_eq!(response.borough, Some(Borough::Brooklyn));
    }

    #[tokio::test]
    async fn resolve_routes_hasa_discrimination_to_legal_team() {
        let Json(response) = resolve_contact(
            state(),
            AppJson(ResolveContactRequest {
                voucher_program: Some("HASA".to_string()),
                borough: Some("Queens".to_string()),
                is_discrimination: true,
                use_borough_office: true,
            }),
        )
        .await;

        assert_eq!(response.contact.name, "Housing Works Legal Team");
        let fair_housing = response.fair_housing.expect("fair housing contact");
        assert_eq!(fair_housing.name, "Fair Housing Justice Center");
    }

    #[tokio::test]
    async fn resolve_without_inputs_returns_general_support() {
        let request = AppJson(ResolveContactRequest::default());
        let Json(response) = resolve_contact(state(), request).await;

        assert_eq!(response.contact.name, "HRA General Support");
        assert!(response.normalized_program.is_none());
        assert!(response.borough.is_none());
        assert!(response.fair_housing.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_a_structured_validation_error() {
        let app = router().with_state(AppState::new(Default::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/contacts/resolve")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"is_discrimination": "yes"}"#))
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body should be json");
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["field"], "body");
    }
}

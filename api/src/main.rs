use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod middleware;
mod routes;
mod state;

const DEFAULT_LOG_FILTER: &str = "voucherbot_api=debug,voucherbot_core=info,tower_http=debug";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VoucherBot Handoff API",
        version = "0.1.0",
        description = "Decides when a housing-voucher chat needs a human caseworker."
    ),
    paths(
        routes::health::health_check,
        routes::handoff::detect_handoff,
        routes::handoff::format_handoff_message,
        routes::contacts::resolve_contact,
    ),
    components(schemas(
        HealthResponse,
        routes::handoff::DetectHandoffRequest,
        voucherbot_core::HandoffReport,
        routes::handoff::FormatMessageRequest,
        routes::handoff::FormatMessageResponse,
        routes::contacts::ResolveContactRequest,
        routes::contacts::ResolveContactResponse,
        voucherbot_core::error::ApiError,
        voucherbot_core::ContactRecord,
        voucherbot_core::SessionContext,
        voucherbot_core::ReasonKind,
        voucherbot_core::RuleId,
        voucherbot_core::Borough,
        voucherbot_core::HandoffReply,
        voucherbot_core::reply::ReplyMetadata,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "builtin" or "custom"
    pub directory: String,
}

fn app(app_state: state::AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::handoff::router())
        .merge(routes::contacts::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer()),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = state::ApiConfig::from_env();
    let directory = match config.load_directory() {
        Ok(directory) => directory,
        Err(e) => {
            tracing::error!("Failed to load contact directory: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = &config.contacts_path {
        tracing::info!("Loaded contact directory from {}", path.display());
    }

    let app = app(state::AppState::new(directory));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("VoucherBot API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn health_reports_builtin_directory() {
        let response = app(state::AppState::new(Default::default()))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body should be json");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["directory"], "builtin");
    }

    #[test]
    fn openapi_document_lists_handoff_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/handoff/detect"));
        assert!(doc.paths.paths.contains_key("/v1/handoff/message"));
        assert!(doc.paths.paths.contains_key("/v1/contacts/resolve"));
    }
}

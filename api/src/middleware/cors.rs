use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

const DEFAULT_ORIGINS: &str = "http://localhost:7860";

/// Build a CORS layer from the `VOUCHERBOT_CORS_ORIGINS` env var.
///
/// - Origins: comma-separated list (default: the local chat UI on port 7860)
/// - Methods: GET, POST, OPTIONS
/// - Headers: Content-Type
/// - Max age: 3600s
pub fn build_cors_layer() -> CorsLayer {
    let raw = std::env::var("VOUCHERBOT_CORS_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());

    CorsLayer::new()
        .allow_origin(parse_origins(&raw))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([HeaderName::from_static("content-type")])
        .max_age(std::time::Duration::from_secs(3600))
}

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    let mut origins: Vec<&str> = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !origins.iter().any(|seen| seen.eq_ignore_ascii_case(origin)) {
            origins.push(origin);
        }
    }
    origins
        .into_iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn parse_origins_skips_blanks_and_duplicates() {
        let origins = parse_origins(
            " https://chat.example.org , ,HTTPS://CHAT.EXAMPLE.ORG,http://localhost:7860",
        );
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://chat.example.org");
        assert_eq!(origins[1], "http://localhost:7860");
    }
}

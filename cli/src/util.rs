use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use voucherbot_core::error::HandoffError;
use voucherbot_core::{ContactDirectory, HandoffDetector};

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
    std::process::exit(1);
}

/// Pretty-print a value to stdout. Returns the exit code.
pub fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(e) => exit_error(&format!("Failed to serialize output: {e}"), None),
    }
}

/// Read a contact directory from disk, or the built-in one when no path is given.
pub fn read_directory(path: Option<&Path>) -> Result<ContactDirectory, HandoffError> {
    let Some(path) = path else {
        return Ok(ContactDirectory::builtin().clone());
    };
    let raw = std::fs::read_to_string(path).map_err(|e| {
        HandoffError::InvalidConfiguration(format!("cannot read {}: {e}", path.display()))
    })?;
    ContactDirectory::from_json(&raw)
}

pub fn load_detector(path: Option<&Path>) -> HandoffDetector {
    match read_directory(path) {
        Ok(directory) => {
            if let Some(path) = path {
                tracing::debug!(path = %path.display(), "loaded contact directory");
            }
            HandoffDetector::with_directory(Arc::new(directory))
        }
        Err(e) => exit_error(
            &e.to_string(),
            Some("Check --contacts or VOUCHERBOT_CONTACTS_PATH."),
        ),
    }
}

/// GET a JSON endpoint and print the response.
///
/// Exit codes: 0=success (2xx), 1=client error (4xx), 2=server error (5xx),
///             3=connection error
pub async fn api_get(api_url: &str, path: &str) -> i32 {
    let url = format!("{}{path}", api_url.trim_end_matches('/'));

    let resp = match client().get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            let err = json!({
                "error": "connection_error",
                "message": format!("{e}"),
                "docs_hint": "Is the API server running? Check VOUCHERBOT_API_URL."
            });
            eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
            return 3;
        }
    };

    let exit_code = match resp.status().as_u16() {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };

    let body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({"raw_error": format!("Failed to parse response as JSON: {e}")}),
    };
    let formatted = serde_json::to_string_pretty(&body).unwrap();

    if exit_code == 0 {
        println!("{formatted}");
    } else {
        eprintln!("{formatted}");
    }

    exit_code
}

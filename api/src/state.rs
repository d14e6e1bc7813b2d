use std::path::PathBuf;
use std::sync::Arc;

use voucherbot_core::{ContactDirectory, HandoffDetector, HandoffError};

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    /// Optional JSON contact sheet replacing the built-in directory
    pub contacts_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let contacts_path = std::env::var("VOUCHERBOT_CONTACTS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Self {
            port,
            contacts_path,
        }
    }

    /// The directory every request routes against.
    pub fn load_directory(&self) -> Result<ContactDirectory, HandoffError> {
        let Some(path) = &self.contacts_path else {
            return Ok(ContactDirectory::builtin().clone());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HandoffError::InvalidConfiguration(format!("cannot read {}: {e}", path.display()))
        })?;
        ContactDirectory::from_json(&raw)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub detector: HandoffDetector,
}

impl AppState {
    pub fn new(directory: ContactDirectory) -> Self {
        Self {
            detector: HandoffDetector::with_directory(Arc::new(directory)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_directory_is_used_without_a_contacts_path() {
        let config = ApiConfig {
            port: 3000,
            contacts_path: None,
        };
        let directory = config.load_directory().expect("builtin directory");
        assert_eq!(&directory, ContactDirectory::builtin());
    }

    #[test]
    fn missing_contacts_file_is_a_configuration_error() {
        let config = ApiConfig {
            port: 3000,
            contacts_path: Some(PathBuf::from("/nonexistent/voucherbot/contacts.json")),
        };
        let err = config.load_directory().expect_err("missing file must fail");
        assert!(matches!(err, HandoffError::InvalidConfiguration(_)));
    }
}

//! Error types for ddns-updater.

use thiserror::Error;

/// Result type alias for ddns-updater.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
///
/// Every variant is fatal to a run; nothing downstream retries.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Missing or invalid arguments / environment.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record absent at the provider.
    #[error("Record '{0}' not found.")]
    NotFound(String),

    /// Provider refused the update.
    #[error("Record update failed for '{name}' with these reasons: {}.", .reasons.join(", "))]
    UpdateRejected { name: String, reasons: Vec<String> },

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider API reported a failure on a read.
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for DdnsError {
    fn from(e: serde_json::Error) -> Self {
        DdnsError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_rejected_lists_reasons() {
        let err = DdnsError::UpdateRejected {
            name: "vpn.example.com".to_string(),
            reasons: vec!["invalid target".to_string(), "locked".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Record update failed for 'vpn.example.com' with these reasons: invalid target, locked."
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = DdnsError::NotFound("vpn.example.com".to_string());
        assert_eq!(err.to_string(), "Record 'vpn.example.com' not found.");
    }
}

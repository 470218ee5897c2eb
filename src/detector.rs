//! Public IP detection.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;

const DEFAULT_SERVICE: &str = "https://api.ipify.org";

/// Source of the machine's current public address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpLookup: Send + Sync {
    /// Current public IPv4 address, exactly as reported.
    async fn public_ip(&self) -> Result<String>;
}

/// IP detector backed by a single "what is my IP" service.
pub struct IpDetector {
    client: reqwest::Client,
    service: String,
}

impl IpDetector {
    /// Create a new IP detector using api.ipify.org.
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE.to_string())
    }

    /// Create a new IP detector with a custom service URL.
    pub fn with_service(service: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            service,
        }
    }

    /// Get the service URL.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Default for IpDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpLookup for IpDetector {
    async fn public_ip(&self) -> Result<String> {
        let response = self.client.get(&self.service).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                self.service
            )));
        }

        // No trimming or parsing: the body is compared verbatim with the record.
        let bytes = response.bytes().await?;
        let ip = String::from_utf8(bytes.to_vec()).map_err(|e| {
            DdnsError::Network(format!("Non UTF-8 response from {}: {}", self.service, e))
        })?;

        tracing::debug!("Detected public IP {} from {}", ip, self.service);
        Ok(ip)
    }
}

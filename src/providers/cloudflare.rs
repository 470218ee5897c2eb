//! Cloudflare DNS provider.

use super::{DnsProvider, Record};
use crate::config::CloudflareCredentials;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com";

/// Cloudflare DNS provider.
///
/// Authenticates with the global API key (`X-Auth-Email` / `X-Auth-Key`).
/// The HTTP client is kept for the provider's lifetime so the fetch and the
/// update share one connection.
pub struct CloudflareProvider {
    client: reqwest::Client,
    zone_id: String,
    email: String,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("zone_id", &self.zone_id)
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    #[serde(default)]
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<CloudflareError>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DnsRecord {
    id: String,
    name: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    content: &'a str,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider.
    pub fn new(credentials: CloudflareCredentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(credentials: CloudflareCredentials, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            zone_id: credentials.zone_id,
            email: credentials.email,
            api_key: credentials.api_key,
            base_url,
        }
    }

    fn records_url(&self) -> String {
        format!(
            "{}/client/v4/zones/{}/dns_records",
            self.base_url, self.zone_id
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.api_key)
    }
}

fn error_messages(errors: Vec<CloudflareError>) -> Vec<String> {
    errors.into_iter().map(|e| e.message).collect()
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    async fn fetch(&self, name: &str) -> Result<Option<Record>> {
        let response: CloudflareResponse<Vec<DnsRecord>> = self
            .request(reqwest::Method::GET, &self.records_url())
            .query(&[("type", "A"), ("name", name)])
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            let messages = error_messages(response.errors);
            let message = if messages.is_empty() {
                "Unknown error".to_string()
            } else {
                messages.join(", ")
            };
            return Err(DdnsError::Provider {
                provider: self.name().to_string(),
                message,
            });
        }

        let record = response
            .result
            .and_then(|records| records.into_iter().next())
            .map(|r| Record {
                id: r.id,
                name: r.name,
                ip: r.content,
            });

        match &record {
            Some(r) => tracing::debug!("Cloudflare record {} ({}) -> {}", r.name, r.id, r.ip),
            None => tracing::debug!("Cloudflare has no A record for {}", name),
        }

        Ok(record)
    }

    async fn update(&self, record: &Record, ip: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}", self.records_url(), record.id);

        let response: CloudflareResponse<serde_json::Value> = self
            .request(reqwest::Method::PATCH, &url)
            .json(&UpdateRequest { content: ip })
            .send()
            .await?
            .json()
            .await?;

        let mut errors = error_messages(response.errors);
        if !response.success && errors.is_empty() {
            errors.push("Cloudflare rejected the update without details".to_string());
        }

        Ok(errors)
    }
}

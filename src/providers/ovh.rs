//! OVH DNS provider.
//!
//! Talks to the signed OVH REST API. Every request carries the application
//! key, the consumer key, a timestamp and a SHA-1 signature over the secret,
//! the method, the full URL, the body and that timestamp. The timestamp is
//! corrected by the server clock delta read once from `/v1/auth/time`.

use super::{DnsProvider, Record};
use crate::config::OvhCredentials;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use tokio::sync::OnceCell;

/// Well-known API endpoints, by the names the official clients use.
const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com"),
    ("ovh-ca", "https://ca.api.ovh.com"),
    ("ovh-us", "https://api.us.ovhcloud.com"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com"),
];

/// OVH DNS provider.
pub struct OvhProvider {
    client: reqwest::Client,
    base_url: String,
    application_key: String,
    application_secret: String,
    consumer_key: String,
    time_delta: OnceCell<i64>,
}

impl fmt::Debug for OvhProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OvhProvider")
            .field("base_url", &self.base_url)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OvhRecord {
    target: String,
}

#[derive(Debug, Deserialize)]
struct OvhError {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRecord<'a> {
    sub_domain: &'a str,
    target: &'a str,
}

impl OvhProvider {
    /// Create a new OVH provider.
    ///
    /// `credentials.endpoint` is either a well-known endpoint name such as
    /// `ovh-eu` or a literal base URL.
    pub fn new(credentials: OvhCredentials) -> Result<Self> {
        let base_url = resolve_endpoint(&credentials.endpoint)?;
        Ok(Self::with_base_url(credentials, base_url))
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(credentials: OvhCredentials, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            application_key: credentials.application_key,
            application_secret: credentials.application_secret,
            consumer_key: credentials.consumer_key,
            time_delta: OnceCell::new(),
        }
    }

    /// Difference between the API server clock and ours, in seconds.
    async fn time_delta(&self) -> Result<i64> {
        let delta = self
            .time_delta
            .get_or_try_init(|| async {
                let url = format!("{}/v1/auth/time", self.base_url);
                let response = self.client.get(&url).send().await?;
                let response = check_status(response).await?;
                let server_time: i64 = response.json().await?;
                let delta = server_time - chrono::Utc::now().timestamp();
                tracing::debug!("OVH clock delta: {}s", delta);
                Ok::<i64, DdnsError>(delta)
            })
            .await?;

        Ok(*delta)
    }

    /// Send a signed request and return the successful response.
    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let body = match body {
            Some(body) => serde_json::to_string(body)?,
            None => String::new(),
        };
        let timestamp = chrono::Utc::now().timestamp() + self.time_delta().await?;
        let signature = sign(
            &self.application_secret,
            &self.consumer_key,
            method.as_str(),
            &url,
            &body,
            timestamp,
        );

        let mut request = self
            .client
            .request(method, &url)
            .header("X-Ovh-Application", &self.application_key)
            .header("X-Ovh-Consumer", &self.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);

        if !body.is_empty() {
            request = request.header("Content-Type", "application/json").body(body);
        }

        Ok(request.send().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.call::<()>(Method::GET, path, None).await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DnsProvider for OvhProvider {
    fn name(&self) -> &'static str {
        "ovh"
    }

    async fn fetch(&self, name: &str) -> Result<Option<Record>> {
        let (zone, subdomain) = zone_and_subdomain(name);

        let ids: Vec<u64> = self
            .get(&format!(
                "/v1/domain/zone/{}/record?fieldType=A&subDomain={}",
                zone, subdomain
            ))
            .await?;

        // Upstream gives no ordering; the first id wins.
        let Some(id) = ids.first() else {
            tracing::debug!("OVH has no A record for {}", name);
            return Ok(None);
        };

        let record: OvhRecord = self
            .get(&format!("/v1/domain/zone/{}/record/{}", zone, id))
            .await?;

        tracing::debug!("OVH record {} ({}) -> {}", name, id, record.target);

        Ok(Some(Record {
            id: id.to_string(),
            name: name.to_string(),
            ip: record.target,
        }))
    }

    async fn update(&self, record: &Record, ip: &str) -> Result<Vec<String>> {
        let (zone, subdomain) = zone_and_subdomain(&record.name);
        let body = UpdateRecord {
            sub_domain: &subdomain,
            target: ip,
        };

        let response = self
            .call(
                Method::PUT,
                &format!("/v1/domain/zone/{}/record/{}", zone, record.id),
                Some(&body),
            )
            .await?;

        if response.status().is_success() {
            return Ok(Vec::new());
        }

        Ok(vec![error_message(response).await])
    }
}

/// Split a record name into its OVH zone and subdomain.
///
/// The zone is the last two labels; anything before them is the subdomain.
///
/// ```
/// use ddns_updater::providers::zone_and_subdomain;
///
/// assert_eq!(
///     zone_and_subdomain("a.b.example.com"),
///     ("example.com".to_string(), "a.b".to_string())
/// );
/// assert_eq!(
///     zone_and_subdomain("example.com"),
///     ("example.com".to_string(), String::new())
/// );
/// ```
pub fn zone_and_subdomain(name: &str) -> (String, String) {
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() <= 2 {
        return (name.to_string(), String::new());
    }

    let split = labels.len() - 2;
    (labels[split..].join("."), labels[..split].join("."))
}

fn resolve_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return Ok(endpoint.trim_end_matches('/').to_string());
    }

    ENDPOINTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(endpoint))
        .map(|(_, url)| url.to_string())
        .ok_or_else(|| {
            let known: Vec<&str> = ENDPOINTS.iter().map(|(name, _)| *name).collect();
            DdnsError::Config(format!(
                "Unknown OVH endpoint '{}' (expected one of {} or a URL)",
                endpoint,
                known.join(", ")
            ))
        })
}

fn sign(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let mut hasher = Sha1::new();
    hasher.update(
        format!(
            "{}+{}+{}+{}+{}+{}",
            application_secret, consumer_key, method, url, body, timestamp
        )
        .as_bytes(),
    );
    format!("$1${:x}", hasher.finalize())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    Err(DdnsError::Provider {
        provider: "ovh".to_string(),
        message: error_message(response).await,
    })
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<OvhError>().await {
        Ok(error) => error.message,
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_and_subdomain_nested() {
        assert_eq!(
            zone_and_subdomain("a.b.example.com"),
            ("example.com".to_string(), "a.b".to_string())
        );
    }

    #[test]
    fn test_zone_and_subdomain_single_label_subdomain() {
        assert_eq!(
            zone_and_subdomain("sub.example.com"),
            ("example.com".to_string(), "sub".to_string())
        );
    }

    #[test]
    fn test_zone_and_subdomain_apex() {
        assert_eq!(
            zone_and_subdomain("example.com"),
            ("example.com".to_string(), String::new())
        );
    }

    #[test]
    fn test_resolve_known_endpoint() {
        assert_eq!(resolve_endpoint("ovh-eu").unwrap(), "https://eu.api.ovh.com");
        assert_eq!(resolve_endpoint("OVH-CA").unwrap(), "https://ca.api.ovh.com");
    }

    #[test]
    fn test_resolve_url_endpoint() {
        assert_eq!(
            resolve_endpoint("http://127.0.0.1:8080/").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_resolve_unknown_endpoint() {
        let err = resolve_endpoint("ovh-mars").unwrap_err();
        assert!(matches!(err, DdnsError::Config(_)));
    }

    #[test]
    fn test_sign_get_without_body() {
        let signature = sign(
            "as",
            "ck",
            "GET",
            "https://eu.api.ovh.com/v1/domain/zone/example.com/record?fieldType=A&subDomain=vpn",
            "",
            1_700_000_000,
        );
        assert_eq!(signature, "$1$8c93c009ca846cf9101461426a4c7c1793e67ec7");
    }

    #[test]
    fn test_sign_put_with_body() {
        let body = serde_json::to_string(&UpdateRecord {
            sub_domain: "vpn",
            target: "5.6.7.8",
        })
        .unwrap();

        let signature = sign(
            "as",
            "ck",
            "PUT",
            "https://eu.api.ovh.com/v1/domain/zone/example.com/record/42",
            &body,
            1_700_000_000,
        );
        assert_eq!(signature, "$1$af05fcbcdf96bf98570d4d80de125c7518d94bb5");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let provider = OvhProvider::with_base_url(
            OvhCredentials {
                endpoint: "ovh-eu".to_string(),
                application_key: "ak".to_string(),
                application_secret: "top-secret".to_string(),
                consumer_key: "ck-secret".to_string(),
            },
            "https://eu.api.ovh.com".to_string(),
        );
        let out = format!("{:?}", provider);
        assert!(!out.contains("top-secret"));
        assert!(!out.contains("ck-secret"));
    }
}

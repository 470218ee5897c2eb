//! DNS provider implementations.

mod cloudflare;
mod ovh;


pub use cloudflare::CloudflareProvider;
pub use ovh::{zone_and_subdomain, OvhProvider};

use crate::config::{Credentials, ProviderKind};
use crate::error::Result;
use async_trait::async_trait;

/// Snapshot of an "A" record as published by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Provider-specific opaque identifier.
    pub id: String,
    /// Fully-qualified record name.
    pub name: String,
    /// Current target address, as stored by the provider.
    pub ip: String,
}

/// Trait for DNS hosting providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// Look up the first "A" record called `name`.
    async fn fetch(&self, name: &str) -> Result<Option<Record>>;

    /// Point `record` at `ip`.
    ///
    /// Returns the provider-reported reasons on failure, empty on success.
    async fn update(&self, record: &Record, ip: &str) -> Result<Vec<String>>;
}

/// The closed set of supported providers.
#[derive(Debug)]
pub enum Provider {
    Cloudflare(CloudflareProvider),
    Ovh(OvhProvider),
}

/// Create a provider from credentials.
pub fn create_provider(credentials: Credentials) -> Result<Provider> {
    match credentials {
        Credentials::Cloudflare(credentials) => {
            Ok(Provider::Cloudflare(CloudflareProvider::new(credentials)))
        }
        Credentials::Ovh(credentials) => Ok(Provider::Ovh(OvhProvider::new(credentials)?)),
    }
}

impl Provider {
    /// Get the provider kind.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Cloudflare(_) => ProviderKind::Cloudflare,
            Provider::Ovh(_) => ProviderKind::Ovh,
        }
    }
}

#[async_trait]
impl DnsProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Cloudflare(p) => p.name(),
            Provider::Ovh(p) => p.name(),
        }
    }

    async fn fetch(&self, name: &str) -> Result<Option<Record>> {
        match self {
            Provider::Cloudflare(p) => p.fetch(name).await,
            Provider::Ovh(p) => p.fetch(name).await,
        }
    }

    async fn update(&self, record: &Record, ip: &str) -> Result<Vec<String>> {
        match self {
            Provider::Cloudflare(p) => p.update(record, ip).await,
            Provider::Ovh(p) => p.update(record, ip).await,
        }
    }
}

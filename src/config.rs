//! Configuration management for ddns-updater.
//!
//! Credentials come from the process environment (optionally seeded from a
//! `.env` file); the record name and provider come from the command line.
//! [`Settings::resolve`] merges both into a validated value.

use crate::error::{DdnsError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

pub const ENV_CLOUDFLARE_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";
pub const ENV_CLOUDFLARE_EMAIL: &str = "CLOUDFLARE_EMAIL";
pub const ENV_CLOUDFLARE_API_KEY: &str = "CLOUDFLARE_API_KEY";

pub const ENV_OVH_ENDPOINT: &str = "OVH_ENDPOINT";
pub const ENV_OVH_APPLICATION_KEY: &str = "OVH_APPLICATION_KEY";
pub const ENV_OVH_APPLICATION_SECRET: &str = "OVH_APPLICATION_SECRET";
pub const ENV_OVH_CONSUMER_KEY: &str = "OVH_CONSUMER_KEY";

/// Supported DNS hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ProviderKind {
    Cloudflare,
    Ovh,
}

impl ProviderKind {
    /// Get the provider name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Cloudflare => "cloudflare",
            ProviderKind::Ovh => "ovh",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cloudflare credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareCredentials {
    pub zone_id: String,
    pub email: String,
    pub api_key: String,
}

impl fmt::Debug for CloudflareCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareCredentials")
            .field("zone_id", &self.zone_id)
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

/// OVH credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OvhCredentials {
    /// Endpoint name (e.g. "ovh-eu") or base URL.
    pub endpoint: String,
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: String,
}

impl fmt::Debug for OvhCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OvhCredentials")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

/// Per-provider credential bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Cloudflare(CloudflareCredentials),
    Ovh(OvhCredentials),
}

impl Credentials {
    /// Get the provider these credentials belong to.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Credentials::Cloudflare(_) => ProviderKind::Cloudflare,
            Credentials::Ovh(_) => ProviderKind::Ovh,
        }
    }
}

/// Validated run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Lower-cased record name (e.g. "vpn.example.com").
    pub record_name: String,
    pub credentials: Credentials,
}

impl Settings {
    /// Load `.env` (if present) and resolve settings from the process environment.
    pub fn from_env(kind: ProviderKind, record_name: &str) -> Result<Self> {
        load_env_file(Path::new(".env"))?;

        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(kind, record_name, &env)
    }

    /// Build settings from an already-collected environment.
    ///
    /// Every missing variable of the chosen provider is reported at once.
    pub fn resolve(
        kind: ProviderKind,
        record_name: &str,
        env: &HashMap<String, String>,
    ) -> Result<Self> {
        let record_name = validate_record_name(record_name)?;

        let mut missing = Vec::new();
        let mut lookup = |key: &'static str| match env.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let credentials = match kind {
            ProviderKind::Cloudflare => Credentials::Cloudflare(CloudflareCredentials {
                zone_id: lookup(ENV_CLOUDFLARE_ZONE_ID),
                email: lookup(ENV_CLOUDFLARE_EMAIL),
                api_key: lookup(ENV_CLOUDFLARE_API_KEY),
            }),
            ProviderKind::Ovh => Credentials::Ovh(OvhCredentials {
                endpoint: lookup(ENV_OVH_ENDPOINT),
                application_key: lookup(ENV_OVH_APPLICATION_KEY),
                application_secret: lookup(ENV_OVH_APPLICATION_SECRET),
                consumer_key: lookup(ENV_OVH_CONSUMER_KEY),
            }),
        };

        if !missing.is_empty() {
            return Err(DdnsError::Config(format!(
                "Please set environment for: {}.",
                missing.join(", ")
            )));
        }

        Ok(Self {
            record_name,
            credentials,
        })
    }
}

/// Seed the process environment from `path`; a missing file is not an error.
///
/// Variables already set in the environment win over the file.
pub fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(DdnsError::Config(format!(
            "Invalid env file {}: {}",
            path.display(),
            e
        ))),
    }
}

fn validate_record_name(raw: &str) -> Result<String> {
    let name = raw.to_lowercase();

    if name.is_empty() {
        return Err(DdnsError::Config(
            "You must provide a record name to update.".to_string(),
        ));
    }
    if name.starts_with("--") {
        return Err(DdnsError::Config(format!(
            "'{}' is not allowed for '--name' argument.",
            name
        )));
    }

    Ok(name)
}

//! # ddns-updater
//!
//! A single-shot dynamic DNS updater written in Rust.
//!
//! ## Features
//!
//! - DNS providers: Cloudflare, OVH
//! - Public IP detection through api.ipify.org
//! - Updates the "A" record only when the published address differs
//! - Credentials from the environment or a `.env` file
//! - Daily-rotated log files
//!
//! ## Usage
//!
//! ```bash
//! # Credentials in .env or the environment
//! CLOUDFLARE_ZONE_ID=... CLOUDFLARE_EMAIL=... CLOUDFLARE_API_KEY=... \
//!     ddns-updater --provider cloudflare --name vpn.example.com
//!
//! OVH_ENDPOINT=ovh-eu OVH_APPLICATION_KEY=... OVH_APPLICATION_SECRET=... OVH_CONSUMER_KEY=... \
//!     ddns-updater --provider ovh --name home.example.com
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod providers;
pub mod updater;

pub use config::{Credentials, ProviderKind, Settings};
pub use detector::{IpDetector, IpLookup};
pub use error::{DdnsError, Result};
pub use providers::{create_provider, DnsProvider, Provider, Record};
pub use updater::{update_if_changed, UpdateOutcome};

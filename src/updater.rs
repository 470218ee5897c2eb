//! Change detection and update.

use crate::detector::IpLookup;
use crate::error::{DdnsError, Result};
use crate::providers::DnsProvider;

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether the record was rewritten.
    pub changed: bool,
    /// Human-readable summary for the log.
    pub reason: String,
}

/// Point `name` at the current public IP if it doesn't already.
///
/// The record is fetched first and the update targets that record's id.
/// Addresses are compared as raw strings: `"1.2.3.4"` and `"001.2.3.4"`
/// are considered different.
pub async fn update_if_changed<P, L>(provider: &P, lookup: &L, name: &str) -> Result<UpdateOutcome>
where
    P: DnsProvider + ?Sized,
    L: IpLookup + ?Sized,
{
    let record = provider
        .fetch(name)
        .await?
        .ok_or_else(|| DdnsError::NotFound(name.to_string()))?;

    let public_ip = lookup.public_ip().await?;

    if record.ip == public_ip {
        return Ok(UpdateOutcome {
            changed: false,
            reason: format!("Record not updated for '{}' because hasn't changed.", name),
        });
    }

    tracing::debug!(
        "Updating {} via {}: {} -> {}",
        name,
        provider.name(),
        record.ip,
        public_ip
    );

    let errors = provider.update(&record, &public_ip).await?;
    if !errors.is_empty() {
        return Err(DdnsError::UpdateRejected {
            name: name.to_string(),
            reasons: errors,
        });
    }

    Ok(UpdateOutcome {
        changed: true,
        reason: format!("Record update successful for '{}'.", name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::MockIpLookup;
    use crate::providers::{MockDnsProvider, Record};

    fn record(ip: &str) -> Record {
        Record {
            id: "rec-1".to_string(),
            name: "vpn.example.com".to_string(),
            ip: ip.to_string(),
        }
    }

    fn provider_with(ip: &'static str) -> MockDnsProvider {
        let mut provider = MockDnsProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_fetch()
            .withf(|name| name == "vpn.example.com")
            .times(1)
            .returning(move |_| Ok(Some(record(ip))));
        provider
    }

    fn lookup_with(ip: &'static str) -> MockIpLookup {
        let mut lookup = MockIpLookup::new();
        lookup
            .expect_public_ip()
            .times(1)
            .returning(move || Ok(ip.to_string()));
        lookup
    }

    #[tokio::test]
    async fn test_unchanged_ip_skips_update() {
        let mut provider = provider_with("1.2.3.4");
        provider.expect_update().never();
        let lookup = lookup_with("1.2.3.4");

        let outcome = update_if_changed(&provider, &lookup, "vpn.example.com")
            .await
            .unwrap();

        assert!(!outcome.changed);
        assert_eq!(
            outcome.reason,
            "Record not updated for 'vpn.example.com' because hasn't changed."
        );
    }

    #[tokio::test]
    async fn test_changed_ip_updates_once() {
        let mut provider = provider_with("1.2.3.4");
        provider
            .expect_update()
            .withf(|record, ip| record.id == "rec-1" && ip.to_string() == "5.6.7.8")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let lookup = lookup_with("5.6.7.8");

        let outcome = update_if_changed(&provider, &lookup, "vpn.example.com")
            .await
            .unwrap();

        assert!(outcome.changed);
        assert_eq!(
            outcome.reason,
            "Record update successful for 'vpn.example.com'."
        );
    }

    #[tokio::test]
    async fn test_comparison_is_not_normalized() {
        let mut provider = provider_with("1.2.3.4");
        provider
            .expect_update()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let lookup = lookup_with("001.002.003.004");

        let outcome = update_if_changed(&provider, &lookup, "vpn.example.com")
            .await
            .unwrap();

        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let mut provider = MockDnsProvider::new();
        provider.expect_fetch().times(1).returning(|_| Ok(None));
        provider.expect_update().never();
        let mut lookup = MockIpLookup::new();
        lookup.expect_public_ip().never();

        let err = update_if_changed(&provider, &lookup, "ghost.example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, DdnsError::NotFound(ref name) if name == "ghost.example.com"));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_rejected_update_fails_with_reasons() {
        let mut provider = provider_with("1.2.3.4");
        provider
            .expect_update()
            .times(1)
            .returning(|_, _| Ok(vec!["invalid target".to_string()]));
        let lookup = lookup_with("5.6.7.8");

        let err = update_if_changed(&provider, &lookup, "vpn.example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, DdnsError::UpdateRejected { .. }));
        assert!(err.to_string().contains("update failed"));
        assert!(err.to_string().contains("invalid target"));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut provider = provider_with("1.2.3.4");
        provider.expect_update().never();
        let mut lookup = MockIpLookup::new();
        lookup
            .expect_public_ip()
            .times(1)
            .returning(|| Err(DdnsError::Network("connection refused".to_string())));

        let err = update_if_changed(&provider, &lookup, "vpn.example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, DdnsError::Network(_)));
    }
}

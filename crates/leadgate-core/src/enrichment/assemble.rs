//! Concurrent snapshot assembly with graceful degradation.
//!
//! All providers are fetched as one fan-out/fan-in group; each call
//! carries its own timeout and its failure is isolated to its own
//! sub-record, which reverts to the neutral default. Overall latency is
//! bounded by the slowest provider plus its retries.

use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

use crate::domain::lead::Lead;
use crate::domain::snapshot::EnrichmentSnapshot;

use super::gateway::{EnrichmentGateway, FetchOutcome, Provider, ProviderPayload};
use super::retry::{fetch_with_retry, RetryPolicy};

/// Fetch every provider concurrently and assemble the snapshot.
///
/// An unavailable or timed-out provider leaves its sub-record at the
/// neutral default; the run always gets a complete snapshot. A payload
/// whose variant does not match the requested provider is treated the
/// same as unavailability.
pub async fn assemble_snapshot(
    gateway: &dyn EnrichmentGateway,
    policy: &RetryPolicy,
    provider_timeout: Duration,
    lead: &Lead,
) -> EnrichmentSnapshot {
    let fetches = Provider::ALL.map(|provider| async move {
        let outcome =
            tokio::time::timeout(provider_timeout, fetch_with_retry(gateway, policy, provider, lead))
                .await
                .unwrap_or_else(|_| {
                    FetchOutcome::unavailable(format!(
                        "timed out after {}ms",
                        provider_timeout.as_millis()
                    ))
                });
        (provider, outcome)
    });

    let mut snapshot = EnrichmentSnapshot::default();
    for (provider, outcome) in join_all(fetches).await {
        match outcome {
            FetchOutcome::Field(payload) if payload.provider() == provider => {
                apply_payload(&mut snapshot, payload);
            }
            FetchOutcome::Field(payload) => {
                warn!(
                    lead_id = %lead.id,
                    requested = %provider,
                    returned = %payload.provider(),
                    "gateway returned mismatched payload; using neutral default"
                );
            }
            FetchOutcome::Unavailable { reason } => {
                warn!(
                    lead_id = %lead.id,
                    provider = %provider,
                    %reason,
                    "provider unavailable; using neutral default"
                );
            }
        }
    }

    snapshot
}

fn apply_payload(snapshot: &mut EnrichmentSnapshot, payload: ProviderPayload) {
    match payload {
        ProviderPayload::Technology(v) => snapshot.tech = v,
        ProviderPayload::VisualQuality(v) => snapshot.visual = v,
        ProviderPayload::Performance(v) => snapshot.performance = v,
        ProviderPayload::Directory(v) => snapshot.directory = v,
        ProviderPayload::Reputation(v) => snapshot.reputation = v,
        ProviderPayload::Address(v) => snapshot.address = v,
        ProviderPayload::OwnerIdentity(v) => snapshot.owner = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{OwnerIdentity, VisualSignals};
    use async_trait::async_trait;
    use uuid::Uuid;

    struct PartialGateway;

    #[async_trait]
    impl EnrichmentGateway for PartialGateway {
        async fn fetch(&self, provider: Provider, _lead: &Lead) -> FetchOutcome {
            match provider {
                Provider::VisualQuality => {
                    FetchOutcome::Field(ProviderPayload::VisualQuality(VisualSignals { score: 25 }))
                }
                Provider::OwnerIdentity => {
                    FetchOutcome::Field(ProviderPayload::OwnerIdentity(OwnerIdentity {
                        owner_name: Some("Maria Gonzales".to_string()),
                        legal_entity_name: None,
                        license_number_hint: None,
                    }))
                }
                _ => FetchOutcome::unavailable("upstream 503"),
            }
        }
    }

    struct SlowGateway;

    #[async_trait]
    impl EnrichmentGateway for SlowGateway {
        async fn fetch(&self, _provider: Provider, _lead: &Lead) -> FetchOutcome {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            FetchOutcome::unavailable("unreachable")
        }
    }

    struct MismatchedGateway;

    #[async_trait]
    impl EnrichmentGateway for MismatchedGateway {
        async fn fetch(&self, _provider: Provider, _lead: &Lead) -> FetchOutcome {
            // Always claims to be the visual provider, whatever was asked.
            FetchOutcome::Field(ProviderPayload::VisualQuality(VisualSignals { score: 5 }))
        }
    }

    fn lead() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            business_name: "Acme Plumbing".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            phone: None,
            website: Some("https://acme.example".to_string()),
            rating: Some(3.1),
            review_count: Some(12),
        }
    }

    #[tokio::test]
    async fn test_partial_failure_uses_neutral_defaults() {
        let snapshot = assemble_snapshot(
            &PartialGateway,
            &RetryPolicy::none(),
            Duration::from_secs(5),
            &lead(),
        )
        .await;

        // Present providers land in the snapshot.
        assert_eq!(snapshot.visual.score, 25);
        assert_eq!(snapshot.owner.owner_name.as_deref(), Some("Maria Gonzales"));
        // Unavailable providers keep their neutral defaults.
        assert!(snapshot.tech.crm_detected);
        assert_eq!(snapshot.reputation.complaint_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_to_default() {
        let snapshot = assemble_snapshot(
            &SlowGateway,
            &RetryPolicy::none(),
            Duration::from_millis(50),
            &lead(),
        )
        .await;
        assert_eq!(snapshot, EnrichmentSnapshot::default());
    }

    #[tokio::test]
    async fn test_mismatched_payload_is_discarded() {
        let snapshot = assemble_snapshot(
            &MismatchedGateway,
            &RetryPolicy::none(),
            Duration::from_secs(5),
            &lead(),
        )
        .await;
        // The visual slot accepts its own payload; every other provider's
        // mismatched answer is dropped in favour of the default.
        assert_eq!(snapshot.visual.score, 5);
        assert!(snapshot.tech.booking_detected);
        assert_eq!(snapshot.owner, OwnerIdentity::default());
    }
}

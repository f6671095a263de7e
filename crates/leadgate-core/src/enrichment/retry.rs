//! Uniform retry/backoff policy applied at the gateway boundary.

use std::time::Duration;

use tracing::debug;

use crate::domain::lead::Lead;

use super::gateway::{EnrichmentGateway, FetchOutcome, Provider};

/// Bounded retry with exponential backoff.
///
/// One policy instance applies uniformly to every provider call; there is
/// no per-provider retry logic anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay before the given retry attempt (1-based retry index).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// Fetch one provider through the gateway, retrying `Unavailable` outcomes
/// per the policy. The final outcome after exhaustion is still
/// `Unavailable` — never an error.
pub async fn fetch_with_retry(
    gateway: &dyn EnrichmentGateway,
    policy: &RetryPolicy,
    provider: Provider,
    lead: &Lead,
) -> FetchOutcome {
    let attempts = policy.max_attempts.max(1);
    let mut last = FetchOutcome::unavailable("no attempt made");

    for attempt in 1..=attempts {
        match gateway.fetch(provider, lead).await {
            FetchOutcome::Field(payload) => return FetchOutcome::Field(payload),
            FetchOutcome::Unavailable { reason } => {
                debug!(
                    provider = %provider,
                    attempt,
                    %reason,
                    "provider unavailable"
                );
                last = FetchOutcome::Unavailable { reason };
                if attempt < attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }

    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::VisualSignals;
    use crate::enrichment::gateway::ProviderPayload;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use uuid::Uuid;

    struct FlakyGateway {
        fail_first: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl EnrichmentGateway for FlakyGateway {
        async fn fetch(&self, _provider: Provider, _lead: &Lead) -> FetchOutcome {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                FetchOutcome::unavailable("timeout")
            } else {
                FetchOutcome::Field(ProviderPayload::VisualQuality(VisualSignals { score: 33 }))
            }
        }
    }

    fn lead() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            business_name: "Acme Plumbing".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            phone: None,
            website: None,
            rating: None,
            review_count: None,
        }
    }

    #[test]
    fn test_backoff_schedule_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_mid_schedule() {
        let gateway = FlakyGateway {
            fail_first: 1,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        };
        let outcome = fetch_with_retry(&gateway, &policy, Provider::VisualQuality, &lead()).await;
        assert!(matches!(outcome, FetchOutcome::Field(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_yields_unavailable() {
        let gateway = FlakyGateway {
            fail_first: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        };
        let outcome = fetch_with_retry(&gateway, &policy, Provider::Performance, &lead()).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_fetches_once() {
        let gateway = FlakyGateway {
            fail_first: 0,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::ZERO,
        };
        let outcome = fetch_with_retry(&gateway, &policy, Provider::Technology, &lead()).await;
        assert!(matches!(outcome, FetchOutcome::Field(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}

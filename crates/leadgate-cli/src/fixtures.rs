//! Fixture-backed collaborators for offline qualification runs.
//!
//! The fixture file scripts per-lead provider payloads and the registry
//! records the waterfall can resolve against. A lead/provider pair absent
//! from the file behaves as an unavailable provider.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use leadgate_core::domain::snapshot::{
    AddressSignals, DirectorySignals, OwnerIdentity, PerformanceSignals, ReputationSignals,
    TechSignals, VisualSignals,
};
use leadgate_core::{
    EnrichmentGateway, FetchOutcome, Lead, LicenseRecord, Provider, ProviderPayload,
};

/// On-disk fixture schema.
#[derive(Debug, Default, Deserialize)]
pub struct EnrichmentFixtures {
    /// Provider payloads keyed by lead id, then provider name.
    #[serde(default)]
    pub providers: HashMap<Uuid, HashMap<String, serde_json::Value>>,
    /// Registry records available to the license waterfall.
    #[serde(default)]
    pub licenses: Vec<LicenseRecord>,
}

impl EnrichmentFixtures {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Gateway that answers from the fixture file.
pub struct FixtureGateway {
    providers: HashMap<Uuid, HashMap<String, serde_json::Value>>,
}

impl FixtureGateway {
    pub fn new(fixtures: &EnrichmentFixtures) -> Self {
        Self {
            providers: fixtures.providers.clone(),
        }
    }
}

#[async_trait]
impl EnrichmentGateway for FixtureGateway {
    async fn fetch(&self, provider: Provider, lead: &Lead) -> FetchOutcome {
        let Some(per_lead) = self.providers.get(&lead.id) else {
            return FetchOutcome::unavailable("lead not in fixtures");
        };
        let Some(value) = per_lead.get(&provider.to_string()) else {
            return FetchOutcome::unavailable("provider not in fixtures");
        };
        match parse_payload(provider, value.clone()) {
            Ok(payload) => FetchOutcome::Field(payload),
            Err(e) => FetchOutcome::unavailable(format!("malformed fixture: {e}")),
        }
    }
}

fn parse_payload(
    provider: Provider,
    value: serde_json::Value,
) -> Result<ProviderPayload, serde_json::Error> {
    let payload = match provider {
        Provider::Technology => ProviderPayload::Technology(serde_json::from_value::<TechSignals>(value)?),
        Provider::VisualQuality => {
            ProviderPayload::VisualQuality(serde_json::from_value::<VisualSignals>(value)?)
        }
        Provider::Performance => {
            ProviderPayload::Performance(serde_json::from_value::<PerformanceSignals>(value)?)
        }
        Provider::Directory => {
            ProviderPayload::Directory(serde_json::from_value::<DirectorySignals>(value)?)
        }
        Provider::Reputation => {
            ProviderPayload::Reputation(serde_json::from_value::<ReputationSignals>(value)?)
        }
        Provider::Address => ProviderPayload::Address(serde_json::from_value::<AddressSignals>(value)?),
        Provider::OwnerIdentity => {
            ProviderPayload::OwnerIdentity(serde_json::from_value::<OwnerIdentity>(value)?)
        }
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: Uuid) -> Lead {
        Lead {
            id,
            business_name: "Fixture Fencing".to_string(),
            city: "Tulsa".to_string(),
            state: "OK".to_string(),
            phone: None,
            website: Some("https://fixturefencing.example".to_string()),
            rating: None,
            review_count: None,
        }
    }

    fn fixtures(id: Uuid) -> EnrichmentFixtures {
        let mut per_lead = HashMap::new();
        per_lead.insert(
            "visual_quality".to_string(),
            serde_json::json!({ "score": 31 }),
        );
        per_lead.insert(
            "technology".to_string(),
            serde_json::json!({
                "cms": "joomla",
                "crm_detected": false,
                "booking_detected": false,
                "analytics_detected": false,
                "modern_stack": false
            }),
        );
        let mut providers = HashMap::new();
        providers.insert(id, per_lead);
        EnrichmentFixtures {
            providers,
            licenses: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_scripted_provider_is_served() {
        let id = Uuid::new_v4();
        let gateway = FixtureGateway::new(&fixtures(id));
        let outcome = gateway.fetch(Provider::VisualQuality, &lead(id)).await;
        match outcome {
            FetchOutcome::Field(ProviderPayload::VisualQuality(v)) => assert_eq!(v.score, 31),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_provider_is_unavailable() {
        let id = Uuid::new_v4();
        let gateway = FixtureGateway::new(&fixtures(id));
        let outcome = gateway.fetch(Provider::Reputation, &lead(id)).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_unknown_lead_is_unavailable() {
        let gateway = FixtureGateway::new(&fixtures(Uuid::new_v4()));
        let outcome = gateway
            .fetch(Provider::VisualQuality, &lead(Uuid::new_v4()))
            .await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_malformed_fixture_is_unavailable() {
        let id = Uuid::new_v4();
        let mut fixtures = fixtures(id);
        fixtures
            .providers
            .get_mut(&id)
            .unwrap()
            .insert("performance".to_string(), serde_json::json!("not an object"));
        let gateway = FixtureGateway::new(&fixtures);
        let outcome = gateway.fetch(Provider::Performance, &lead(id)).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }
}

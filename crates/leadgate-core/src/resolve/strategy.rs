//! Resolution strategies and their inputs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::lead::Lead;
use crate::domain::snapshot::OwnerIdentity;

use super::normalize::normalize_name;
use super::registry::{LicenseRecord, LicenseRegistry};

/// The identity fields available to build registry queries from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionInput {
    pub business_name: String,
    pub state: String,
    pub owner_name: Option<String>,
    pub legal_entity_name: Option<String>,
    pub license_number_hint: Option<String>,
}

impl ResolutionInput {
    /// Build the input from a lead plus the extracted owner identity.
    /// Owner extraction must have completed before this point.
    pub fn from_lead(lead: &Lead, owner: &OwnerIdentity) -> Self {
        Self {
            business_name: lead.business_name.clone(),
            state: lead.state.clone(),
            owner_name: owner.owner_name.clone(),
            legal_entity_name: owner.legal_entity_name.clone(),
            license_number_hint: owner.license_number_hint.clone(),
        }
    }
}

/// A query against the registry: which field to search and the key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryQuery {
    pub field: String,
    pub key: String,
    pub state: String,
}

/// One rung of the resolution waterfall.
///
/// `build_query` returning `None` means the strategy's required inputs
/// are absent; the waterfall skips it without counting an attempt.
#[async_trait]
pub trait ResolutionStrategy<T>: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_query(&self, input: &ResolutionInput) -> Option<RegistryQuery>;

    async fn lookup(&self, query: &RegistryQuery) -> anyhow::Result<Option<T>>;

    fn is_confident_match(&self, candidate: &T, input: &ResolutionInput) -> bool;
}

/// Exact lookup by an advertised license number.
pub struct LicenseNumberStrategy {
    pub registry: std::sync::Arc<dyn LicenseRegistry>,
}

#[async_trait]
impl ResolutionStrategy<LicenseRecord> for LicenseNumberStrategy {
    fn name(&self) -> &'static str {
        "license_number"
    }

    fn build_query(&self, input: &ResolutionInput) -> Option<RegistryQuery> {
        let hint = input.license_number_hint.as_deref()?.trim();
        if hint.is_empty() {
            return None;
        }
        Some(RegistryQuery {
            field: "license_number".to_string(),
            key: hint.to_string(),
            state: input.state.clone(),
        })
    }

    async fn lookup(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>> {
        self.registry.search(query).await
    }

    fn is_confident_match(&self, candidate: &LicenseRecord, input: &ResolutionInput) -> bool {
        // An exact license-number hit in the right state is definitive.
        candidate.state.eq_ignore_ascii_case(&input.state)
    }
}

/// Search by normalized business (or legal entity) name within the state.
pub struct BusinessNameStrategy {
    pub registry: std::sync::Arc<dyn LicenseRegistry>,
}

#[async_trait]
impl ResolutionStrategy<LicenseRecord> for BusinessNameStrategy {
    fn name(&self) -> &'static str {
        "business_name"
    }

    fn build_query(&self, input: &ResolutionInput) -> Option<RegistryQuery> {
        let raw = input
            .legal_entity_name
            .as_deref()
            .unwrap_or(&input.business_name);
        let key = normalize_name(raw);
        if key.is_empty() {
            return None;
        }
        Some(RegistryQuery {
            field: "business_name".to_string(),
            key,
            state: input.state.clone(),
        })
    }

    async fn lookup(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>> {
        self.registry.search(query).await
    }

    fn is_confident_match(&self, candidate: &LicenseRecord, input: &ResolutionInput) -> bool {
        if !candidate.state.eq_ignore_ascii_case(&input.state) {
            return false;
        }
        let candidate_name = normalize_name(&candidate.holder_name).to_lowercase();
        let query_name = normalize_name(
            input
                .legal_entity_name
                .as_deref()
                .unwrap_or(&input.business_name),
        )
        .to_lowercase();
        candidate_name == query_name
            || candidate_name.contains(&query_name)
            || query_name.contains(&candidate_name)
    }
}

/// Search by the extracted owner's normalized personal name.
pub struct OwnerNameStrategy {
    pub registry: std::sync::Arc<dyn LicenseRegistry>,
}

#[async_trait]
impl ResolutionStrategy<LicenseRecord> for OwnerNameStrategy {
    fn name(&self) -> &'static str {
        "owner_name"
    }

    fn build_query(&self, input: &ResolutionInput) -> Option<RegistryQuery> {
        let owner = input.owner_name.as_deref()?;
        let key = normalize_name(owner);
        if key.is_empty() {
            return None;
        }
        Some(RegistryQuery {
            field: "qualifier_name".to_string(),
            key,
            state: input.state.clone(),
        })
    }

    async fn lookup(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>> {
        self.registry.search(query).await
    }

    fn is_confident_match(&self, candidate: &LicenseRecord, input: &ResolutionInput) -> bool {
        if !candidate.state.eq_ignore_ascii_case(&input.state) {
            return false;
        }
        // Owner-name hits are weaker; require the qualifier to line up.
        match (&candidate.qualifier_name, &input.owner_name) {
            (Some(candidate_owner), Some(query_owner)) => {
                normalize_name(candidate_owner).to_lowercase()
                    == normalize_name(query_owner).to_lowercase()
            }
            _ => false,
        }
    }
}

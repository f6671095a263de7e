//! Uniform interface to the external signal providers.
//!
//! The gateway contract absorbs expected failure classes (timeouts,
//! non-success responses, malformed payloads) into [`FetchOutcome::Unavailable`]
//! instead of raising them. The snapshot assembler converts `Unavailable`
//! into the provider's neutral default.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::lead::Lead;
use crate::domain::snapshot::{
    AddressSignals, DirectorySignals, OwnerIdentity, PerformanceSignals, ReputationSignals,
    TechSignals, VisualSignals,
};

/// The independent signal providers behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Technology,
    VisualQuality,
    Performance,
    Directory,
    Reputation,
    Address,
    OwnerIdentity,
}

impl Provider {
    /// Providers fetched concurrently during snapshot assembly, in no
    /// particular order.
    pub const ALL: [Provider; 7] = [
        Provider::Technology,
        Provider::VisualQuality,
        Provider::Performance,
        Provider::Directory,
        Provider::Reputation,
        Provider::Address,
        Provider::OwnerIdentity,
    ];
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Technology => "technology",
            Self::VisualQuality => "visual_quality",
            Self::Performance => "performance",
            Self::Directory => "directory",
            Self::Reputation => "reputation",
            Self::Address => "address",
            Self::OwnerIdentity => "owner_identity",
        };
        write!(f, "{s}")
    }
}

/// A typed payload from one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderPayload {
    Technology(TechSignals),
    VisualQuality(VisualSignals),
    Performance(PerformanceSignals),
    Directory(DirectorySignals),
    Reputation(ReputationSignals),
    Address(AddressSignals),
    OwnerIdentity(OwnerIdentity),
}

impl ProviderPayload {
    /// The provider this payload belongs to.
    pub fn provider(&self) -> Provider {
        match self {
            Self::Technology(_) => Provider::Technology,
            Self::VisualQuality(_) => Provider::VisualQuality,
            Self::Performance(_) => Provider::Performance,
            Self::Directory(_) => Provider::Directory,
            Self::Reputation(_) => Provider::Reputation,
            Self::Address(_) => Provider::Address,
            Self::OwnerIdentity(_) => Provider::OwnerIdentity,
        }
    }
}

/// Result of one gateway fetch. Expected failures are data, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Field(ProviderPayload),
    Unavailable { reason: String },
}

impl FetchOutcome {
    /// Shorthand for an unavailability outcome.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Uniform access to N independent signal providers.
///
/// Implementations must never return an error for expected failure
/// classes; those map to [`FetchOutcome::Unavailable`].
#[async_trait]
pub trait EnrichmentGateway: Send + Sync {
    async fn fetch(&self, provider: Provider, lead: &Lead) -> FetchOutcome;
}

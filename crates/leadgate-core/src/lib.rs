//! Leadgate Core Library
//!
//! The lead-qualification decision core: enrichment snapshot assembly,
//! weighted-signal scoring, persona classification, waterfall license
//! resolution, and the consensus council, sequenced by the qualification
//! pipeline.

pub mod classify;
pub mod council;
pub mod domain;
pub mod enrichment;
pub mod orchestrator;
pub mod resolve;
pub mod scoring;
pub mod telemetry;

pub use classify::{classify, CategoryCheck, CategoryRule, ClassifierRuleSet};

pub use council::{
    convene, ConsensusResult, CouncilAgent, CouncilConfig, CouncilMode, Decision, ReviewContext,
    Vote, VoteChoice, VoteTally,
};

pub use domain::{
    AddressKind, CategoryAssignment, Confidence, CoreError, CouncilError, EnrichmentSnapshot,
    Lead, LeadPersona, LicenseInfo, LicenseStatus, OwnerIdentity, PipelineRun, Result, RunRecord,
    RunStatus, ScoreResult, Signal, SignalCategory, ValidationError, Verdict,
};

pub use enrichment::{
    assemble_snapshot, EnrichmentGateway, FetchOutcome, Provider, ProviderPayload, RetryPolicy,
};

pub use orchestrator::{DeliverySink, PipelineConfig, QualificationPipeline};

pub use resolve::{
    license_info_from, normalize_name, resolve, standard_strategies, AttemptOutcome,
    HttpLicenseRegistry, LicenseRecord, LicenseRegistry, RegistryQuery, ResolutionAttempt,
    ResolutionInput, ResolutionResult, ResolutionStrategy, StaticRegistry,
};

pub use scoring::{score, RuleSet, ScoringRule, SignalCheck, TOP_SIGNAL_LIMIT};

pub use telemetry::init_tracing;

/// Leadgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Domain model for the qualification decision core.

pub mod category;
pub mod error;
pub mod lead;
pub mod run;
pub mod signal;
pub mod snapshot;

pub use category::{CategoryAssignment, Confidence, LeadPersona};
pub use error::{CoreError, CouncilError, Result, ValidationError};
pub use lead::Lead;
pub use run::{PipelineRun, RunRecord, RunStatus};
pub use signal::{ScoreResult, Signal, SignalCategory, Verdict};
pub use snapshot::{
    AddressKind, AddressSignals, DirectorySignals, EnrichmentSnapshot, LicenseInfo, LicenseStatus,
    OwnerIdentity, PerformanceSignals, ReputationSignals, TechSignals, VisualSignals,
};

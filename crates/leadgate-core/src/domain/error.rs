//! Domain-level error taxonomy for the decision core.
//!
//! Provider unavailability, auto-disqualification, exhausted resolution,
//! and blocked/tied consensus are all *data states*, not errors — they
//! never appear here. Only validation failures and unexpected errors can
//! terminate a run as FAILED.

use uuid::Uuid;

/// Errors raised before any pipeline stage runs.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("lead {lead_id}: business name is required")]
    MissingBusinessName { lead_id: Uuid },

    #[error("lead {lead_id}: state code is required")]
    MissingState { lead_id: Uuid },
}

/// Errors from convening a consensus council.
#[derive(Debug, thiserror::Error)]
pub enum CouncilError {
    #[error("council convened with no agents")]
    NoAgents,

    #[error("all {count} agents failed to respond")]
    AllAgentsFailed { count: usize },
}

/// Decision-core errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("lead {lead_id} already has an active run")]
    RunAlreadyActive { lead_id: Uuid },

    #[error("council error: {0}")]
    Council(#[from] CouncilError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for decision-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

//! Council agents and their votes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::lead::Lead;
use crate::domain::signal::ScoreResult;
use crate::domain::snapshot::LicenseInfo;

/// The shared context every agent evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewContext {
    pub lead: Lead,
    pub score_result: Option<ScoreResult>,
    pub license: Option<LicenseInfo>,
    /// Free-form notes from the caller (e.g. why the run was marginal).
    pub notes: Option<String>,
}

/// A single agent's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Reject,
    Abstain,
}

/// One vote from one agent. Exactly one per agent per council invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub agent_id: String,
    pub choice: VoteChoice,
    /// Self-reported confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Objections strong enough to override any vote tally.
    pub blocking_concerns: Vec<String>,
    /// Non-blocking concerns, unioned in soft-consensus mode.
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Vote {
    /// A plain vote with no concerns attached.
    pub fn new(agent_id: impl Into<String>, choice: VoteChoice, confidence: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            choice,
            confidence: confidence.clamp(0.0, 1.0),
            blocking_concerns: Vec::new(),
            concerns: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// The abstain vote substituted when an agent fails to respond.
    pub fn failed(agent_id: impl Into<String>) -> Self {
        Self::new(agent_id, VoteChoice::Abstain, 0.0)
    }

    /// Attach a blocking concern.
    pub fn with_blocking_concern(mut self, concern: impl Into<String>) -> Self {
        self.blocking_concerns.push(concern.into());
        self
    }
}

/// An independent evaluator convened by the council.
#[async_trait]
pub trait CouncilAgent: Send + Sync {
    fn id(&self) -> &str;

    /// Evaluate the context and return a vote. Errors and unparseable
    /// output are mapped to an abstain by the council, never propagated.
    async fn evaluate(&self, context: &ReviewContext) -> anyhow::Result<Vote>;
}

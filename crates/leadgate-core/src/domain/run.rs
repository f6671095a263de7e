//! Pipeline run tracking and the persisted run-record boundary schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryAssignment;
use super::signal::ScoreResult;
use super::snapshot::LicenseInfo;

/// Status of a pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    New,
    Processing,
    Qualified,
    Rejected,
    NeedsReview,
    Delivered,
    Failed,
}

impl RunStatus {
    /// Whether this status is terminal. A run never leaves a terminal
    /// status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Qualified | Self::Rejected | Self::NeedsReview | Self::Delivered | Self::Failed
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Qualified => "QUALIFIED",
            Self::Rejected => "REJECTED",
            Self::NeedsReview => "NEEDS_REVIEW",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// One qualification run for one lead. Mutated only by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub lead_id: Uuid,
    pub status: RunStatus,
    /// Timestamp per completed stage, keyed by stage name.
    pub stage_timestamps: BTreeMap<String, DateTime<Utc>>,
    pub score_result: Option<ScoreResult>,
    pub category: Option<CategoryAssignment>,
    pub license: Option<LicenseInfo>,
    /// Non-empty whenever `status == Failed`.
    pub error: Option<String>,
}

impl PipelineRun {
    /// Create a fresh run in the `New` state.
    pub fn new(lead_id: Uuid, now: DateTime<Utc>) -> Self {
        let mut stage_timestamps = BTreeMap::new();
        stage_timestamps.insert("created".to_string(), now);
        Self {
            lead_id,
            status: RunStatus::New,
            stage_timestamps,
            score_result: None,
            category: None,
            license: None,
            error: None,
        }
    }

    /// Record a stage completion timestamp.
    pub fn mark_stage(&mut self, stage: &str, now: DateTime<Utc>) {
        self.stage_timestamps.insert(stage.to_string(), now);
    }

    /// Transition to a terminal `Failed` status with a captured message.
    pub fn fail(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.status = RunStatus::Failed;
        self.error = Some(message.into());
        self.mark_stage("failed", now);
    }

    /// Flatten into the stable boundary record consumed downstream.
    pub fn to_record(&self) -> RunRecord {
        RunRecord {
            lead_id: self.lead_id,
            status: self.status,
            score: self.score_result.as_ref().map(|s| s.score),
            fit_score: self.score_result.as_ref().map(|s| s.fit_score),
            signals: self
                .score_result
                .as_ref()
                .map(|s| s.signal_names())
                .unwrap_or_default(),
            category: self.category.as_ref().map(|c| c.persona.to_string()),
            reasoning: self.category.as_ref().map(|c| c.reason.clone()),
            timestamps: self.stage_timestamps.clone(),
            error: self.error.clone(),
        }
    }
}

/// Flat JSON-serializable run record. Field names are a stable contract
/// with downstream consumers — do not rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub lead_id: Uuid,
    pub status: RunStatus,
    pub score: Option<i32>,
    pub fit_score: Option<u8>,
    pub signals: Vec<String>,
    pub category: Option<String>,
    pub reasoning: Option<String>,
    pub timestamps: BTreeMap<String, DateTime<Utc>>,
    pub error: Option<String>,
}

//! Qualification pipeline — the run state machine.
//!
//! Sequences enrichment → license resolution → scoring → categorization →
//! delivery, with graceful degradation at every provider boundary. A
//! provider failure never fails a run; the only hard-fail paths are lead
//! validation and an unexpected error, both of which terminate at FAILED
//! with the message captured verbatim.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::classify::{classify, ClassifierRuleSet};
use crate::council::{convene, ConsensusResult, CouncilAgent, CouncilConfig, ReviewContext};
use crate::domain::error::{CoreError, CouncilError};
use crate::domain::lead::Lead;
use crate::domain::run::{PipelineRun, RunRecord, RunStatus};
use crate::domain::signal::Verdict;
use crate::domain::snapshot::EnrichmentSnapshot;
use crate::enrichment::{assemble_snapshot, EnrichmentGateway, RetryPolicy};
use crate::resolve::{
    license_info_from, resolve, standard_strategies, LicenseRegistry, ResolutionInput,
};
use crate::scoring::{score, RuleSet};

/// Hands a qualified run record to the downstream delivery integration.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, record: &RunRecord) -> anyhow::Result<()>;
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-provider fetch timeout during snapshot assembly.
    pub provider_timeout: Duration,
    pub retry: RetryPolicy,
    /// Worker-pool bound for batch processing.
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
            max_concurrency: 4,
        }
    }
}

/// The pipeline orchestrator. Collaborators are injected fully
/// configured; the pipeline owns no global state.
pub struct QualificationPipeline {
    gateway: Arc<dyn EnrichmentGateway>,
    registry: Arc<dyn LicenseRegistry>,
    delivery: Option<Arc<dyn DeliverySink>>,
    rule_set: RuleSet,
    classifier: ClassifierRuleSet,
    config: PipelineConfig,
    /// Lead ids with a currently active (non-terminal) run.
    active: Mutex<HashSet<Uuid>>,
}

impl QualificationPipeline {
    pub fn new(
        gateway: Arc<dyn EnrichmentGateway>,
        registry: Arc<dyn LicenseRegistry>,
        rule_set: RuleSet,
        classifier: ClassifierRuleSet,
        config: PipelineConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            delivery: None,
            rule_set,
            classifier,
            config,
            active: Mutex::new(HashSet::new()),
        }
    }

    /// Attach a delivery sink (builder pattern).
    pub fn with_delivery(mut self, sink: Arc<dyn DeliverySink>) -> Self {
        self.delivery = Some(sink);
        self
    }

    /// Process one lead to a terminal status. Always returns a run;
    /// failures are captured in the run record, never thrown.
    #[instrument(skip(self, lead), fields(lead_id = %lead.id))]
    pub async fn process(&self, lead: &Lead) -> PipelineRun {
        let mut run = PipelineRun::new(lead.id, Utc::now());

        if let Err(e) = lead.validate() {
            run.fail(CoreError::from(e).to_string(), Utc::now());
            return run;
        }

        let _guard = match ActiveGuard::acquire(&self.active, lead.id) {
            Some(guard) => guard,
            None => {
                run.fail(
                    CoreError::RunAlreadyActive { lead_id: lead.id }.to_string(),
                    Utc::now(),
                );
                return run;
            }
        };

        run.status = RunStatus::Processing;
        match self.run_stages(lead, &mut run).await {
            Ok(()) => {
                run.mark_stage("finished", Utc::now());
                info!(status = %run.status, "run reached terminal status");
            }
            Err(e) => {
                warn!(error = %e, "run failed");
                run.fail(e.to_string(), Utc::now());
            }
        }
        run
    }

    /// The stage sequence. Provider-level failures are absorbed inside
    /// each stage; any error escaping to here is the unexpected-error
    /// path and fails the run.
    async fn run_stages(&self, lead: &Lead, run: &mut PipelineRun) -> crate::domain::Result<()> {
        run.mark_stage("enrichment_started", Utc::now());
        let snapshot = self.enrich(lead).await;
        run.mark_stage("enrichment_completed", Utc::now());
        run.license = Some(snapshot.license.clone());

        let score_result = score(lead, &snapshot, &self.rule_set);
        run.mark_stage("scored", Utc::now());
        info!(
            score = score_result.score,
            verdict = ?score_result.verdict,
            auto_disqualified = score_result.auto_disqualified,
            "lead scored"
        );

        let verdict = score_result.verdict;
        run.score_result = Some(score_result);

        match verdict {
            Verdict::Rejected => {
                run.status = RunStatus::Rejected;
            }
            Verdict::Marginal => {
                // The consensus council is a distinct, separately
                // triggered operation — never chained here.
                run.status = RunStatus::NeedsReview;
            }
            Verdict::Qualified => {
                let signals = run
                    .score_result
                    .as_ref()
                    .map(|s| s.signals.clone())
                    .unwrap_or_default();
                run.category = Some(classify(lead, &snapshot, &signals, &self.classifier));
                run.mark_stage("categorized", Utc::now());
                run.status = RunStatus::Qualified;
                if self.deliver(run).await {
                    run.status = RunStatus::Delivered;
                    run.mark_stage("delivered", Utc::now());
                }
            }
        }
        Ok(())
    }

    /// Assemble the snapshot, then resolve the license. Owner extraction
    /// completes inside the assembly join before the waterfall starts.
    async fn enrich(&self, lead: &Lead) -> EnrichmentSnapshot {
        let mut snapshot = assemble_snapshot(
            self.gateway.as_ref(),
            &self.config.retry,
            self.config.provider_timeout,
            lead,
        )
        .await;

        let input = ResolutionInput::from_lead(lead, &snapshot.owner);
        let strategies = standard_strategies(Arc::clone(&self.registry));
        let resolution = resolve(&strategies, &input).await;
        if !resolution.found {
            info!(attempts = resolution.attempts, "license resolution exhausted");
        }
        snapshot.license = license_info_from(&resolution);
        snapshot
    }

    /// Attempt delivery when a sink is configured. Returns whether a
    /// delivery actually happened; failure is absorbed and the lead stays
    /// QUALIFIED for a later retry by the surrounding system.
    async fn deliver(&self, run: &PipelineRun) -> bool {
        let Some(sink) = &self.delivery else {
            return false;
        };
        match sink.deliver(&run.to_record()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "delivery failed; run stays qualified");
                false
            }
        }
    }

    /// Process a batch of leads through a bounded worker pool. Every
    /// input lead yields exactly one run record; output order follows
    /// completion, not input.
    pub async fn process_batch(self: Arc<Self>, leads: Vec<Lead>) -> Vec<PipelineRun> {
        let sem = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = Vec::with_capacity(leads.len());

        for lead in leads {
            let pipeline = Arc::clone(&self);
            let sem = Arc::clone(&sem);
            let lead_id = lead.id;
            let task = tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                pipeline.process(&lead).await
            });
            tasks.push((lead_id, task));
        }

        let mut runs = Vec::with_capacity(tasks.len());
        for (lead_id, task) in tasks {
            match task.await {
                Ok(run) => runs.push(run),
                Err(e) => {
                    // A panicked worker still owes the caller a record.
                    let mut run = PipelineRun::new(lead_id, Utc::now());
                    run.fail(
                        CoreError::Unexpected(format!("worker panicked: {e}")).to_string(),
                        Utc::now(),
                    );
                    runs.push(run);
                }
            }
        }
        runs
    }

    /// Convene the council over a marginal run. Does not mutate the run —
    /// NEEDS_REVIEW is terminal; the caller owns the follow-up.
    pub async fn review_marginal(
        &self,
        agents: &[Box<dyn CouncilAgent>],
        lead: &Lead,
        run: &PipelineRun,
        config: &CouncilConfig,
    ) -> Result<ConsensusResult, CouncilError> {
        let context = ReviewContext {
            lead: lead.clone(),
            score_result: run.score_result.clone(),
            license: run.license.clone(),
            notes: Some(format!("run status: {}", run.status)),
        };
        convene(agents, &context, config).await
    }
}

/// Removes the lead id from the active set when the run finishes, however
/// it finishes.
struct ActiveGuard<'a> {
    active: &'a Mutex<HashSet<Uuid>>,
    lead_id: Uuid,
}

impl<'a> ActiveGuard<'a> {
    fn acquire(active: &'a Mutex<HashSet<Uuid>>, lead_id: Uuid) -> Option<Self> {
        let mut set = active.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(lead_id) {
            return None;
        }
        Some(Self { active, lead_id })
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.active.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.lead_id);
    }
}

//! Consensus aggregation — strict voting and soft consensus.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::CouncilError;

use super::agent::{CouncilAgent, ReviewContext, Vote, VoteChoice};

/// How the council aggregates individual votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CouncilMode {
    /// Majority of approve vs reject; ties and blocking concerns surface
    /// as explicit non-decisions.
    StrictVote,
    /// Average confidence against a threshold; concerns are unioned, not
    /// voted on.
    SoftConsensus { approval_threshold: f64 },
}

/// Council configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    pub mode: CouncilMode,
    /// Per-agent evaluation timeout; a slower agent degrades to abstain.
    pub agent_timeout: Duration,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            mode: CouncilMode::StrictVote,
            agent_timeout: Duration::from_secs(30),
        }
    }
}

/// The aggregated decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
    Tie,
    Blocked,
    NeedsReview,
}

/// Vote counts for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approve: u32,
    pub reject: u32,
    pub abstain: u32,
    /// Approvals over all votes cast, abstains included in the
    /// denominator.
    pub approval_rate: f64,
}

/// The council's result for one invocation. Stateless; never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub decision: Decision,
    pub tally: VoteTally,
    pub average_confidence: f64,
    pub blocking_concerns: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub votes: Vec<Vote>,
}

/// Convene the council: every agent evaluates the same context
/// concurrently, bounded by the slowest responder. An agent that errors
/// or times out is mapped to an abstain vote with zero confidence.
///
/// # Errors
///
/// - [`CouncilError::NoAgents`] — empty agent list.
/// - [`CouncilError::AllAgentsFailed`] — not a single agent responded.
pub async fn convene(
    agents: &[Box<dyn CouncilAgent>],
    context: &ReviewContext,
    config: &CouncilConfig,
) -> Result<ConsensusResult, CouncilError> {
    if agents.is_empty() {
        return Err(CouncilError::NoAgents);
    }

    let evaluations = agents.iter().map(|agent| async move {
        match tokio::time::timeout(config.agent_timeout, agent.evaluate(context)).await {
            Ok(Ok(vote)) => (vote, true),
            Ok(Err(e)) => {
                warn!(agent = agent.id(), error = %e, "agent evaluation failed");
                (Vote::failed(agent.id()), false)
            }
            Err(_) => {
                warn!(agent = agent.id(), "agent timed out");
                (Vote::failed(agent.id()), false)
            }
        }
    });

    let outcomes = join_all(evaluations).await;
    let responded = outcomes.iter().filter(|(_, ok)| *ok).count();
    if responded == 0 {
        return Err(CouncilError::AllAgentsFailed {
            count: agents.len(),
        });
    }

    let votes: Vec<Vote> = outcomes.into_iter().map(|(vote, _)| vote).collect();
    Ok(aggregate(votes, &config.mode))
}

fn aggregate(votes: Vec<Vote>, mode: &CouncilMode) -> ConsensusResult {
    let approve = votes
        .iter()
        .filter(|v| v.choice == VoteChoice::Approve)
        .count() as u32;
    let reject = votes
        .iter()
        .filter(|v| v.choice == VoteChoice::Reject)
        .count() as u32;
    let abstain = votes
        .iter()
        .filter(|v| v.choice == VoteChoice::Abstain)
        .count() as u32;

    let total = votes.len() as f64;
    let tally = VoteTally {
        approve,
        reject,
        abstain,
        approval_rate: f64::from(approve) / total,
    };

    let average_confidence = votes.iter().map(|v| v.confidence).sum::<f64>() / total;
    let blocking_concerns = dedup_union(votes.iter().map(|v| v.blocking_concerns.iter()));
    let concerns = dedup_union(votes.iter().map(|v| v.concerns.iter()));
    let recommendations = dedup_union(votes.iter().map(|v| v.recommendations.iter()));

    let decision = match mode {
        CouncilMode::StrictVote => {
            if !blocking_concerns.is_empty() {
                // A blocking concern overrides the tally entirely.
                Decision::Blocked
            } else if approve > reject {
                Decision::Approved
            } else if reject > approve {
                Decision::Rejected
            } else {
                Decision::Tie
            }
        }
        CouncilMode::SoftConsensus { approval_threshold } => {
            if average_confidence >= *approval_threshold {
                Decision::Approved
            } else {
                Decision::NeedsReview
            }
        }
    };

    ConsensusResult {
        decision,
        tally,
        average_confidence,
        blocking_concerns,
        concerns,
        recommendations,
        votes,
    }
}

/// Union iterators of strings, de-duplicated, first-seen order preserved.
fn dedup_union<'a>(
    groups: impl Iterator<Item = std::slice::Iter<'a, String>>,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for group in groups {
        for item in group {
            if seen.insert(item.as_str()) {
                out.push(item.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(choice: VoteChoice, confidence: f64) -> Vote {
        Vote::new("agent", choice, confidence)
    }

    #[test]
    fn test_strict_majority_approves() {
        let votes = vec![
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Approve, 0.8),
            vote(VoteChoice::Approve, 0.7),
            vote(VoteChoice::Reject, 0.6),
        ];
        let result = aggregate(votes, &CouncilMode::StrictVote);
        assert_eq!(result.decision, Decision::Approved);
        assert_eq!(result.tally.approve, 3);
        assert_eq!(result.tally.reject, 1);
    }

    #[test]
    fn test_strict_equal_tallies_tie() {
        let votes = vec![
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Approve, 0.8),
            vote(VoteChoice::Reject, 0.7),
            vote(VoteChoice::Reject, 0.6),
        ];
        let result = aggregate(votes, &CouncilMode::StrictVote);
        assert_eq!(result.decision, Decision::Tie);
    }

    #[test]
    fn test_blocking_concern_overrides_unanimous_approval() {
        let votes = vec![
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Approve, 0.9),
            Vote::new("d", VoteChoice::Approve, 0.9)
                .with_blocking_concern("license belongs to a different entity"),
        ];
        let result = aggregate(votes, &CouncilMode::StrictVote);
        assert_eq!(result.decision, Decision::Blocked);
        assert_eq!(result.tally.approve, 4);
        assert_eq!(result.blocking_concerns.len(), 1);
    }

    #[test]
    fn test_abstains_excluded_from_majority_but_counted_in_rate() {
        let votes = vec![
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Abstain, 0.0),
            vote(VoteChoice::Abstain, 0.0),
        ];
        let result = aggregate(votes, &CouncilMode::StrictVote);
        // 1 approve vs 0 reject — approved despite two abstains.
        assert_eq!(result.decision, Decision::Approved);
        assert!((result.tally.approval_rate - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_abstain_is_tie() {
        let votes = vec![vote(VoteChoice::Abstain, 0.2), vote(VoteChoice::Abstain, 0.4)];
        let result = aggregate(votes, &CouncilMode::StrictVote);
        assert_eq!(result.decision, Decision::Tie);
    }

    #[test]
    fn test_soft_consensus_threshold() {
        let votes = vec![
            vote(VoteChoice::Approve, 0.9),
            vote(VoteChoice::Approve, 0.7),
        ];
        let approved = aggregate(
            votes.clone(),
            &CouncilMode::SoftConsensus {
                approval_threshold: 0.8,
            },
        );
        assert_eq!(approved.decision, Decision::Approved);

        let needs_review = aggregate(
            votes,
            &CouncilMode::SoftConsensus {
                approval_threshold: 0.85,
            },
        );
        assert_eq!(needs_review.decision, Decision::NeedsReview);
    }

    #[test]
    fn test_soft_mode_unions_and_dedups_concerns() {
        let mut a = vote(VoteChoice::Approve, 0.9);
        a.concerns = vec!["stale reviews".to_string(), "thin content".to_string()];
        a.recommendations = vec!["verify phone".to_string()];
        let mut b = vote(VoteChoice::Approve, 0.9);
        b.concerns = vec!["thin content".to_string(), "no ssl".to_string()];
        b.recommendations = vec!["verify phone".to_string()];

        let result = aggregate(
            vec![a, b],
            &CouncilMode::SoftConsensus {
                approval_threshold: 0.5,
            },
        );
        assert_eq!(
            result.concerns,
            vec!["stale reviews", "thin content", "no ssl"]
        );
        assert_eq!(result.recommendations, vec!["verify phone"]);
    }
}

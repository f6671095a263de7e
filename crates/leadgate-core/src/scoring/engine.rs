//! Weighted-signal scoring engine.
//!
//! Evaluates a [`RuleSet`] against an enrichment snapshot: every rule is
//! checked independently and the points summed — no early exit — except
//! for auto-disqualifiers, which halt evaluation and force a rejection.

use tracing::debug;

use crate::domain::lead::Lead;
use crate::domain::signal::{ScoreResult, Signal, Verdict};
use crate::domain::snapshot::EnrichmentSnapshot;

use super::rules::RuleSet;

/// Number of positive signals surfaced as `top_signals`.
pub const TOP_SIGNAL_LIMIT: usize = 3;

/// Score a lead's snapshot against a rule set.
pub fn score(lead: &Lead, snapshot: &EnrichmentSnapshot, rule_set: &RuleSet) -> ScoreResult {
    let mut signals: Vec<Signal> = Vec::new();

    for rule in &rule_set.rules {
        if !rule.check.holds(lead, snapshot) {
            continue;
        }

        if rule.auto_disqualify {
            // Hard stop: only the triggering signal survives, score is
            // forced to zero regardless of anything else found.
            debug!(lead_id = %lead.id, rule = %rule.name, "auto-disqualifier fired");
            return ScoreResult {
                score: 0,
                signals: vec![Signal {
                    name: rule.name.clone(),
                    points: 0,
                    category: rule.category,
                }],
                verdict: Verdict::Rejected,
                top_signals: Vec::new(),
                fit_score: 0,
                auto_disqualified: true,
            };
        }

        signals.push(Signal {
            name: rule.name.clone(),
            points: rule.points,
            category: rule.category,
        });
    }

    let total: i32 = signals.iter().map(|s| s.points).sum();
    let verdict = classify(total, rule_set);

    let mut positive: Vec<&Signal> = signals.iter().filter(|s| s.points > 0).collect();
    positive.sort_by(|a, b| b.points.cmp(&a.points));
    let top_signals: Vec<String> = positive
        .iter()
        .take(TOP_SIGNAL_LIMIT)
        .map(|s| s.name.clone())
        .collect();

    ScoreResult {
        score: total,
        fit_score: fit_score(total, rule_set.fit_ceiling),
        signals,
        verdict,
        top_signals,
        auto_disqualified: false,
    }
}

fn classify(score: i32, rule_set: &RuleSet) -> Verdict {
    if score <= rule_set.reject_max {
        Verdict::Rejected
    } else if score <= rule_set.marginal_max {
        Verdict::Marginal
    } else {
        Verdict::Qualified
    }
}

/// Cosmetic 0–100 fit transform: linear in the pain score, saturating at
/// the rule set's ceiling. Never feeds back into the verdict.
fn fit_score(score: i32, ceiling: i32) -> u8 {
    if ceiling <= 0 {
        return 0;
    }
    let bounded = score.max(0).min(ceiling);
    ((bounded * 100) / ceiling) as u8
}

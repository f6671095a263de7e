//! Pain signals and score results produced by the signal scorer.

use serde::{Deserialize, Serialize};

/// Category a pain signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    WebPresence,
    TechStack,
    Performance,
    Reputation,
    Licensing,
}

/// A single triggered signal. Ephemeral — only ever carried inside a
/// [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    /// Weighted points; negative for red flags that reduce opportunity.
    pub points: i32,
    pub category: SignalCategory,
}

/// Tri-state qualification verdict after threshold classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Rejected,
    Marginal,
    Qualified,
}

/// Outcome of scoring one lead against one rule set.
///
/// # Invariants
///
/// `score` equals the sum of `signals` points, unless an auto-disqualifier
/// fired — then `score == 0`, `verdict == Rejected`, and `signals` holds
/// only the triggering signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: i32,
    pub signals: Vec<Signal>,
    pub verdict: Verdict,
    /// Names of the strongest positive signals, for outreach copy.
    pub top_signals: Vec<String>,
    /// Bounded 0–100 fit score for downstream ranking. Cosmetic transform
    /// of `score`, never used for the verdict.
    pub fit_score: u8,
    /// Whether an auto-disqualifier short-circuited scoring.
    pub auto_disqualified: bool,
}

impl ScoreResult {
    /// Names of every triggered signal.
    pub fn signal_names(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serde_uppercase() {
        assert_eq!(
            serde_json::to_string(&Verdict::Qualified).unwrap(),
            "\"QUALIFIED\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::Marginal).unwrap(),
            "\"MARGINAL\""
        );
    }

    #[test]
    fn test_signal_serde_roundtrip() {
        let signal = Signal {
            name: "missing_crm".to_string(),
            points: 15,
            category: SignalCategory::TechStack,
        };
        let json = serde_json::to_string(&signal).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, back);
    }
}

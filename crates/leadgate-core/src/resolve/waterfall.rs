//! Waterfall resolution — try ordered strategies, stop at the first
//! confident match.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::strategy::{ResolutionInput, ResolutionStrategy};

/// What happened when one strategy executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Matched,
    NoMatch,
    /// The lookup returned a record the strategy was not confident about.
    LowConfidence,
    Error { message: String },
}

/// Diagnostic record of one executed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionAttempt {
    pub strategy: String,
    pub query_key: String,
    pub outcome: AttemptOutcome,
}

/// Final result of a waterfall run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult<T> {
    pub found: bool,
    pub record: Option<T>,
    /// Name of the winning strategy, when found.
    pub method: Option<String>,
    /// Number of lookups executed. Skipped strategies do not count.
    pub attempts: u32,
    /// Executed attempts in order, for diagnostics.
    pub trail: Vec<ResolutionAttempt>,
}

/// Run the waterfall: iterate strategies in priority order, skip any whose
/// required inputs are absent, and stop at the first confident match.
/// Lookup errors are recorded and the waterfall advances.
pub async fn resolve<T>(
    strategies: &[Box<dyn ResolutionStrategy<T>>],
    input: &ResolutionInput,
) -> ResolutionResult<T> {
    let mut attempts = 0u32;
    let mut trail = Vec::new();

    for strategy in strategies {
        let Some(query) = strategy.build_query(input) else {
            debug!(strategy = strategy.name(), "inputs absent; skipping");
            continue;
        };

        attempts += 1;
        match strategy.lookup(&query).await {
            Ok(Some(candidate)) => {
                if strategy.is_confident_match(&candidate, input) {
                    trail.push(ResolutionAttempt {
                        strategy: strategy.name().to_string(),
                        query_key: query.key,
                        outcome: AttemptOutcome::Matched,
                    });
                    return ResolutionResult {
                        found: true,
                        record: Some(candidate),
                        method: Some(strategy.name().to_string()),
                        attempts,
                        trail,
                    };
                }
                trail.push(ResolutionAttempt {
                    strategy: strategy.name().to_string(),
                    query_key: query.key,
                    outcome: AttemptOutcome::LowConfidence,
                });
            }
            Ok(None) => {
                trail.push(ResolutionAttempt {
                    strategy: strategy.name().to_string(),
                    query_key: query.key,
                    outcome: AttemptOutcome::NoMatch,
                });
            }
            Err(e) => {
                trail.push(ResolutionAttempt {
                    strategy: strategy.name().to_string(),
                    query_key: query.key,
                    outcome: AttemptOutcome::Error {
                        message: e.to_string(),
                    },
                });
            }
        }
    }

    ResolutionResult {
        found: false,
        record: None,
        method: None,
        attempts,
        trail,
    }
}

//! Signal scoring — rule sets and the evaluation engine.

pub mod engine;
pub mod rules;

pub use engine::{score, TOP_SIGNAL_LIMIT};
pub use rules::{RuleSet, ScoringRule, SignalCheck};

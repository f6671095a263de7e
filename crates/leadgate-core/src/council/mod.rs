//! Consensus council — independent evaluators whose judgments are
//! aggregated into one decision.
//!
//! Two operating modes: a strict approve/reject vote with a
//! blocking-concern override, and a soft averaged-confidence consensus
//! for non-binary reviews. Agent failure degrades to an abstain vote;
//! the council returns a result as long as at least one agent responds.

pub mod agent;
pub mod consensus;

pub use agent::{CouncilAgent, ReviewContext, Vote, VoteChoice};
pub use consensus::{
    convene, ConsensusResult, CouncilConfig, CouncilMode, Decision, VoteTally,
};

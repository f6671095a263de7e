//! Lead personas assigned by the category classifier.

use serde::{Deserialize, Serialize};

/// Closed set of outreach personas. Exactly one is assigned per lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadPersona {
    /// No website at all — invisible to anyone searching online.
    TheInvisible,
    /// Has a website, but it is visibly outdated or broken on mobile.
    TheDinosaur,
    /// Decent site that captures nothing — no booking, no CRM.
    TheLeakyBucket,
    /// Weak or unclaimed directory presence; trails competitors.
    TheGhost,
    /// Strong reputation with zero marketing machinery behind it.
    TheSleeper,
    /// No persona rule matched.
    Uncategorized,
}

impl std::fmt::Display for LeadPersona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TheInvisible => "THE_INVISIBLE",
            Self::TheDinosaur => "THE_DINOSAUR",
            Self::TheLeakyBucket => "THE_LEAKY_BUCKET",
            Self::TheGhost => "THE_GHOST",
            Self::TheSleeper => "THE_SLEEPER",
            Self::Uncategorized => "UNCATEGORIZED",
        };
        write!(f, "{s}")
    }
}

/// How certain the classifier is about the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// The classifier's output for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub persona: LeadPersona,
    /// Human-readable explanation rendered from the matching rule's
    /// reason template.
    pub reason: String,
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_serde_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&LeadPersona::TheInvisible).unwrap(),
            "\"THE_INVISIBLE\""
        );
        assert_eq!(
            serde_json::to_string(&LeadPersona::Uncategorized).unwrap(),
            "\"UNCATEGORIZED\""
        );
    }

    #[test]
    fn test_persona_display_matches_serde() {
        for persona in [
            LeadPersona::TheInvisible,
            LeadPersona::TheDinosaur,
            LeadPersona::TheLeakyBucket,
            LeadPersona::TheGhost,
            LeadPersona::TheSleeper,
            LeadPersona::Uncategorized,
        ] {
            let json = serde_json::to_string(&persona).unwrap();
            assert_eq!(json, format!("\"{persona}\""));
        }
    }
}

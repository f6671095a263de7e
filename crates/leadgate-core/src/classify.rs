//! Persona classification — an ordered rule table, first match wins.
//!
//! Priority is data, not control flow: the table is evaluated top to
//! bottom and later rules are never consulted once one matches. "No
//! website" outranks every other predicate by construction.

use serde::{Deserialize, Serialize};

use crate::domain::category::{CategoryAssignment, Confidence, LeadPersona};
use crate::domain::lead::Lead;
use crate::domain::signal::Signal;
use crate::domain::snapshot::EnrichmentSnapshot;

/// A predicate over the lead, its snapshot, and the triggered signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryCheck {
    NoWebsite,
    OutdatedSite { max_visual: u8 },
    NoCaptureTools,
    WeakDirectoryPresence { min_gap: f64 },
    StrongReputationNoStack { min_rating: f64, min_reviews: u32 },
}

impl CategoryCheck {
    fn holds(&self, lead: &Lead, snapshot: &EnrichmentSnapshot) -> bool {
        match self {
            Self::NoWebsite => !lead.has_website(),
            Self::OutdatedSite { max_visual } => {
                snapshot.visual.score < *max_visual || snapshot.performance.mobile_score < 40
            }
            Self::NoCaptureTools => {
                !snapshot.tech.booking_detected && !snapshot.tech.crm_detected
            }
            Self::WeakDirectoryPresence { min_gap } => {
                !snapshot.directory.listing_claimed || snapshot.reputation.rating_gap >= *min_gap
            }
            Self::StrongReputationNoStack {
                min_rating,
                min_reviews,
            } => {
                lead.rating.unwrap_or(0.0) >= *min_rating
                    && lead.review_count.unwrap_or(0) >= *min_reviews
                    && !snapshot.tech.modern_stack
                    && !snapshot.tech.crm_detected
            }
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub check: CategoryCheck,
    pub persona: LeadPersona,
    /// `{name}` is replaced with the business name.
    pub reason_template: String,
    pub confidence: Confidence,
}

/// The ordered classification table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRuleSet {
    pub rules: Vec<CategoryRule>,
}

impl ClassifierRuleSet {
    /// The standard persona table, highest priority first.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                CategoryRule {
                    check: CategoryCheck::NoWebsite,
                    persona: LeadPersona::TheInvisible,
                    reason_template: "{name} has no website and cannot be found online"
                        .to_string(),
                    confidence: Confidence::High,
                },
                CategoryRule {
                    check: CategoryCheck::OutdatedSite { max_visual: 40 },
                    persona: LeadPersona::TheDinosaur,
                    reason_template: "{name}'s website looks dated and underperforms on mobile"
                        .to_string(),
                    confidence: Confidence::High,
                },
                CategoryRule {
                    check: CategoryCheck::NoCaptureTools,
                    persona: LeadPersona::TheLeakyBucket,
                    reason_template:
                        "{name} has a site but no booking or CRM to capture the traffic"
                            .to_string(),
                    confidence: Confidence::High,
                },
                CategoryRule {
                    check: CategoryCheck::WeakDirectoryPresence { min_gap: 2.0 },
                    persona: LeadPersona::TheGhost,
                    reason_template: "{name} trails its market on directories and reviews"
                        .to_string(),
                    confidence: Confidence::Medium,
                },
                CategoryRule {
                    check: CategoryCheck::StrongReputationNoStack {
                        min_rating: 4.5,
                        min_reviews: 50,
                    },
                    persona: LeadPersona::TheSleeper,
                    reason_template:
                        "{name} has a strong reputation with no marketing machinery behind it"
                            .to_string(),
                    confidence: Confidence::Medium,
                },
            ],
        }
    }
}

/// Assign exactly one persona to the lead. The triggered signals are part
/// of the public contract for future rules but unused by the standard
/// table.
pub fn classify(
    lead: &Lead,
    snapshot: &EnrichmentSnapshot,
    _triggered_signals: &[Signal],
    rule_set: &ClassifierRuleSet,
) -> CategoryAssignment {
    for rule in &rule_set.rules {
        if rule.check.holds(lead, snapshot) {
            return CategoryAssignment {
                persona: rule.persona,
                reason: render_reason(&rule.reason_template, lead),
                confidence: rule.confidence,
            };
        }
    }

    CategoryAssignment {
        persona: LeadPersona::Uncategorized,
        reason: render_reason("{name} matched no persona rule", lead),
        confidence: Confidence::Low,
    }
}

fn render_reason(template: &str, lead: &Lead) -> String {
    template.replace("{name}", &lead.business_name)
}

//! Scoring rule sets — named, parameterized configurations.
//!
//! A rule set is data: an ordered list of `(predicate, points, category)`
//! tuples plus the thresholds that classify the summed score. Point values
//! for the same semantic signal intentionally differ between rule sets
//! (pre-qualification weighs free signals on a much smaller scale than the
//! full paid-enrichment set); the values are part of each configuration
//! and must not be unified.

use serde::{Deserialize, Serialize};

use crate::domain::lead::Lead;
use crate::domain::signal::SignalCategory;
use crate::domain::snapshot::{AddressKind, EnrichmentSnapshot};

/// A predicate over snapshot and lead fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalCheck {
    NoWebsite,
    MissingCrm,
    NoBookingSystem,
    NoAnalytics,
    VisualScoreBelow { max: u8 },
    PerformanceScoreBelow { max: u8 },
    RatingGapAtLeast { min: f64 },
    UnclaimedListing,
    FewReviews { max: u32 },
    ComplaintsOnFile { min: u32 },
    ModernMarketingStack,
    ResidentialAddress,
    LicenseInactive,
}

impl SignalCheck {
    /// Evaluate this predicate against a lead and its snapshot.
    pub fn holds(&self, lead: &Lead, snapshot: &EnrichmentSnapshot) -> bool {
        match self {
            Self::NoWebsite => !lead.has_website(),
            Self::MissingCrm => !snapshot.tech.crm_detected,
            Self::NoBookingSystem => !snapshot.tech.booking_detected,
            Self::NoAnalytics => !snapshot.tech.analytics_detected,
            Self::VisualScoreBelow { max } => snapshot.visual.score < *max,
            Self::PerformanceScoreBelow { max } => snapshot.performance.score < *max,
            Self::RatingGapAtLeast { min } => snapshot.reputation.rating_gap >= *min,
            Self::UnclaimedListing => !snapshot.directory.listing_claimed,
            Self::FewReviews { max } => lead.review_count.unwrap_or(0) < *max,
            Self::ComplaintsOnFile { min } => snapshot.reputation.complaint_count >= *min,
            Self::ModernMarketingStack => {
                snapshot.tech.modern_stack
                    && snapshot.tech.crm_detected
                    && snapshot.tech.analytics_detected
            }
            Self::ResidentialAddress => snapshot.address.kind == AddressKind::Residential,
            Self::LicenseInactive => snapshot.license.status.is_disqualifying(),
        }
    }
}

/// One scoring rule: a named predicate worth a number of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub name: String,
    pub check: SignalCheck,
    /// May be negative for red flags.
    pub points: i32,
    pub category: SignalCategory,
    /// When true and the predicate holds, scoring halts: score is forced
    /// to 0 and the verdict to REJECTED, all other signals discarded.
    pub auto_disqualify: bool,
}

impl ScoringRule {
    fn new(name: &str, check: SignalCheck, points: i32, category: SignalCategory) -> Self {
        Self {
            name: name.to_string(),
            check,
            points,
            category,
            auto_disqualify: false,
        }
    }

    fn disqualifier(name: &str, check: SignalCheck, category: SignalCategory) -> Self {
        Self {
            name: name.to_string(),
            check,
            points: 0,
            category,
            auto_disqualify: true,
        }
    }
}

/// A named rule set with its classification thresholds.
///
/// Classification is `score <= reject_max → REJECTED`,
/// `reject_max < score <= marginal_max → MARGINAL`, else `QUALIFIED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<ScoringRule>,
    pub reject_max: i32,
    pub marginal_max: i32,
    /// Score at which the cosmetic 0–100 fit transform saturates.
    pub fit_ceiling: i32,
}

impl RuleSet {
    /// Pre-qualification using only free signals (directory data, website
    /// presence, rating). Small point scale, small thresholds.
    pub fn pre_qualification() -> Self {
        Self {
            name: "pre_qualification".to_string(),
            rules: vec![
                ScoringRule::new(
                    "no_website",
                    SignalCheck::NoWebsite,
                    12,
                    SignalCategory::WebPresence,
                ),
                // Worth 10 in the full set; the free tier deliberately
                // weighs it lower.
                ScoringRule::new(
                    "no_booking_system",
                    SignalCheck::NoBookingSystem,
                    5,
                    SignalCategory::TechStack,
                ),
                ScoringRule::new(
                    "unclaimed_listing",
                    SignalCheck::UnclaimedListing,
                    4,
                    SignalCategory::Reputation,
                ),
                ScoringRule::new(
                    "rating_gap",
                    SignalCheck::RatingGapAtLeast { min: 1.0 },
                    4,
                    SignalCategory::Reputation,
                ),
                ScoringRule::new(
                    "few_reviews",
                    SignalCheck::FewReviews { max: 10 },
                    3,
                    SignalCategory::Reputation,
                ),
            ],
            reject_max: 7,
            marginal_max: 11,
            fit_ceiling: 25,
        }
    }

    /// Full qualification over paid enrichment, including the license
    /// auto-disqualifier.
    pub fn full_qualification() -> Self {
        Self {
            name: "full_qualification".to_string(),
            rules: vec![
                ScoringRule::disqualifier(
                    "license_inactive",
                    SignalCheck::LicenseInactive,
                    SignalCategory::Licensing,
                ),
                ScoringRule::new(
                    "no_website",
                    SignalCheck::NoWebsite,
                    25,
                    SignalCategory::WebPresence,
                ),
                ScoringRule::new(
                    "missing_crm",
                    SignalCheck::MissingCrm,
                    15,
                    SignalCategory::TechStack,
                ),
                ScoringRule::new(
                    "no_booking_system",
                    SignalCheck::NoBookingSystem,
                    10,
                    SignalCategory::TechStack,
                ),
                ScoringRule::new(
                    "no_analytics",
                    SignalCheck::NoAnalytics,
                    5,
                    SignalCategory::TechStack,
                ),
                ScoringRule::new(
                    "low_visual_quality",
                    SignalCheck::VisualScoreBelow { max: 40 },
                    15,
                    SignalCategory::WebPresence,
                ),
                ScoringRule::new(
                    "poor_performance",
                    SignalCheck::PerformanceScoreBelow { max: 50 },
                    10,
                    SignalCategory::Performance,
                ),
                ScoringRule::new(
                    "rating_gap",
                    SignalCheck::RatingGapAtLeast { min: 1.0 },
                    10,
                    SignalCategory::Reputation,
                ),
                ScoringRule::new(
                    "unclaimed_listing",
                    SignalCheck::UnclaimedListing,
                    5,
                    SignalCategory::Reputation,
                ),
                ScoringRule::new(
                    "complaints_on_file",
                    SignalCheck::ComplaintsOnFile { min: 3 },
                    -10,
                    SignalCategory::Reputation,
                ),
                ScoringRule::new(
                    "residential_address",
                    SignalCheck::ResidentialAddress,
                    -5,
                    SignalCategory::Reputation,
                ),
            ],
            reject_max: 39,
            marginal_max: 49,
            fit_ceiling: 80,
        }
    }

    /// Full set blended with AI-derived tech-stack signals; a detected
    /// modern marketing stack actively reduces the pain score.
    pub fn blended() -> Self {
        let mut set = Self::full_qualification();
        set.name = "blended".to_string();
        // Divergent weight, kept intentionally (see rule-set doc comment).
        if let Some(rule) = set.rules.iter_mut().find(|r| r.name == "no_booking_system") {
            rule.points = 8;
        }
        set.rules.push(ScoringRule::new(
            "modern_marketing_stack",
            SignalCheck::ModernMarketingStack,
            -15,
            SignalCategory::TechStack,
        ));
        set.reject_max = 44;
        set.marginal_max = 59;
        set.fit_ceiling = 90;
        set
    }

    /// Override the classification thresholds.
    pub fn with_thresholds(mut self, reject_max: i32, marginal_max: i32) -> Self {
        self.reject_max = reject_max;
        self.marginal_max = marginal_max;
        self
    }
}

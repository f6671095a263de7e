//! Enrichment snapshot — one typed sub-record per signal provider.
//!
//! Each sub-record's `Default` impl is its documented **neutral default**:
//! the value substituted when the provider is unavailable, chosen so the
//! default alone never triggers a pain signal. The snapshot is assembled
//! once per pipeline run and immutable afterwards.

use serde::{Deserialize, Serialize};

/// Technology stack detected on the lead's website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechSignals {
    /// Detected CMS/platform, if any.
    pub cms: Option<String>,
    /// A CRM or lead-capture tool is wired into the site.
    pub crm_detected: bool,
    /// An online booking/scheduling system is present.
    pub booking_detected: bool,
    /// An analytics tag is installed.
    pub analytics_detected: bool,
    /// The overall stack looks current (recent framework, SSL, responsive).
    pub modern_stack: bool,
}

impl Default for TechSignals {
    fn default() -> Self {
        // Assume tooling is present when the detector is unavailable, so the
        // absence of data never manufactures a pain signal. `modern_stack`
        // stays false: no rule rewards its absence, and the blended rule
        // set's negative signal must not fire from a default either.
        Self {
            cms: None,
            crm_detected: true,
            booking_detected: true,
            analytics_detected: true,
            modern_stack: false,
        }
    }
}

/// Visual quality assessment of the website (0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSignals {
    pub score: u8,
}

impl Default for VisualSignals {
    fn default() -> Self {
        Self { score: 70 }
    }
}

/// Page performance metrics (0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSignals {
    pub score: u8,
    pub mobile_score: u8,
}

impl Default for PerformanceSignals {
    fn default() -> Self {
        Self {
            score: 70,
            mobile_score: 70,
        }
    }
}

/// Directory/listing presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorySignals {
    /// The primary directory listing is claimed by the owner.
    pub listing_claimed: bool,
    /// Number of directories the business appears in.
    pub listing_count: u32,
}

impl Default for DirectorySignals {
    fn default() -> Self {
        Self {
            listing_claimed: true,
            listing_count: 0,
        }
    }
}

/// Reputation signals relative to local competitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationSignals {
    /// Competitor average rating minus this lead's rating. Positive means
    /// the lead trails its market.
    pub rating_gap: f64,
    /// Complaints on file with consumer agencies.
    pub complaint_count: u32,
    /// Share of recent reviews that are negative (0.0–1.0).
    pub negative_review_ratio: f64,
}

impl Default for ReputationSignals {
    fn default() -> Self {
        Self {
            rating_gap: 0.0,
            complaint_count: 0,
            negative_review_ratio: 0.0,
        }
    }
}

/// Classification of the registered business address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Commercial,
    Residential,
    PoBox,
    Unknown,
}

/// Address classification sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSignals {
    pub kind: AddressKind,
}

impl Default for AddressSignals {
    fn default() -> Self {
        Self {
            kind: AddressKind::Unknown,
        }
    }
}

/// Owner identity extracted from the website/listings. Feeds the license
/// resolution waterfall as query-key candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerIdentity {
    pub owner_name: Option<String>,
    pub legal_entity_name: Option<String>,
    /// License number scraped from the site or a listing, if advertised.
    pub license_number_hint: Option<String>,
}

/// Status of a resolved license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Expired,
    Suspended,
    Revoked,
    Unknown,
}

impl LicenseStatus {
    /// Whether this status disqualifies the lead outright.
    pub fn is_disqualifying(self) -> bool {
        matches!(self, Self::Expired | Self::Suspended | Self::Revoked)
    }
}

/// License information resolved through the registry waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Whether any registry record was confidently matched.
    pub found: bool,
    pub status: LicenseStatus,
    pub license_number: Option<String>,
    /// Name of the resolution strategy that produced the match.
    pub resolution_method: Option<String>,
    /// Number of registry lookups executed during resolution.
    pub resolution_attempts: u32,
}

impl Default for LicenseInfo {
    fn default() -> Self {
        Self {
            found: false,
            status: LicenseStatus::Unknown,
            license_number: None,
            resolution_method: None,
            resolution_attempts: 0,
        }
    }
}

/// The full enrichment snapshot for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSnapshot {
    pub tech: TechSignals,
    pub visual: VisualSignals,
    pub performance: PerformanceSignals,
    pub directory: DirectorySignals,
    pub reputation: ReputationSignals,
    pub address: AddressSignals,
    pub owner: OwnerIdentity,
    pub license: LicenseInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_defaults_are_benign() {
        let snapshot = EnrichmentSnapshot::default();
        assert!(snapshot.tech.crm_detected);
        assert!(snapshot.tech.booking_detected);
        assert!(snapshot.tech.analytics_detected);
        assert!(snapshot.visual.score >= 50);
        assert!(snapshot.performance.score >= 50);
        assert!(snapshot.directory.listing_claimed);
        assert_eq!(snapshot.reputation.rating_gap, 0.0);
        assert_eq!(snapshot.reputation.complaint_count, 0);
        assert_eq!(snapshot.address.kind, AddressKind::Unknown);
        assert_eq!(snapshot.license.status, LicenseStatus::Unknown);
    }

    #[test]
    fn test_license_status_disqualifying() {
        assert!(LicenseStatus::Expired.is_disqualifying());
        assert!(LicenseStatus::Suspended.is_disqualifying());
        assert!(LicenseStatus::Revoked.is_disqualifying());
        assert!(!LicenseStatus::Active.is_disqualifying());
        assert!(!LicenseStatus::Unknown.is_disqualifying());
    }

    #[test]
    fn test_serde_roundtrip() {
        let snapshot = EnrichmentSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: EnrichmentSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}

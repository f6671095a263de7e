//! Lead identity — the read-only input to every pipeline run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// A prospective business lead, created by the surrounding system.
///
/// The decision core never mutates a lead; it only reads identity fields
/// to drive enrichment, scoring, and resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier for this lead.
    pub id: Uuid,
    /// Business name as listed in the source directory.
    pub business_name: String,
    /// City where the business operates.
    pub city: String,
    /// Two-letter state code; also scopes license registry lookups.
    pub state: String,
    /// Primary contact phone, when known.
    pub phone: Option<String>,
    /// Website URL, when the business has one.
    pub website: Option<String>,
    /// External directory rating (e.g. 1.0–5.0).
    pub rating: Option<f64>,
    /// Number of reviews behind the rating.
    pub review_count: Option<u32>,
}

impl Lead {
    /// Check the mandatory fields required before processing can start.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingBusinessName`] — empty business name.
    /// - [`ValidationError::MissingState`] — empty state code.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.business_name.trim().is_empty() {
            return Err(ValidationError::MissingBusinessName { lead_id: self.id });
        }
        if self.state.trim().is_empty() {
            return Err(ValidationError::MissingState { lead_id: self.id });
        }
        Ok(())
    }

    /// Whether the lead has any web presence at all.
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}

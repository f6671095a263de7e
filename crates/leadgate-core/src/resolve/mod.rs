//! License resolution — waterfall search over ordered strategies.
//!
//! Given partial identity data (business name, extracted owner, an
//! advertised license number), try each strategy in priority order until
//! one produces a confident registry match. Exhaustion is a data state
//! ("unknown identity"), never an error.

pub mod normalize;
pub mod registry;
pub mod strategy;
pub mod waterfall;

use std::sync::Arc;

use crate::domain::snapshot::LicenseInfo;

pub use normalize::normalize_name;
pub use registry::{HttpLicenseRegistry, LicenseRecord, LicenseRegistry, StaticRegistry};
pub use strategy::{
    BusinessNameStrategy, LicenseNumberStrategy, OwnerNameStrategy, RegistryQuery,
    ResolutionInput, ResolutionStrategy,
};
pub use waterfall::{resolve, AttemptOutcome, ResolutionAttempt, ResolutionResult};

/// The standard license waterfall: exact number, then business name, then
/// owner name.
pub fn standard_strategies(
    registry: Arc<dyn LicenseRegistry>,
) -> Vec<Box<dyn ResolutionStrategy<LicenseRecord>>> {
    vec![
        Box::new(LicenseNumberStrategy {
            registry: Arc::clone(&registry),
        }),
        Box::new(BusinessNameStrategy {
            registry: Arc::clone(&registry),
        }),
        Box::new(OwnerNameStrategy { registry }),
    ]
}

/// Fold a waterfall result into the snapshot's license sub-record.
pub fn license_info_from(result: &ResolutionResult<LicenseRecord>) -> LicenseInfo {
    match &result.record {
        Some(record) if result.found => LicenseInfo {
            found: true,
            status: record.status,
            license_number: Some(record.license_number.clone()),
            resolution_method: result.method.clone(),
            resolution_attempts: result.attempts,
        },
        _ => LicenseInfo {
            resolution_attempts: result.attempts,
            ..LicenseInfo::default()
        },
    }
}

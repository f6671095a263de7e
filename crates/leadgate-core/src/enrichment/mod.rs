//! Enrichment boundary — gateway trait, retry policy, snapshot assembly.

pub mod assemble;
pub mod gateway;
pub mod retry;

pub use assemble::assemble_snapshot;
pub use gateway::{EnrichmentGateway, FetchOutcome, Provider, ProviderPayload};
pub use retry::{fetch_with_retry, RetryPolicy};

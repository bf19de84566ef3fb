//! Transaction enrichment: pure normalization plus the orchestrator
//! that drives categorization, geolocation, persistence, and caching.

pub mod normalizer;
pub mod orchestrator;

pub use orchestrator::EnrichmentOrchestrator;

//! Payment transaction enrichment engine.
//!
//! Takes raw payment transactions and augments them with merchant
//! category assignments, reference-set geolocation, and normalized
//! display fields, tracking each attempt through an explicit status
//! lifecycle. Results are cached and persisted through a pluggable
//! store.
//!
//! The main entry point is [`enrichment::EnrichmentOrchestrator`],
//! wired from a [`state::TransactionStore`], a
//! [`categorization::MerchantCategorizer`], and a
//! [`geolocation::GeolocationResolver`].

pub mod categorization;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod geolocation;
pub mod metrics;
pub mod models;
pub mod state;

pub use config::Config;
pub use enrichment::EnrichmentOrchestrator;
pub use error::{AppError, Result};
pub use models::{EnrichedTransaction, EnrichmentStatus, Transaction};

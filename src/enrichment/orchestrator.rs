use crate::categorization::MerchantCategorizer;
use crate::config::EnrichmentConfig;
use crate::enrichment::normalizer;
use crate::error::Result;
use crate::geolocation::GeolocationResolver;
use crate::metrics::{
    ENRICHMENTS_TOTAL, ENRICHMENT_CACHE_HITS_TOTAL, ENRICHMENT_DURATION_SECONDS,
};
use crate::models::{EnrichedTransaction, EnrichmentStatus, GeolocationData, Transaction};
use crate::state::{AppCache, CacheStats, TransactionStore};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Coordinates a full enrichment attempt: merchant categorization,
/// geolocation resolution, normalization, persistence, and result
/// caching. One instance is shared across tasks; a single `enrich` call
/// runs its steps sequentially.
#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    store: Arc<dyn TransactionStore>,
    categorizer: Arc<dyn MerchantCategorizer>,
    resolver: Arc<dyn GeolocationResolver>,
    result_cache: AppCache<String, EnrichedTransaction>,
    config: Arc<EnrichmentConfig>,
}

impl EnrichmentOrchestrator {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        categorizer: Arc<dyn MerchantCategorizer>,
        resolver: Arc<dyn GeolocationResolver>,
        config: EnrichmentConfig,
    ) -> Self {
        let result_cache = AppCache::new(
            config.result_cache_capacity,
            Duration::from_secs(config.result_cache_ttl_secs),
        );
        Self {
            store,
            categorizer,
            resolver,
            result_cache,
            config: Arc::new(config),
        }
    }

    /// Run one enrichment attempt for the transaction.
    ///
    /// A cached result for the same transaction id is returned as-is,
    /// with no status change and no persistence write. Otherwise the
    /// attempt advances the status to IN_PROGRESS, runs the lookups, and
    /// persists the transaction exactly once with its terminal status:
    /// COMPLETED with `enriched_at` set on success, FAILED on error.
    /// Failed attempts are never cached.
    pub async fn enrich(&self, mut transaction: Transaction) -> Result<EnrichedTransaction> {
        if let Some(cached) = self.result_cache.get(&transaction.transaction_id).await {
            debug!(
                transaction_id = %transaction.transaction_id,
                "Enrichment served from cache"
            );
            ENRICHMENT_CACHE_HITS_TOTAL.inc();
            return Ok(cached);
        }

        let start = Instant::now();
        info!(
            transaction_id = %transaction.transaction_id,
            merchant_id = %transaction.merchant_id,
            "Enriching transaction"
        );
        transaction.enrichment_status = Some(EnrichmentStatus::InProgress);

        match self.run_attempt(&mut transaction).await {
            Ok(enriched) => {
                ENRICHMENT_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());
                ENRICHMENTS_TOTAL.with_label_values(&["completed"]).inc();
                info!(
                    transaction_id = %enriched.transaction.transaction_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Enrichment completed"
                );
                self.result_cache
                    .insert(enriched.transaction.transaction_id.clone(), enriched.clone())
                    .await;
                Ok(enriched)
            }
            Err(err) => {
                ENRICHMENT_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());
                ENRICHMENTS_TOTAL.with_label_values(&["failed"]).inc();
                error!(
                    transaction_id = %transaction.transaction_id,
                    error = %err,
                    "Enrichment failed"
                );

                transaction.enrichment_status = Some(EnrichmentStatus::Failed);
                if let Err(save_err) = self.store.save(&transaction).await {
                    // The attempt error stays the root cause; the
                    // secondary save failure is only logged
                    error!(
                        transaction_id = %transaction.transaction_id,
                        error = %save_err,
                        "Failed to record FAILED status"
                    );
                }
                Err(err)
            }
        }
    }

    /// Offload a whole enrichment attempt to a background task. The
    /// handle resolves to the same result `enrich` would return.
    pub fn enrich_async(&self, transaction: Transaction) -> JoinHandle<Result<EnrichedTransaction>> {
        let orchestrator = self.clone();
        debug!(
            transaction_id = %transaction.transaction_id,
            "Scheduling async enrichment"
        );
        tokio::spawn(async move { orchestrator.enrich(transaction).await })
    }

    /// Enrich a batch sequentially, stopping at the first failure.
    /// Results are in input order; items enriched before a failure keep
    /// their persisted state and cache entries.
    pub async fn enrich_batch(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<EnrichedTransaction>> {
        info!(batch_size = transactions.len(), "Enriching transaction batch");

        let mut enriched = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            enriched.push(self.enrich(transaction).await?);
        }
        Ok(enriched)
    }

    /// Textual status of a transaction's latest attempt: "NOT_FOUND"
    /// when the store has never seen the id, "UNKNOWN" when the stored
    /// record carries no status, otherwise the status name.
    pub async fn enrichment_status(&self, transaction_id: &str) -> Result<String> {
        match self.store.find_by_id(transaction_id).await? {
            Some(transaction) => Ok(transaction.status_name()),
            None => Ok("NOT_FOUND".to_string()),
        }
    }

    /// Drop the cached result for one transaction
    pub async fn invalidate(&self, transaction_id: &str) {
        self.result_cache
            .invalidate(&transaction_id.to_string())
            .await;
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        self.result_cache.invalidate_all();
        info!("Enrichment result cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.result_cache.stats()
    }

    async fn run_attempt(&self, transaction: &mut Transaction) -> Result<EnrichedTransaction> {
        let merchant_category = self
            .categorizer
            .categorize(&transaction.merchant_id, &transaction.merchant_name)
            .await?;

        let geolocation = self.resolve_geolocation(transaction).await?;
        let normalized_data = normalizer::derive(transaction, geolocation.as_ref());

        transaction.enrichment_status = Some(EnrichmentStatus::Completed);
        transaction.enriched_at = Some(Utc::now());
        let stored = self.store.save(transaction).await?;

        Ok(EnrichedTransaction {
            transaction: stored,
            merchant_category: Some(merchant_category),
            geolocation,
            normalized_data,
            enriched_at: Utc::now(),
        })
    }

    /// Coordinates are authoritative when a complete pair is present;
    /// the address path is not consulted even if coordinates miss. The
    /// address fallback needs at least a country hint.
    async fn resolve_geolocation(
        &self,
        transaction: &Transaction,
    ) -> Result<Option<GeolocationData>> {
        let limit = Duration::from_secs(self.config.lookup_timeout_secs);

        if let Some((latitude, longitude)) = transaction.coordinates() {
            return self
                .bounded_lookup(
                    self.resolver.by_coordinates(latitude, longitude),
                    "coordinates",
                    &transaction.transaction_id,
                    limit,
                )
                .await;
        }

        if let Some(country) = transaction.country.as_deref() {
            let address = match transaction.city.as_deref() {
                Some(city) => format!("{}, {}", city, country),
                None => country.to_string(),
            };
            return self
                .bounded_lookup(
                    self.resolver.by_address(&address, country),
                    "address",
                    &transaction.transaction_id,
                    limit,
                )
                .await;
        }

        debug!(
            transaction_id = %transaction.transaction_id,
            "No location hints, skipping geolocation"
        );
        Ok(None)
    }

    /// An elapsed timeout degrades to a miss rather than failing the
    /// attempt; resolver errors still propagate
    async fn bounded_lookup<F>(
        &self,
        lookup: F,
        method: &'static str,
        transaction_id: &str,
        limit: Duration,
    ) -> Result<Option<GeolocationData>>
    where
        F: Future<Output = Result<Option<GeolocationData>>>,
    {
        match timeout(limit, lookup).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    transaction_id = %transaction_id,
                    method,
                    timeout_secs = limit.as_secs(),
                    "Geolocation lookup timed out, continuing without location"
                );
                Ok(None)
            }
        }
    }
}

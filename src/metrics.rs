//! Prometheus metrics for the enrichment engine.
//!
//! Instruments are registered once at startup via [`init_metrics`] and
//! exported in the text exposition format via [`gather_metrics`].
//! Recording never affects control flow.

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of enrichment attempts by outcome
    ///
    /// Labels: outcome (completed | failed)
    pub static ref ENRICHMENTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("enrichments_total", "Total number of enrichment attempts")
            .namespace("txn_enrichment"),
        &["outcome"]
    ).expect("Failed to create ENRICHMENTS_TOTAL metric");

    /// Enrichment attempt duration in seconds
    pub static ref ENRICHMENT_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "enrichment_duration_seconds",
            "Enrichment attempt duration in seconds"
        )
        .namespace("txn_enrichment")
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    ).expect("Failed to create ENRICHMENT_DURATION_SECONDS metric");

    /// Total number of enrichment requests served from the result cache
    pub static ref ENRICHMENT_CACHE_HITS_TOTAL: Counter = Counter::with_opts(
        Opts::new(
            "enrichment_cache_hits_total",
            "Total number of enrichment requests served from cache"
        )
        .namespace("txn_enrichment")
    ).expect("Failed to create ENRICHMENT_CACHE_HITS_TOTAL metric");

    /// Total number of newly derived merchant category assignments
    ///
    /// Labels: risk_level
    pub static ref MERCHANT_CATEGORIZATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            "merchant_categorizations_total",
            "Total number of newly derived merchant category assignments"
        )
        .namespace("txn_enrichment"),
        &["risk_level"]
    ).expect("Failed to create MERCHANT_CATEGORIZATIONS_TOTAL metric");

    /// Total number of geolocation lookups
    ///
    /// Labels: method (coordinates | address | ip), outcome (hit | miss | cached)
    pub static ref GEOLOCATION_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("geolocation_lookups_total", "Total number of geolocation lookups")
            .namespace("txn_enrichment"),
        &["method", "outcome"]
    ).expect("Failed to create GEOLOCATION_LOOKUPS_TOTAL metric");
}

/// Register all metrics with the Prometheus registry. Call once at
/// application startup; a second call reports an AlreadyReg error.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(ENRICHMENTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ENRICHMENT_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ENRICHMENT_CACHE_HITS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(MERCHANT_CATEGORIZATIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(GEOLOCATION_LOOKUPS_TOTAL.clone()))?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

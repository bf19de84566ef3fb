use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Enrichment configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Geolocation configuration
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Load configuration from compiled-in defaults, an optional file
    /// named by CONFIG_PATH, and TXN_ENRICH-prefixed environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: TXN_ENRICH_)
            .add_source(
                config::Environment::with_prefix("TXN_ENRICH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observability: ObservabilityConfig::default(),
            enrichment: EnrichmentConfig::default(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Max entries in the enrichment result cache
    #[serde(default = "default_result_cache_capacity")]
    pub result_cache_capacity: u64,

    /// Result cache time-to-live (seconds)
    #[serde(default = "default_result_cache_ttl")]
    pub result_cache_ttl_secs: u64,

    /// Upper bound on a single geolocation lookup (seconds); an elapsed
    /// timeout degrades to a no-match outcome
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            result_cache_capacity: default_result_cache_capacity(),
            result_cache_ttl_secs: default_result_cache_ttl(),
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Coordinate match radius (kilometers)
    #[serde(default = "default_match_radius_km")]
    pub match_radius_km: f64,

    /// Max entries per lookup cache
    #[serde(default = "default_geo_cache_capacity")]
    pub cache_capacity: u64,

    /// Lookup cache time-to-live (seconds)
    #[serde(default = "default_geo_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            match_radius_km: default_match_radius_km(),
            cache_capacity: default_geo_cache_capacity(),
            cache_ttl_secs: default_geo_cache_ttl(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "txn-enrichment".to_string()
}

fn default_true() -> bool {
    true
}

fn default_result_cache_capacity() -> u64 {
    10_000
}

fn default_result_cache_ttl() -> u64 {
    300
}

fn default_lookup_timeout() -> u64 {
    10
}

fn default_match_radius_km() -> f64 {
    50.0
}

fn default_geo_cache_capacity() -> u64 {
    4096
}

fn default_geo_cache_ttl() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.enrichment.result_cache_capacity, 10_000);
        assert_eq!(config.enrichment.lookup_timeout_secs, 10);
        assert_eq!(config.geolocation.match_radius_km, 50.0);
        assert!(config.observability.prometheus_enabled);
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_compiled_in_defaults_parse() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed.geolocation.match_radius_km, 50.0);
        assert_eq!(parsed.enrichment.result_cache_ttl_secs, 300);
    }
}

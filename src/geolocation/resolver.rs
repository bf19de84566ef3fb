use crate::config::GeolocationConfig;
use crate::error::Result;
use crate::geolocation::{reference, GeolocationResolver};
use crate::metrics::GEOLOCATION_LOOKUPS_TOTAL;
use crate::models::GeolocationData;
use crate::state::AppCache;
use async_trait::async_trait;
use std::time::Duration;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Resolver backed by the built-in reference set. Each lookup method has
/// its own cache, and misses are cached alongside hits so repeated
/// unresolvable inputs stay cheap.
#[derive(Clone)]
pub struct ReferenceSetResolver {
    radius_km: f64,
    coordinate_cache: AppCache<String, Option<GeolocationData>>,
    address_cache: AppCache<String, Option<GeolocationData>>,
    ip_cache: AppCache<String, Option<GeolocationData>>,
}

impl ReferenceSetResolver {
    pub fn new(config: GeolocationConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            radius_km: config.match_radius_km,
            coordinate_cache: AppCache::new(config.cache_capacity, ttl),
            address_cache: AppCache::new(config.cache_capacity, ttl),
            ip_cache: AppCache::new(config.cache_capacity, ttl),
        }
    }
}

impl Default for ReferenceSetResolver {
    fn default() -> Self {
        Self::new(GeolocationConfig::default())
    }
}

#[async_trait]
impl GeolocationResolver for ReferenceSetResolver {
    async fn by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeolocationData>> {
        let key = format!("{},{}", latitude, longitude);
        if let Some(cached) = self.coordinate_cache.get(&key).await {
            GEOLOCATION_LOOKUPS_TOTAL
                .with_label_values(&["coordinates", "cached"])
                .inc();
            return Ok(cached);
        }

        let resolved = reference::REFERENCE_LOCATIONS
            .iter()
            .find(|location| {
                haversine_km(latitude, longitude, location.latitude, location.longitude)
                    <= self.radius_km
            })
            .cloned();

        match &resolved {
            Some(location) => {
                tracing::debug!(
                    latitude,
                    longitude,
                    city = %location.city,
                    "Coordinates resolved to reference location"
                );
                GEOLOCATION_LOOKUPS_TOTAL
                    .with_label_values(&["coordinates", "hit"])
                    .inc();
            }
            None => {
                tracing::debug!(latitude, longitude, "No reference location within radius");
                GEOLOCATION_LOOKUPS_TOTAL
                    .with_label_values(&["coordinates", "miss"])
                    .inc();
            }
        }

        self.coordinate_cache.insert(key, resolved.clone()).await;
        Ok(resolved)
    }

    async fn by_address(&self, address: &str, country: &str) -> Result<Option<GeolocationData>> {
        // Country is part of the cache key but not of the match; the
        // reference entries carry their own country data
        let key = format!("{},{}", address, country);
        if let Some(cached) = self.address_cache.get(&key).await {
            GEOLOCATION_LOOKUPS_TOTAL
                .with_label_values(&["address", "cached"])
                .inc();
            return Ok(cached);
        }

        let resolved = reference::find_by_city_substring(address).cloned();

        match &resolved {
            Some(location) => {
                tracing::debug!(address, city = %location.city, "Address resolved to reference location");
                GEOLOCATION_LOOKUPS_TOTAL
                    .with_label_values(&["address", "hit"])
                    .inc();
            }
            None => {
                tracing::debug!(address, "Address matched no reference city");
                GEOLOCATION_LOOKUPS_TOTAL
                    .with_label_values(&["address", "miss"])
                    .inc();
            }
        }

        self.address_cache.insert(key, resolved.clone()).await;
        Ok(resolved)
    }

    async fn by_ip(&self, ip_address: &str) -> Result<Option<GeolocationData>> {
        let key = ip_address.to_string();
        if let Some(cached) = self.ip_cache.get(&key).await {
            GEOLOCATION_LOOKUPS_TOTAL
                .with_label_values(&["ip", "cached"])
                .inc();
            return Ok(cached);
        }

        // Hook for a future IP intelligence provider
        tracing::debug!(ip_address, "IP geolocation not available");
        GEOLOCATION_LOOKUPS_TOTAL
            .with_label_values(&["ip", "miss"])
            .inc();

        self.ip_cache.insert(key, None).await;
        Ok(None)
    }
}

pub mod reference;
pub mod resolver;

pub use reference::{find_by_city_substring, REFERENCE_LOCATIONS};
pub use resolver::{haversine_km, ReferenceSetResolver};

use crate::error::Result;
use crate::models::GeolocationData;
use async_trait::async_trait;

/// Trait for geolocation lookups. A miss is `Ok(None)`; errors are
/// reserved for infrastructure faults in downstream providers.
#[async_trait]
pub trait GeolocationResolver: Send + Sync {
    /// Resolve by capture-point coordinates
    async fn by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeolocationData>>;

    /// Resolve by free-form address text. The country argument is carried
    /// for interface compatibility and does not affect matching.
    async fn by_address(&self, address: &str, country: &str) -> Result<Option<GeolocationData>>;

    /// Resolve by IP address. No provider is wired in; always a miss.
    async fn by_ip(&self, ip_address: &str) -> Result<Option<GeolocationData>>;
}

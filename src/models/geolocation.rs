use serde::{Deserialize, Serialize};

/// Location attributes resolved for a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeolocationData {
    pub country: String,

    /// ISO 3166-1 alpha-2 code
    pub country_code: String,

    pub city: String,

    /// Province, state, or equivalent subdivision
    pub region: String,

    pub latitude: f64,

    pub longitude: f64,

    /// IANA timezone identifier
    pub timezone: String,

    #[serde(default)]
    pub postal_code: Option<String>,
}

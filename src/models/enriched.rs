use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::MerchantCategory;
use super::geolocation::GeolocationData;
use super::transaction::Transaction;

/// Canonical fields derived deterministically from a transaction and its
/// resolved geolocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedData {
    /// Merchant name trimmed, uppercased, stripped of punctuation
    pub normalized_merchant_name: String,

    /// "City, Region, Country" rendering of the resolved location
    pub standardized_address: Option<String>,

    /// Amount rendered with two decimal places and the currency code
    pub formatted_amount: String,

    /// ISO country code taken from the resolved geolocation
    pub iso_country_code: Option<String>,
}

/// Aggregate produced by a successful enrichment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,

    pub merchant_category: Option<MerchantCategory>,

    pub geolocation: Option<GeolocationData>,

    pub normalized_data: NormalizedData,

    /// Stamped when the aggregate is assembled; may trail the
    /// transaction's own enriched_at by microseconds
    pub enriched_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

/// A payment transaction flowing through the enrichment pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Transaction {
    /// Unique identifier assigned at ingress
    #[validate(length(min = 1, max = 64))]
    pub transaction_id: String,

    /// Merchant identifier from the acquirer
    #[validate(length(min = 1, max = 64))]
    pub merchant_id: String,

    /// Raw merchant descriptor as captured at the terminal
    #[validate(length(min = 1, max = 255))]
    pub merchant_name: String,

    /// Monetary amount, must be positive
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    /// ISO 4217 currency code
    #[validate(length(equal = 3))]
    pub currency: String,

    /// Ingress timestamp, assigned when the transaction enters the system
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Country hint supplied by the acquirer, if any
    #[serde(default)]
    pub country: Option<String>,

    /// City hint supplied by the acquirer, if any
    #[serde(default)]
    pub city: Option<String>,

    /// Capture-point latitude, if the terminal reported one
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Capture-point longitude, if the terminal reported one
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Lifecycle status of the latest enrichment attempt
    #[serde(default)]
    pub enrichment_status: Option<EnrichmentStatus>,

    /// Set when an enrichment attempt completes successfully
    #[serde(default)]
    pub enriched_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a new transaction with an ingress timestamp and PENDING status
    pub fn new(
        transaction_id: String,
        merchant_id: String,
        merchant_name: String,
        amount: Decimal,
        currency: String,
    ) -> Self {
        Self {
            transaction_id,
            merchant_id,
            merchant_name,
            amount,
            currency,
            timestamp: Utc::now(),
            country: None,
            city: None,
            latitude: None,
            longitude: None,
            enrichment_status: Some(EnrichmentStatus::Pending),
            enriched_at: None,
        }
    }

    /// Attach capture-point coordinates
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Attach an acquirer-supplied address hint
    pub fn with_address(mut self, country: impl Into<String>, city: Option<String>) -> Self {
        self.country = Some(country.into());
        self.city = city;
        self
    }

    /// Both coordinates, when the terminal reported a complete pair
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Textual status name, "UNKNOWN" when the status field is unset
    pub fn status_name(&self) -> String {
        self.enrichment_status
            .map(|status| status.to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }
}

/// Lifecycle of a single enrichment attempt. Advances monotonically
/// within an attempt; a later attempt may restart the cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    /// Reserved for partial-result support; no current path produces it
    PartiallyEnriched,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_creation() {
        let txn = Transaction::new(
            "txn-1".to_string(),
            "merch-1".to_string(),
            "Joe's Restaurant".to_string(),
            dec!(50.00),
            "USD".to_string(),
        );

        assert_eq!(txn.enrichment_status, Some(EnrichmentStatus::Pending));
        assert!(txn.enriched_at.is_none());
        assert!(txn.coordinates().is_none());
        assert_eq!(txn.status_name(), "PENDING");
    }

    #[test]
    fn test_coordinates_require_complete_pair() {
        let mut txn = Transaction::new(
            "txn-1".to_string(),
            "merch-1".to_string(),
            "Store".to_string(),
            dec!(10.00),
            "USD".to_string(),
        );

        txn.latitude = Some(40.7128);
        assert!(txn.coordinates().is_none());

        txn.longitude = Some(-74.0060);
        assert_eq!(txn.coordinates(), Some((40.7128, -74.0060)));
    }

    #[test]
    fn test_status_name_unknown_when_unset() {
        let mut txn = Transaction::new(
            "txn-1".to_string(),
            "merch-1".to_string(),
            "Store".to_string(),
            dec!(10.00),
            "USD".to_string(),
        );
        txn.enrichment_status = None;

        assert_eq!(txn.status_name(), "UNKNOWN");
    }

    #[test]
    fn test_status_display_names() {
        assert_eq!(EnrichmentStatus::Pending.to_string(), "PENDING");
        assert_eq!(EnrichmentStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(EnrichmentStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(EnrichmentStatus::Failed.to_string(), "FAILED");
        assert_eq!(
            EnrichmentStatus::PartiallyEnriched.to_string(),
            "PARTIALLY_ENRICHED"
        );
    }

    #[test]
    fn test_validation_rules() {
        use validator::Validate;

        let valid = Transaction::new(
            "txn-1".to_string(),
            "merch-1".to_string(),
            "Store".to_string(),
            dec!(10.00),
            "USD".to_string(),
        );
        assert!(valid.validate().is_ok());

        let mut empty_id = valid.clone();
        empty_id.transaction_id = String::new();
        assert!(empty_id.validate().is_err());

        let mut bad_currency = valid.clone();
        bad_currency.currency = "US".to_string();
        assert!(bad_currency.validate().is_err());

        let mut negative_amount = valid.clone();
        negative_amount.amount = dec!(-1.00);
        assert!(negative_amount.validate().is_err());

        let mut zero_amount = valid;
        zero_amount.amount = Decimal::ZERO;
        assert!(zero_amount.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip_preserves_status() {
        let txn = Transaction::new(
            "txn-1".to_string(),
            "merch-1".to_string(),
            "Store".to_string(),
            dec!(10.00),
            "USD".to_string(),
        )
        .with_coordinates(49.2827, -123.1207);

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"PENDING\""));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.enrichment_status, Some(EnrichmentStatus::Pending));
        assert_eq!(back.coordinates(), Some((49.2827, -123.1207)));
        assert_eq!(back.amount, txn.amount);
    }

    #[test]
    fn test_deserialization_defaults_ingress_fields() {
        let json = r#"{
            "transaction_id": "txn-9",
            "merchant_id": "merch-9",
            "merchant_name": "Corner Store",
            "amount": "12.50",
            "currency": "CAD"
        }"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.enrichment_status.is_none());
        assert!(txn.country.is_none());
        assert!(txn.coordinates().is_none());
    }
}

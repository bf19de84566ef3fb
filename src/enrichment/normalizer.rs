//! Pure derivation of canonical transaction fields. No I/O, no clock
//! reads; the same inputs always produce the same output.

use crate::models::{GeolocationData, NormalizedData, Transaction};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Z0-9\s]").expect("invalid merchant name pattern"));

/// Uppercase the merchant name and strip everything outside letters,
/// digits, and whitespace. Idempotent: normalizing an already-normalized
/// name is a no-op.
pub fn normalize_merchant_name(raw: &str) -> String {
    let upper = raw.to_uppercase();
    NON_ALPHANUMERIC.replace_all(&upper, "").trim().to_string()
}

/// Render the amount with two decimal places followed by the currency code
pub fn format_amount(amount: &Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// "City, Region, Country" rendering; empty components are skipped
pub fn standardize_address(location: &GeolocationData) -> String {
    let mut out = String::new();
    if !location.city.is_empty() {
        out.push_str(&location.city);
        out.push_str(", ");
    }
    if !location.region.is_empty() {
        out.push_str(&location.region);
        out.push_str(", ");
    }
    if !location.country.is_empty() {
        out.push_str(&location.country);
    }
    out
}

/// Assemble the normalized view of a transaction
pub fn derive(transaction: &Transaction, geolocation: Option<&GeolocationData>) -> NormalizedData {
    NormalizedData {
        normalized_merchant_name: normalize_merchant_name(&transaction.merchant_name),
        standardized_address: geolocation.map(standardize_address),
        formatted_amount: format_amount(&transaction.amount, &transaction.currency),
        iso_country_code: geolocation.map(|location| location.country_code.clone()),
    }
}

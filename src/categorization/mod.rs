pub mod rules;
pub mod service;

pub use rules::{match_rule, CategoryRule, CATEGORY_RULES, DEFAULT_RULE};
pub use service::KeywordCategorizer;

use crate::error::Result;
use crate::models::MerchantCategory;
use async_trait::async_trait;

/// Trait for merchant categorization. Assignments are sticky: once a
/// merchant has a category, later sightings reuse it regardless of the
/// name they carry.
#[async_trait]
pub trait MerchantCategorizer: Send + Sync {
    /// Existing assignment for a merchant, if one has been derived
    async fn category_for(&self, merchant_id: &str) -> Result<Option<MerchantCategory>>;

    /// Return the merchant's assignment, deriving and persisting one from
    /// the merchant name on first sight. First write wins under
    /// concurrent derivation.
    async fn categorize(&self, merchant_id: &str, merchant_name: &str)
        -> Result<MerchantCategory>;

    /// Administrative overwrite of an assignment, bypassing first-write-wins
    async fn update_category(&self, category: MerchantCategory) -> Result<()>;
}

use crate::categorization::rules;
use crate::categorization::MerchantCategorizer;
use crate::error::Result;
use crate::metrics::MERCHANT_CATEGORIZATIONS_TOTAL;
use crate::models::MerchantCategory;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Keyword-rule categorizer with an in-memory assignment store.
/// Assignments are derived from the merchant name seen first and reused
/// for every later transaction from the same merchant.
#[derive(Clone)]
pub struct KeywordCategorizer {
    assignments: Arc<DashMap<String, MerchantCategory>>,
}

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self {
            assignments: Arc::new(DashMap::new()),
        }
    }

    /// Number of merchants with an assignment
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

impl Default for KeywordCategorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MerchantCategorizer for KeywordCategorizer {
    async fn category_for(&self, merchant_id: &str) -> Result<Option<MerchantCategory>> {
        Ok(self.assignments.get(merchant_id).map(|entry| entry.clone()))
    }

    async fn categorize(&self, merchant_id: &str, merchant_name: &str) -> Result<MerchantCategory> {
        // Atomic check-then-insert: under concurrent first sightings of a
        // merchant exactly one derivation is stored, and every caller gets
        // the stored assignment
        let category = self
            .assignments
            .entry(merchant_id.to_string())
            .or_insert_with(|| {
                let rule = rules::match_rule(merchant_name);
                tracing::debug!(
                    merchant_id = %merchant_id,
                    merchant_name = %merchant_name,
                    category_code = %rule.category_code,
                    risk_level = %rule.risk_level,
                    "Derived merchant category"
                );
                MERCHANT_CATEGORIZATIONS_TOTAL
                    .with_label_values(&[&rule.risk_level.to_string()])
                    .inc();
                MerchantCategory::new(
                    merchant_id.to_string(),
                    rule.category_code.to_string(),
                    rule.category_name.to_string(),
                    rule.industry.to_string(),
                    rule.risk_level,
                )
            })
            .clone();

        Ok(category)
    }

    async fn update_category(&self, category: MerchantCategory) -> Result<()> {
        tracing::info!(
            merchant_id = %category.merchant_id,
            category_code = %category.category_code,
            "Merchant category overwritten"
        );
        self.assignments
            .insert(category.merchant_id.clone(), category);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    #[tokio::test]
    async fn test_categorize_persists_assignment() {
        let categorizer = KeywordCategorizer::new();

        assert!(categorizer.category_for("merch-1").await.unwrap().is_none());

        let category = categorizer
            .categorize("merch-1", "Joe's Restaurant")
            .await
            .unwrap();
        assert_eq!(category.category_code, "5812");
        assert_eq!(category.merchant_id, "merch-1");

        let stored = categorizer.category_for("merch-1").await.unwrap();
        assert_eq!(stored, Some(category));
        assert_eq!(categorizer.assignment_count(), 1);
    }

    #[tokio::test]
    async fn test_first_write_wins() {
        let categorizer = KeywordCategorizer::new();

        let first = categorizer
            .categorize("merch-1", "Lucky Casino")
            .await
            .unwrap();
        assert_eq!(first.category_code, "7995");

        // A later sighting under a different descriptor must not change
        // the stored assignment
        let second = categorizer
            .categorize("merch-1", "Joe's Restaurant")
            .await
            .unwrap();
        assert_eq!(second.category_code, "7995");
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_concurrent_categorize_stores_single_assignment() {
        let categorizer = KeywordCategorizer::new();

        let mut handles = Vec::new();
        for i in 0..16 {
            let categorizer = categorizer.clone();
            let name = if i % 2 == 0 {
                "Lucky Casino"
            } else {
                "Joe's Restaurant"
            };
            handles.push(tokio::spawn(async move {
                categorizer.categorize("merch-1", name).await.unwrap()
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // Whichever derivation won, everyone observes it
        let stored = categorizer.category_for("merch-1").await.unwrap().unwrap();
        assert!(results.iter().all(|c| *c == stored));
        assert_eq!(categorizer.assignment_count(), 1);
    }

    #[tokio::test]
    async fn test_update_category_overwrites() {
        let categorizer = KeywordCategorizer::new();

        categorizer
            .categorize("merch-1", "Corner Store")
            .await
            .unwrap();

        let correction = MerchantCategory::new(
            "merch-1".to_string(),
            "5812".to_string(),
            "Restaurant".to_string(),
            "Food & Beverage".to_string(),
            RiskLevel::Low,
        );
        categorizer.update_category(correction.clone()).await.unwrap();

        let stored = categorizer.category_for("merch-1").await.unwrap();
        assert_eq!(stored, Some(correction));
    }

    #[tokio::test]
    async fn test_unmatched_name_gets_default_bucket() {
        let categorizer = KeywordCategorizer::new();

        let category = categorizer
            .categorize("merch-1", "Quiet Bookstore Annex")
            .await
            .unwrap();
        assert_eq!(category.category_code, "5999");
        assert_eq!(category.category_name, "Miscellaneous");
        assert_eq!(category.risk_level, RiskLevel::Low);
    }
}

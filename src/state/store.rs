use crate::error::{AppError, Result};
use crate::models::Transaction;
use crate::state::TransactionStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory transaction store backed by concurrent maps, with a
/// secondary index from merchant id to transaction ids
#[derive(Clone)]
pub struct InMemoryStore {
    transactions: Arc<DashMap<String, Transaction>>,
    merchant_index: Arc<DashMap<String, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            transactions: Arc::new(DashMap::new()),
            merchant_index: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn save(&self, transaction: &Transaction) -> Result<Transaction> {
        let stored = transaction.clone();
        self.transactions
            .insert(stored.transaction_id.clone(), stored.clone());

        // Index per merchant; re-saving the same transaction must not
        // duplicate the entry
        let mut ids = self
            .merchant_index
            .entry(stored.merchant_id.clone())
            .or_default();
        if !ids.contains(&stored.transaction_id) {
            ids.push(stored.transaction_id.clone());
        }
        drop(ids);

        tracing::debug!(
            transaction_id = %stored.transaction_id,
            status = %stored.status_name(),
            "Transaction saved"
        );
        Ok(stored)
    }

    async fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .get(transaction_id)
            .map(|entry| entry.clone()))
    }

    async fn find_by_merchant_id(&self, merchant_id: &str) -> Result<Vec<Transaction>> {
        let transactions = match self.merchant_index.get(merchant_id) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.transactions.get(id).map(|entry| entry.clone()))
                .collect(),
            None => Vec::new(),
        };
        Ok(transactions)
    }

    async fn delete(&self, transaction_id: &str) -> Result<()> {
        if let Some((_, transaction)) = self.transactions.remove(transaction_id) {
            if let Some(mut ids) = self.merchant_index.get_mut(&transaction.merchant_id) {
                ids.retain(|id| id != transaction_id);
            }
            tracing::debug!(transaction_id = %transaction_id, "Transaction deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Transaction {} not found",
                transaction_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrichmentStatus;
    use rust_decimal_macros::dec;

    fn sample_transaction(transaction_id: &str, merchant_id: &str) -> Transaction {
        Transaction::new(
            transaction_id.to_string(),
            merchant_id.to_string(),
            "Sample Store".to_string(),
            dec!(25.00),
            "USD".to_string(),
        )
    }

    #[tokio::test]
    async fn test_save_returns_stored_copy() {
        let store = InMemoryStore::new();
        let txn = sample_transaction("txn-1", "merch-1");

        let saved = store.save(&txn).await.unwrap();
        assert_eq!(saved.transaction_id, "txn-1");
        assert_eq!(saved.enrichment_status, Some(EnrichmentStatus::Pending));

        let found = store.find_by_id("txn-1").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().merchant_id, "merch-1");
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let store = InMemoryStore::new();
        assert!(store.find_by_id("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_merchant_id() {
        let store = InMemoryStore::new();

        store
            .save(&sample_transaction("txn-1", "merch-1"))
            .await
            .unwrap();
        store
            .save(&sample_transaction("txn-2", "merch-1"))
            .await
            .unwrap();
        store
            .save(&sample_transaction("txn-3", "merch-2"))
            .await
            .unwrap();

        let for_merchant = store.find_by_merchant_id("merch-1").await.unwrap();
        assert_eq!(for_merchant.len(), 2);
        assert!(for_merchant.iter().all(|t| t.merchant_id == "merch-1"));

        let none = store.find_by_merchant_id("merch-9").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_resave_does_not_duplicate_index() {
        let store = InMemoryStore::new();
        let mut txn = sample_transaction("txn-1", "merch-1");

        store.save(&txn).await.unwrap();
        txn.enrichment_status = Some(EnrichmentStatus::Completed);
        store.save(&txn).await.unwrap();

        let for_merchant = store.find_by_merchant_id("merch-1").await.unwrap();
        assert_eq!(for_merchant.len(), 1);
        assert_eq!(
            for_merchant[0].enrichment_status,
            Some(EnrichmentStatus::Completed)
        );
    }

    #[tokio::test]
    async fn test_delete_removes_transaction_and_index_entry() {
        let store = InMemoryStore::new();
        store
            .save(&sample_transaction("txn-1", "merch-1"))
            .await
            .unwrap();

        store.delete("txn-1").await.unwrap();
        assert!(store.find_by_id("txn-1").await.unwrap().is_none());
        assert!(store
            .find_by_merchant_id("merch-1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.delete("absent").await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_timestamps() {
        let store = InMemoryStore::new();
        let mut txn = sample_transaction("txn-1", "merch-1");
        txn.enriched_at = Some(chrono::Utc::now());

        store.save(&txn).await.unwrap();
        let found = store.find_by_id("txn-1").await.unwrap().unwrap();

        assert_eq!(found.timestamp, txn.timestamp);
        assert_eq!(found.enriched_at, txn.enriched_at);
    }
}

pub mod cache;
pub mod store;

pub use cache::*;
pub use store::*;

use crate::error::Result;
use crate::models::Transaction;
use async_trait::async_trait;

/// Trait for transaction persistence operations. Implementations must be
/// safe to share across tasks; the in-memory store is the reference
/// implementation and datastore adapters plug in behind this trait.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a transaction, returning the stored representation
    async fn save(&self, transaction: &Transaction) -> Result<Transaction>;

    /// Fetch a transaction by identifier
    async fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Fetch every transaction recorded for a merchant
    async fn find_by_merchant_id(&self, merchant_id: &str) -> Result<Vec<Transaction>>;

    /// Delete a transaction, erroring when it does not exist
    async fn delete(&self, transaction_id: &str) -> Result<()>;
}

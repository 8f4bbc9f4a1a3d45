//! Driving port for reading a user's transactions.

use async_trait::async_trait;

use crate::domain::{Error, Transaction, UserId};

#[async_trait]
pub trait TransactionQuery: Send + Sync {
    /// Transactions where `user_id` is a party; only that user may read them.
    async fn list_for_user(
        &self,
        actor: &UserId,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, Error>;
}

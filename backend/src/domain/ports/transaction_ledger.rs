//! Port abstraction for the transaction ledger.
//!
//! The ledger owns two units of work. Opening checks the listing, the
//! seller and the buyer's earlier requests and records the new request.
//! Settling writes the transaction status, the seller's reputation and the
//! listing's availability. Each is applied all or nothing.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ListingId, OpenTransactionError, Settlement, SettlementError, Transaction, TransactionId,
    TransactionStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by transaction ledger adapters.
    pub enum TransactionLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "transaction ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "transaction ledger query failed: {message}",
        /// No transaction with the identifier exists.
        UnknownTransaction { transaction_id: TransactionId } =>
            "transaction {transaction_id} does not exist",
        /// The listing named by a new request does not exist.
        UnknownListing { listing_id: ListingId } => "listing {listing_id} does not exist",
        /// A user named by a new request does not exist.
        UnknownUser { user_id: UserId } => "user {user_id} does not exist",
        /// The domain refused to open the request.
        NotAdmitted { reason: OpenTransactionError } => "purchase request refused: {reason}",
        /// The domain refused to settle the transaction.
        Refused { reason: SettlementError } => "settlement refused: {reason}",
        /// Stored records referenced by the transaction are missing.
        Inconsistent { message: String } => "transaction ledger is inconsistent: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Admit and record a new pending transaction as one unit of work.
    ///
    /// Fails with `NotAdmitted` when the listing is sold, the seller does
    /// not own it or is banned, or the buyer already has a pending request
    /// for it.
    async fn open(&self, transaction: &Transaction) -> Result<(), TransactionLedgerError>;

    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, TransactionLedgerError>;

    /// Transactions where `user` is buyer or seller, newest first.
    async fn list_for_user(&self, user: &UserId)
    -> Result<Vec<Transaction>, TransactionLedgerError>;

    /// Settle a transaction into `target` as one unit of work.
    async fn settle(
        &self,
        id: &TransactionId,
        target: TransactionStatus,
        at: DateTime<Utc>,
    ) -> Result<Settlement, TransactionLedgerError>;
}

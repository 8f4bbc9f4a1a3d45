//! Driving port for purchase requests.

use async_trait::async_trait;

use crate::domain::{
    Error, ListingId, RequestNote, Transaction, TransactionId, TransactionStatus, UserId,
};

/// A buyer asking a seller for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransactionRequest {
    pub listing_id: ListingId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    /// Optional message and contact number for the seller.
    pub note: RequestNote,
}

/// A party to a transaction settling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub actor: UserId,
    pub transaction_id: TransactionId,
    pub target: TransactionStatus,
}

#[async_trait]
pub trait TransactionCommand: Send + Sync {
    /// Open a pending request against an available listing.
    async fn create(&self, request: CreateTransactionRequest) -> Result<Transaction, Error>;

    /// Settle a pending request, applying reputation effects.
    ///
    /// The seller completes or rejects; the buyer may only cancel.
    async fn transition(&self, request: TransitionRequest) -> Result<Transaction, Error>;
}

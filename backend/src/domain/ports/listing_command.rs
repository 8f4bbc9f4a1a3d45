//! Driving port for listing mutations.

use async_trait::async_trait;

use crate::domain::{
    Error, ListingChanges, ListingDetailsInput, ListingId, MarketplaceListing, UserId,
};

/// A seller publishing a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingRequest {
    pub seller_id: UserId,
    pub details: ListingDetailsInput,
    pub price: u32,
}

/// A seller editing one of their listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateListingRequest {
    pub actor: UserId,
    pub listing_id: ListingId,
    pub changes: ListingChanges,
}

#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Publish a listing; banned sellers are refused.
    async fn create(&self, request: CreateListingRequest) -> Result<MarketplaceListing, Error>;

    /// Revise an unsold listing owned by the actor.
    async fn update(&self, request: UpdateListingRequest) -> Result<MarketplaceListing, Error>;

    /// Withdraw an unsold listing with no pending requests.
    async fn withdraw(&self, actor: &UserId, listing_id: &ListingId) -> Result<(), Error>;
}

//! Port abstraction for listing persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Listing, ListingId, ListingUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
        /// No listing with the identifier exists.
        UnknownListing { listing_id: ListingId } => "listing {listing_id} does not exist",
        /// The listing has been sold and is frozen.
        AlreadySold { listing_id: ListingId } => "listing {listing_id} is already sold",
        /// Buyers are still waiting on the listing.
        HasPendingRequests { listing_id: ListingId } =>
            "listing {listing_id} has pending purchase requests",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Store a newly published listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// Every listing still available, in no particular order.
    async fn list_available(&self) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Every listing owned by `seller`, sold or not.
    async fn list_by_seller(&self, seller: &UserId)
    -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Apply a seller's edits atomically, refusing sold listings.
    async fn revise(
        &self,
        id: &ListingId,
        update: &ListingUpdate,
        at: DateTime<Utc>,
    ) -> Result<Listing, ListingPersistenceError>;

    /// Remove an unsold listing without pending purchase requests.
    async fn remove(&self, id: &ListingId) -> Result<(), ListingPersistenceError>;
}

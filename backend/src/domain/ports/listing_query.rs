//! Driving port for listing reads.

use async_trait::async_trait;

use crate::domain::{Error, Listing, ListingId, MarketplaceListing, UserId};

#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// The marketplace view: available listings from sellers in good
    /// standing, newest first, optionally hiding `exclude`'s own listings.
    async fn marketplace(
        &self,
        exclude: Option<UserId>,
    ) -> Result<Vec<MarketplaceListing>, Error>;

    /// A single listing with its seller, sold or not.
    async fn get(&self, listing_id: &ListingId) -> Result<MarketplaceListing, Error>;

    /// Every listing of a seller, newest first.
    async fn by_seller(&self, seller_id: &UserId) -> Result<Vec<Listing>, Error>;
}

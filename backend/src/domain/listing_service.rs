//! Listing services: publishing, editing and the marketplace view.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::accounts_service::map_user_error;
use crate::domain::ports::{
    CreateListingRequest, ListingCommand, ListingPersistenceError, ListingQuery,
    ListingRepository, UpdateListingRequest, UserRepository,
};
use crate::domain::{
    Error, Listing, ListingDetails, ListingId, ListingPolicy, ListingUpdate,
    ListingValidationError, MarketplaceListing, User, UserId, marketplace_view, newest_first,
};

/// Listing service implementing the listing command and query ports.
#[derive(Clone)]
pub struct ListingService<L, U> {
    listings: Arc<L>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: ListingPolicy,
}

impl<L, U> ListingService<L, U> {
    pub fn new(
        listings: Arc<L>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        policy: ListingPolicy,
    ) -> Self {
        Self {
            listings,
            users,
            clock,
            policy,
        }
    }
}

pub(crate) fn map_listing_error(error: ListingPersistenceError) -> Error {
    match error {
        ListingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingPersistenceError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
        ListingPersistenceError::UnknownListing { .. } => Error::not_found("listing not found"),
        ListingPersistenceError::AlreadySold { .. } => {
            Error::conflict("listing has already been sold")
        }
        ListingPersistenceError::HasPendingRequests { .. } => {
            Error::conflict("listing has pending purchase requests")
        }
    }
}

fn map_validation_error(error: &ListingValidationError) -> Error {
    match error.field() {
        Some(field) => Error::invalid_field(field, error.to_string()),
        None => Error::invalid_request(error.to_string()),
    }
}

impl<L, U> ListingService<L, U>
where
    L: ListingRepository,
    U: UserRepository,
{
    async fn find_listing(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found("listing not found"))
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    async fn with_seller(&self, listing: Listing) -> Result<MarketplaceListing, Error> {
        let seller = self
            .find_user(listing.seller_id())
            .await?
            .ok_or_else(|| Error::internal("listing references a missing seller"))?;
        Ok(MarketplaceListing::new(listing, &seller))
    }

    async fn owned_listing(&self, actor: &UserId, id: &ListingId) -> Result<Listing, Error> {
        let listing = self.find_listing(id).await?;
        if listing.seller_id() != actor {
            return Err(Error::forbidden("only the seller may change this listing"));
        }
        Ok(listing)
    }
}

#[async_trait]
impl<L, U> ListingCommand for ListingService<L, U>
where
    L: ListingRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateListingRequest) -> Result<MarketplaceListing, Error> {
        let CreateListingRequest {
            seller_id,
            details,
            price,
        } = request;
        let seller = self
            .find_user(&seller_id)
            .await?
            .ok_or_else(|| Error::not_found("seller not found"))?;
        if seller.is_banned() {
            return Err(Error::forbidden("banned sellers cannot create listings"));
        }
        let details = ListingDetails::try_new(&details).map_err(|err| map_validation_error(&err))?;
        let price = self
            .policy
            .price(price)
            .map_err(|err| map_validation_error(&err))?;

        let listing = Listing::publish(
            ListingId::random(),
            seller_id,
            details,
            price,
            self.clock.utc(),
        );
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing.id(), seller_id = %seller_id, price = price.amount(), "listing published");
        Ok(MarketplaceListing::new(listing, &seller))
    }

    async fn update(&self, request: UpdateListingRequest) -> Result<MarketplaceListing, Error> {
        let UpdateListingRequest {
            actor,
            listing_id,
            changes,
        } = request;
        self.owned_listing(&actor, &listing_id).await?;
        let update = ListingUpdate::try_from_changes(&changes, &self.policy)
            .map_err(|err| map_validation_error(&err))?;
        let listing = self
            .listings
            .revise(&listing_id, &update, self.clock.utc())
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing_id, "listing revised");
        self.with_seller(listing).await
    }

    async fn withdraw(&self, actor: &UserId, listing_id: &ListingId) -> Result<(), Error> {
        self.owned_listing(actor, listing_id).await?;
        self.listings
            .remove(listing_id)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing_id, "listing withdrawn");
        Ok(())
    }
}

#[async_trait]
impl<L, U> ListingQuery for ListingService<L, U>
where
    L: ListingRepository,
    U: UserRepository,
{
    async fn marketplace(
        &self,
        exclude: Option<UserId>,
    ) -> Result<Vec<MarketplaceListing>, Error> {
        let listings = self
            .listings
            .list_available()
            .await
            .map_err(map_listing_error)?;
        let seller_ids: Vec<UserId> = listings
            .iter()
            .map(|listing| *listing.seller_id())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sellers: HashMap<UserId, User> = self
            .users
            .find_by_ids(&seller_ids)
            .await
            .map_err(map_user_error)?
            .into_iter()
            .map(|user| (*user.id(), user))
            .collect();
        Ok(marketplace_view(listings, &sellers, exclude.as_ref()))
    }

    async fn get(&self, listing_id: &ListingId) -> Result<MarketplaceListing, Error> {
        let listing = self.find_listing(listing_id).await?;
        self.with_seller(listing).await
    }

    async fn by_seller(&self, seller_id: &UserId) -> Result<Vec<Listing>, Error> {
        if self.find_user(seller_id).await?.is_none() {
            return Err(Error::not_found("seller not found"));
        }
        let mut listings = self
            .listings
            .list_by_seller(seller_id)
            .await
            .map_err(map_listing_error)?;
        newest_first(&mut listings, Listing::created_at);
        Ok(listings)
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;

//! In-memory marketplace store.
//!
//! All tables live behind a single `RwLock`. Each port call takes the lock
//! once, so opening a purchase request (admission checks and insert) and a
//! settlement (transaction status, seller reputation, listing availability)
//! are each atomic with respect to other requests. Nothing survives a
//! restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    HelpRequestPersistenceError, HelpRequestRepository, ListingPersistenceError,
    ListingRepository, TransactionLedger, TransactionLedgerError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, HelpRequest, Listing, ListingId, ListingStateError, ListingUpdate,
    ProfileUpdate, Settlement, SettlementParts, Transaction, TransactionId, TransactionStatus,
    User, UserId, newest_first, settle,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    listings: HashMap<ListingId, Listing>,
    transactions: HashMap<TransactionId, Transaction>,
    help_requests: Vec<HelpRequest>,
}

/// Raised when a writer panicked while holding the lock.
struct LockPoisoned;

const POISONED: &str = "marketplace store lock poisoned";

impl From<LockPoisoned> for UserPersistenceError {
    fn from(_: LockPoisoned) -> Self {
        Self::query(POISONED)
    }
}

impl From<LockPoisoned> for ListingPersistenceError {
    fn from(_: LockPoisoned) -> Self {
        Self::query(POISONED)
    }
}

impl From<LockPoisoned> for TransactionLedgerError {
    fn from(_: LockPoisoned) -> Self {
        Self::query(POISONED)
    }
}

impl From<LockPoisoned> for HelpRequestPersistenceError {
    fn from(_: LockPoisoned) -> Self {
        Self::query(POISONED)
    }
}

/// Process-local store implementing every persistence port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use bookshare::outbound::memory::InMemoryMarketplace;
///
/// let store = Arc::new(InMemoryMarketplace::new());
/// let _users: Arc<InMemoryMarketplace> = Arc::clone(&store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    tables: RwLock<Tables>,
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, LockPoisoned> {
        self.tables.read().map_err(|_| LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, LockPoisoned> {
        self.tables.write().map_err(|_| LockPoisoned)
    }
}

#[async_trait]
impl UserRepository for InMemoryMarketplace {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.write()?;
        let Some(current) = tables.users.get(id).cloned() else {
            return Ok(None);
        };
        let updated = current.with_profile_update(update.clone());
        tables.users.insert(*id, updated.clone());
        Ok(Some(updated))
    }
}

#[async_trait]
impl ListingRepository for InMemoryMarketplace {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        self.write()?.listings.insert(*listing.id(), listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        Ok(self.read()?.listings.get(id).cloned())
    }

    async fn list_available(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
        Ok(self
            .read()?
            .listings
            .values()
            .filter(|listing| listing.is_available())
            .cloned()
            .collect())
    }

    async fn list_by_seller(
        &self,
        seller: &UserId,
    ) -> Result<Vec<Listing>, ListingPersistenceError> {
        Ok(self
            .read()?
            .listings
            .values()
            .filter(|listing| listing.seller_id() == seller)
            .cloned()
            .collect())
    }

    async fn revise(
        &self,
        id: &ListingId,
        update: &ListingUpdate,
        at: DateTime<Utc>,
    ) -> Result<Listing, ListingPersistenceError> {
        let mut tables = self.write()?;
        let current = tables
            .listings
            .get(id)
            .cloned()
            .ok_or_else(|| ListingPersistenceError::unknown_listing(*id))?;
        let revised = current
            .revise(update.clone(), at)
            .map_err(|ListingStateError::AlreadySold { listing_id }| {
                ListingPersistenceError::already_sold(listing_id)
            })?;
        tables.listings.insert(*id, revised.clone());
        Ok(revised)
    }

    async fn remove(&self, id: &ListingId) -> Result<(), ListingPersistenceError> {
        let mut tables = self.write()?;
        let listing = tables
            .listings
            .get(id)
            .ok_or_else(|| ListingPersistenceError::unknown_listing(*id))?;
        if !listing.is_available() {
            return Err(ListingPersistenceError::already_sold(*id));
        }
        let pending = tables.transactions.values().any(|tx| {
            tx.listing_id() == id && tx.status() == TransactionStatus::Pending
        });
        if pending {
            return Err(ListingPersistenceError::has_pending_requests(*id));
        }
        tables.listings.remove(id);
        Ok(())
    }
}

#[async_trait]
impl TransactionLedger for InMemoryMarketplace {
    async fn open(&self, transaction: &Transaction) -> Result<(), TransactionLedgerError> {
        let mut tables = self.write()?;
        let listing = tables
            .listings
            .get(transaction.listing_id())
            .ok_or_else(|| TransactionLedgerError::unknown_listing(*transaction.listing_id()))?;
        if !tables.users.contains_key(transaction.buyer_id()) {
            return Err(TransactionLedgerError::unknown_user(*transaction.buyer_id()));
        }
        let owner = listing.seller_id();
        let seller = tables
            .users
            .get(owner)
            .ok_or_else(|| TransactionLedgerError::unknown_user(*owner))?;
        transaction
            .admit(listing, seller, tables.transactions.values())
            .map_err(TransactionLedgerError::not_admitted)?;

        tables
            .transactions
            .insert(*transaction.id(), transaction.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, TransactionLedgerError> {
        Ok(self.read()?.transactions.get(id).cloned())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Transaction>, TransactionLedgerError> {
        let mut found: Vec<Transaction> = self
            .read()?
            .transactions
            .values()
            .filter(|tx| tx.involves(user))
            .cloned()
            .collect();
        newest_first(&mut found, Transaction::created_at);
        Ok(found)
    }

    async fn settle(
        &self,
        id: &TransactionId,
        target: TransactionStatus,
        at: DateTime<Utc>,
    ) -> Result<Settlement, TransactionLedgerError> {
        let mut tables = self.write()?;
        let transaction = tables
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| TransactionLedgerError::unknown_transaction(*id))?;
        let seller = tables
            .users
            .get(transaction.seller_id())
            .cloned()
            .ok_or_else(|| {
                TransactionLedgerError::inconsistent(format!(
                    "seller {} of transaction {id} is missing",
                    transaction.seller_id()
                ))
            })?;
        let listing = tables
            .listings
            .get(transaction.listing_id())
            .cloned()
            .ok_or_else(|| {
                TransactionLedgerError::inconsistent(format!(
                    "listing {} of transaction {id} is missing",
                    transaction.listing_id()
                ))
            })?;

        let settlement = settle(
            SettlementParts {
                transaction,
                seller,
                listing,
            },
            target,
            at,
        )
        .map_err(TransactionLedgerError::refused)?;

        // All reads and checks are done; the writes below cannot fail.
        tables
            .transactions
            .insert(*id, settlement.transaction.clone());
        tables
            .users
            .insert(*settlement.seller.id(), settlement.seller.clone());
        tables
            .listings
            .insert(*settlement.listing.id(), settlement.listing.clone());
        Ok(settlement)
    }
}

#[async_trait]
impl HelpRequestRepository for InMemoryMarketplace {
    async fn insert(&self, request: &HelpRequest) -> Result<(), HelpRequestPersistenceError> {
        self.write()?.help_requests.push(request.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<HelpRequest>, HelpRequestPersistenceError> {
        let mut found: Vec<HelpRequest> = self
            .read()?
            .help_requests
            .iter()
            .filter(|request| request.user_id() == user)
            .cloned()
            .collect();
        newest_first(&mut found, HelpRequest::created_at);
        Ok(found)
    }
}

#[cfg(test)]
mod tests;

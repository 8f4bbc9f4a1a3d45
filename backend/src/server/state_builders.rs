//! Builders wiring domain services over the in-memory store into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use bookshare::domain::{
    AccountService, HelpDeskService, ListingPolicy, ListingService, TransactionService,
};
use bookshare::inbound::http::state::{HttpState, HttpStatePorts};
use bookshare::outbound::hashing::Argon2Hasher;
use bookshare::outbound::memory::InMemoryMarketplace;

/// Build HTTP state backed by one shared in-memory marketplace.
///
/// Every service reads and writes the same store, so a settlement seen by
/// the transaction service is immediately visible to listing queries.
pub(crate) fn build_http_state(policy: ListingPolicy) -> HttpState {
    let store = Arc::new(InMemoryMarketplace::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = Arc::new(AccountService::new(
        store.clone(),
        Arc::new(Argon2Hasher::new()),
        clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(
        store.clone(),
        store.clone(),
        clock.clone(),
        policy,
    ));
    let transactions = Arc::new(TransactionService::new(store.clone(), clock.clone()));
    let help_desk = Arc::new(HelpDeskService::new(store, clock));

    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registration: accounts.clone(),
        profiles: accounts.clone(),
        profile_updates: accounts,
        listings: listings.clone(),
        listings_query: listings,
        transactions: transactions.clone(),
        transactions_query: transactions,
        help_desk: help_desk.clone(),
        help_desk_query: help_desk,
    })
}

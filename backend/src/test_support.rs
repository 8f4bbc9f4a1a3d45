//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and the integration suites in `tests/`.
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccountService, ContactDetails, EmailAddress, HelpDeskService, Listing, ListingDetails,
    ListingDetailsInput, ListingId, ListingPolicy, ListingService, MobileNumber, NewUser,
    PasswordHash, RegionName, Transaction, TransactionId, TransactionService, User, UserId,
    UserName,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::hashing::Argon2Hasher;
use crate::outbound::memory::InMemoryMarketplace;

/// Clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// 10:00 UTC on the given day of February 2026.
pub fn at_day(day: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 2, day, 10, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("day {day} is outside February 2026"),
    }
}

/// Registered user with fixed contact details and a throwaway hash.
pub fn sample_user(name: &str, email: &str) -> User {
    let details = NewUser {
        name: UserName::new(name).expect("fixture name"),
        email: EmailAddress::new(email).expect("fixture email"),
        contact: ContactDetails {
            mobile: MobileNumber::new("+91 98765 43210").expect("fixture mobile"),
            state: RegionName::new("state", "Kerala").expect("fixture state"),
            district: RegionName::new("district", "Ernakulam").expect("fixture district"),
        },
    };
    User::register(
        UserId::random(),
        details,
        PasswordHash::new("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$ZGlnZXN0"),
        at_day(1),
    )
}

/// Form input for an available paperback with every required field set.
pub fn sample_listing_input(title: &str) -> ListingDetailsInput {
    ListingDetailsInput {
        title: title.to_owned(),
        author: "Rabindranath Tagore".to_owned(),
        category: "Poetry".to_owned(),
        language: "Bengali".to_owned(),
        condition: Some("good".to_owned()),
        ..ListingDetailsInput::default()
    }
}

/// Available listing priced below the default ceiling.
pub fn sample_listing(seller: &UserId, title: &str, created_at: DateTime<Utc>) -> Listing {
    let details = ListingDetails::try_new(&sample_listing_input(title)).expect("fixture details");
    let price = ListingPolicy::default().price(120).expect("fixture price");
    Listing::publish(ListingId::random(), *seller, details, price, created_at)
}

/// Pending purchase request for `listing` from `buyer`.
pub fn sample_transaction(listing: &Listing, buyer: &UserId, at: DateTime<Utc>) -> Transaction {
    Transaction::open(
        TransactionId::random(),
        *listing.id(),
        *buyer,
        *listing.seller_id(),
        at,
    )
    .expect("buyer differs from seller")
}

/// Fully wired HTTP state over a fresh in-memory store.
pub struct MarketplaceHarness {
    pub store: Arc<InMemoryMarketplace>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

/// Build services and HTTP state the way the server does, with a fast hasher.
pub fn marketplace_harness(now: DateTime<Utc>) -> MarketplaceHarness {
    let store = Arc::new(InMemoryMarketplace::new());
    let clock = Arc::new(MutableClock::new(now));
    let shared_clock: Arc<dyn Clock> = clock.clone();

    let accounts = Arc::new(AccountService::new(
        store.clone(),
        Arc::new(Argon2Hasher::with_cost(8, 1, 1).expect("minimal argon2 cost")),
        shared_clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(
        store.clone(),
        store.clone(),
        shared_clock.clone(),
        ListingPolicy::default(),
    ));
    let transactions = Arc::new(TransactionService::new(store.clone(), shared_clock.clone()));
    let help_desk = Arc::new(HelpDeskService::new(store.clone(), shared_clock));

    let state = HttpState::new(HttpStatePorts {
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
    });

    MarketplaceHarness {
        store,
        clock,
        state,
    }
}

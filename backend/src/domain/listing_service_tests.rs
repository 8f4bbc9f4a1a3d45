//! Tests for the listing service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockListingRepository, MockUserRepository};
use crate::domain::{BAN_THRESHOLD, ErrorCode, ListingChanges, ListingDetailsInput, Reputation};
use crate::test_support::{MutableClock, at_day, sample_listing, sample_user};
use rstest::rstest;

type Service = ListingService<MockListingRepository, MockUserRepository>;

fn make_service(listings: MockListingRepository, users: MockUserRepository) -> Service {
    ListingService::new(
        Arc::new(listings),
        Arc::new(users),
        Arc::new(MutableClock::new(at_day(7))),
        ListingPolicy::default(),
    )
}

fn details() -> ListingDetailsInput {
    ListingDetailsInput {
        title: "Train to Pakistan".to_owned(),
        author: "Khushwant Singh".to_owned(),
        category: "Fiction".to_owned(),
        language: "English".to_owned(),
        ..ListingDetailsInput::default()
    }
}

fn users_returning(user: Option<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(move |_| Ok(user));
    users
}

fn banned(user: User) -> User {
    user.with_reputation(
        Reputation::from_parts(0, BAN_THRESHOLD, Some(at_day(1))).expect("banned"),
    )
}

#[rstest]
#[tokio::test]
async fn create_publishes_available_listing() {
    let seller = sample_user("Mira", "mira@example.org");
    let seller_id = *seller.id();
    let mut listings = MockListingRepository::new();
    listings
        .expect_insert()
        .withf(move |listing| listing.is_available() && listing.seller_id() == &seller_id)
        .times(1)
        .return_once(|_| Ok(()));

    let created = make_service(listings, users_returning(Some(seller)))
        .create(CreateListingRequest {
            seller_id,
            details: details(),
            price: 0,
        })
        .await
        .expect("created");
    assert_eq!(created.listing.created_at(), at_day(7));
    assert_eq!(created.seller.id, seller_id);
}

#[rstest]
#[tokio::test]
async fn banned_seller_cannot_create() {
    let seller = banned(sample_user("Mira", "mira@example.org"));
    let seller_id = *seller.id();
    let mut listings = MockListingRepository::new();
    listings.expect_insert().never();

    let err = make_service(listings, users_returning(Some(seller)))
        .create(CreateListingRequest {
            seller_id,
            details: details(),
            price: 10,
        })
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn create_rejects_price_at_ceiling() {
    let seller = sample_user("Mira", "mira@example.org");
    let seller_id = *seller.id();

    let err = make_service(MockListingRepository::new(), users_returning(Some(seller)))
        .create(CreateListingRequest {
            seller_id,
            details: details(),
            price: 400,
        })
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("field")),
        Some(&serde_json::json!("price"))
    );
}

#[rstest]
#[tokio::test]
async fn update_is_owner_only() {
    let seller = sample_user("Mira", "mira@example.org");
    let listing = sample_listing(seller.id(), "Gitanjali", at_day(1));
    let listing_id = *listing.id();
    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    listings.expect_revise().never();

    let err = make_service(listings, MockUserRepository::new())
        .update(UpdateListingRequest {
            actor: UserId::random(),
            listing_id,
            changes: ListingChanges {
                price: Some(5),
                ..ListingChanges::default()
            },
        })
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_of_sold_listing_conflicts() {
    let seller = sample_user("Mira", "mira@example.org");
    let seller_id = *seller.id();
    let listing = sample_listing(&seller_id, "Gitanjali", at_day(1));
    let listing_id = *listing.id();
    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    listings
        .expect_revise()
        .return_once(move |_, _, _| Err(ListingPersistenceError::already_sold(listing_id)));

    let err = make_service(listings, MockUserRepository::new())
        .update(UpdateListingRequest {
            actor: seller_id,
            listing_id,
            changes: ListingChanges {
                title: Some("New title".to_owned()),
                ..ListingChanges::default()
            },
        })
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn withdraw_with_pending_requests_conflicts() {
    let seller = sample_user("Mira", "mira@example.org");
    let seller_id = *seller.id();
    let listing = sample_listing(&seller_id, "Gitanjali", at_day(1));
    let listing_id = *listing.id();
    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    listings
        .expect_remove()
        .return_once(move |_| Err(ListingPersistenceError::has_pending_requests(listing_id)));

    let err = make_service(listings, MockUserRepository::new())
        .withdraw(&seller_id, &listing_id)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn marketplace_hides_banned_and_excluded_sellers() {
    let good = sample_user("Mira", "mira@example.org");
    let viewer = sample_user("Kabir", "kabir@example.org");
    let bad = banned(sample_user("Dev", "dev@example.org"));
    let available = vec![
        sample_listing(good.id(), "Visible", at_day(2)),
        sample_listing(viewer.id(), "Own", at_day(3)),
        sample_listing(bad.id(), "Hidden", at_day(4)),
    ];
    let viewer_id = *viewer.id();
    let mut listings = MockListingRepository::new();
    listings
        .expect_list_available()
        .return_once(move || Ok(available));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_ids()
        .withf(|ids| ids.len() == 3)
        .return_once(move |_| Ok(vec![good, viewer, bad]));

    let view = make_service(listings, users)
        .marketplace(Some(viewer_id))
        .await
        .expect("view");
    let titles: Vec<&str> = view
        .iter()
        .map(|entry| entry.listing.details().title())
        .collect();
    assert_eq!(titles, vec!["Visible"]);
}

#[rstest]
#[tokio::test]
async fn by_seller_requires_known_seller() {
    let err = make_service(MockListingRepository::new(), users_returning(None))
        .by_seller(&UserId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn get_maps_connection_failures() {
    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .return_once(|_| Err(ListingPersistenceError::connection("refused")));

    let err = make_service(listings, MockUserRepository::new())
        .get(&ListingId::random())
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

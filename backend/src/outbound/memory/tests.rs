//! Tests for the in-memory marketplace store.

use std::sync::Arc;

use super::*;
use crate::domain::{
    BAN_THRESHOLD, HelpRequestDraft, HelpRequestId, IssueType, ListingChanges, ListingPolicy,
    OpenTransactionError, Reputation, SettlementError, TransitionError, UserName,
};
use crate::test_support::{at_day, sample_listing, sample_transaction, sample_user};
use futures_util::future::join_all;
use rstest::{fixture, rstest};

struct Seeded {
    store: InMemoryMarketplace,
    seller: User,
    buyer: User,
    rival: User,
    listing: Listing,
}

#[fixture]
fn seeded() -> Seeded {
    let store = InMemoryMarketplace::new();
    let seller = sample_user("Mira", "mira@example.org");
    let buyer = sample_user("Kabir", "kabir@example.org");
    let rival = sample_user("Zoya", "zoya@example.org");
    let listing = sample_listing(seller.id(), "Gitanjali", at_day(1));
    {
        let mut tables = store.tables.write().expect("lock");
        for user in [&seller, &buyer, &rival] {
            tables.users.insert(*user.id(), user.clone());
        }
        tables.listings.insert(*listing.id(), listing.clone());
    }
    Seeded {
        store,
        seller,
        buyer,
        rival,
        listing,
    }
}

async fn open_as(seeded: &Seeded, buyer: &User, day: u32) -> Transaction {
    let tx = sample_transaction(&seeded.listing, buyer.id(), at_day(day));
    TransactionLedger::open(&seeded.store, &tx)
        .await
        .expect("open");
    tx
}

async fn open(seeded: &Seeded, day: u32) -> Transaction {
    open_as(seeded, &seeded.buyer, day).await
}

fn stored_transactions(seeded: &Seeded) -> usize {
    seeded.store.tables.read().expect("lock").transactions.len()
}

#[rstest]
#[tokio::test]
async fn open_refuses_a_second_pending_request_from_the_same_buyer(seeded: Seeded) {
    let first = open(&seeded, 2).await;
    let again = sample_transaction(&seeded.listing, seeded.buyer.id(), at_day(3));
    let err = TransactionLedger::open(&seeded.store, &again)
        .await
        .expect_err("duplicate");
    assert_eq!(
        err,
        TransactionLedgerError::not_admitted(OpenTransactionError::AlreadyRequested {
            transaction_id: *first.id()
        })
    );
    assert_eq!(stored_transactions(&seeded), 1);

    open_as(&seeded, &seeded.rival, 3).await;
    assert_eq!(stored_transactions(&seeded), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_requests_admit_exactly_one(seeded: Seeded) {
    let Seeded {
        store,
        buyer,
        listing,
        ..
    } = seeded;
    let store = Arc::new(store);
    let attempts = (0..8).map(|_| {
        let store = Arc::clone(&store);
        let tx = sample_transaction(&listing, buyer.id(), at_day(2));
        tokio::spawn(async move { TransactionLedger::open(store.as_ref(), &tx).await })
    });
    let outcomes = join_all(attempts).await;

    let admitted = outcomes
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(admitted, 1);
    assert_eq!(store.tables.read().expect("lock").transactions.len(), 1);
}

#[rstest]
#[tokio::test]
async fn open_refuses_a_sold_listing(seeded: Seeded) {
    let tx = open(&seeded, 2).await;
    seeded
        .store
        .settle(tx.id(), TransactionStatus::Completed, at_day(3))
        .await
        .expect("sold");

    let late = sample_transaction(&seeded.listing, seeded.rival.id(), at_day(4));
    let err = TransactionLedger::open(&seeded.store, &late)
        .await
        .expect_err("sold");
    assert_eq!(
        err,
        TransactionLedgerError::not_admitted(OpenTransactionError::ListingUnavailable {
            listing_id: *seeded.listing.id()
        })
    );
}

#[rstest]
#[tokio::test]
async fn open_refuses_a_banned_seller(seeded: Seeded) {
    {
        let mut tables = seeded.store.tables.write().expect("lock");
        let banned = seeded.seller.clone().with_reputation(
            Reputation::from_parts(0, BAN_THRESHOLD, Some(at_day(1))).expect("banned"),
        );
        tables.users.insert(*banned.id(), banned);
    }
    let tx = sample_transaction(&seeded.listing, seeded.buyer.id(), at_day(2));
    assert_eq!(
        TransactionLedger::open(&seeded.store, &tx).await,
        Err(TransactionLedgerError::not_admitted(
            OpenTransactionError::SellerBanned
        ))
    );
}

#[rstest]
#[tokio::test]
async fn open_reports_missing_records(seeded: Seeded) {
    let stranger = sample_user("Arjun", "arjun@example.org");
    let tx = sample_transaction(&seeded.listing, stranger.id(), at_day(2));
    assert_eq!(
        TransactionLedger::open(&seeded.store, &tx).await,
        Err(TransactionLedgerError::unknown_user(*stranger.id()))
    );

    let elsewhere = sample_listing(seeded.seller.id(), "Godaan", at_day(1));
    let tx = sample_transaction(&elsewhere, seeded.buyer.id(), at_day(2));
    assert_eq!(
        TransactionLedger::open(&seeded.store, &tx).await,
        Err(TransactionLedgerError::unknown_listing(*elsewhere.id()))
    );
    assert_eq!(stored_transactions(&seeded), 0);
}

#[rstest]
#[tokio::test]
async fn cancelling_keeps_reputation_and_frees_the_buyer_to_ask_again(seeded: Seeded) {
    let tx = open(&seeded, 2).await;
    seeded
        .store
        .settle(tx.id(), TransactionStatus::Cancelled, at_day(3))
        .await
        .expect("cancelled");
    {
        let tables = seeded.store.tables.read().expect("lock");
        assert_eq!(
            tables.users[seeded.seller.id()].reputation(),
            seeded.seller.reputation()
        );
        assert!(tables.listings[seeded.listing.id()].is_available());
    }

    open(&seeded, 4).await;
    assert_eq!(stored_transactions(&seeded), 2);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(seeded: Seeded) {
    let twin = sample_user("Other Mira", "mira@example.org");
    let err = UserRepository::insert(&seeded.store, &twin)
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate_email("mira@example.org"));
}

#[rstest]
#[tokio::test]
async fn find_by_ids_skips_unknown(seeded: Seeded) {
    let found = seeded
        .store
        .find_by_ids(&[*seeded.seller.id(), UserId::random()])
        .await
        .expect("query");
    assert_eq!(found.len(), 1);
}

#[rstest]
#[tokio::test]
async fn profile_update_keeps_reputation(seeded: Seeded) {
    let update = ProfileUpdate {
        name: Some(UserName::new("Mira K").expect("name")),
        ..ProfileUpdate::default()
    };
    let updated = seeded
        .store
        .update_profile(seeded.seller.id(), &update)
        .await
        .expect("query")
        .expect("known user");
    assert_eq!(updated.name().as_ref(), "Mira K");
    assert_eq!(updated.reputation(), seeded.seller.reputation());
    assert!(
        seeded
            .store
            .update_profile(&UserId::random(), &update)
            .await
            .expect("query")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn completing_settles_all_records_together(seeded: Seeded) {
    let tx = open(&seeded, 2).await;
    let settlement = seeded
        .store
        .settle(tx.id(), TransactionStatus::Completed, at_day(3))
        .await
        .expect("settled");

    let tables = seeded.store.tables.read().expect("lock");
    assert_eq!(tables.transactions[tx.id()], settlement.transaction);
    assert_eq!(tables.users[seeded.seller.id()].reputation().stars(), 1);
    assert!(!tables.listings[seeded.listing.id()].is_available());
}

#[rstest]
#[tokio::test]
async fn refused_settlement_writes_nothing(seeded: Seeded) {
    let first = open(&seeded, 2).await;
    let second = open_as(&seeded, &seeded.rival, 3).await;
    seeded
        .store
        .settle(first.id(), TransactionStatus::Completed, at_day(4))
        .await
        .expect("first sale");

    let err = seeded
        .store
        .settle(second.id(), TransactionStatus::Completed, at_day(5))
        .await
        .expect_err("already sold");
    assert_eq!(
        err,
        TransactionLedgerError::refused(SettlementError::ListingAlreadySold {
            listing_id: *seeded.listing.id()
        })
    );

    let tables = seeded.store.tables.read().expect("lock");
    assert_eq!(tables.transactions[second.id()].status(), TransactionStatus::Pending);
    assert_eq!(tables.users[seeded.seller.id()].reputation().stars(), 1);
}

#[rstest]
#[tokio::test]
async fn settled_transaction_cannot_settle_again(seeded: Seeded) {
    let tx = open(&seeded, 2).await;
    seeded
        .store
        .settle(tx.id(), TransactionStatus::Rejected, at_day(3))
        .await
        .expect("rejected");
    let err = seeded
        .store
        .settle(tx.id(), TransactionStatus::Rejected, at_day(4))
        .await
        .expect_err("final");
    assert_eq!(
        err,
        TransactionLedgerError::refused(SettlementError::Transition(
            TransitionError::AlreadyFinal {
                current: TransactionStatus::Rejected
            }
        ))
    );
    let tables = seeded.store.tables.read().expect("lock");
    assert_eq!(tables.users[seeded.seller.id()].reputation().rejections(), 1);
}

#[rstest]
#[tokio::test]
async fn five_rejections_ban_the_seller(seeded: Seeded) {
    for day in 0..BAN_THRESHOLD {
        let tx = open(&seeded, 2 + day).await;
        seeded
            .store
            .settle(tx.id(), TransactionStatus::Rejected, at_day(10))
            .await
            .expect("rejected");
    }
    let seller = UserRepository::find_by_id(&seeded.store, seeded.seller.id())
        .await
        .expect("query")
        .expect("seller");
    assert_eq!(
        seller.reputation(),
        &Reputation::from_parts(0, BAN_THRESHOLD, Some(at_day(10))).expect("banned")
    );
}

#[rstest]
#[tokio::test]
async fn settling_unknown_transaction_fails(seeded: Seeded) {
    let id = TransactionId::random();
    let err = seeded
        .store
        .settle(&id, TransactionStatus::Completed, at_day(2))
        .await
        .expect_err("unknown");
    assert_eq!(err, TransactionLedgerError::unknown_transaction(id));
}

#[rstest]
#[tokio::test]
async fn remove_refuses_pending_and_sold_listings(seeded: Seeded) {
    let tx = open(&seeded, 2).await;
    let id = *seeded.listing.id();
    assert_eq!(
        seeded.store.remove(&id).await,
        Err(ListingPersistenceError::has_pending_requests(id))
    );
    seeded
        .store
        .settle(tx.id(), TransactionStatus::Completed, at_day(3))
        .await
        .expect("sold");
    assert_eq!(
        seeded.store.remove(&id).await,
        Err(ListingPersistenceError::already_sold(id))
    );
}

#[rstest]
#[tokio::test]
async fn remove_deletes_free_listing(seeded: Seeded) {
    let id = *seeded.listing.id();
    seeded.store.remove(&id).await.expect("removed");
    assert!(
        ListingRepository::find_by_id(&seeded.store, &id)
            .await
            .expect("query")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn revise_unknown_listing_fails(seeded: Seeded) {
    let update = ListingUpdate::try_from_changes(
        &ListingChanges {
            price: Some(1),
            ..ListingChanges::default()
        },
        &ListingPolicy::default(),
    )
    .expect("valid");
    let id = ListingId::random();
    assert_eq!(
        seeded.store.revise(&id, &update, at_day(2)).await,
        Err(ListingPersistenceError::unknown_listing(id))
    );
}

#[rstest]
#[tokio::test]
async fn help_requests_list_newest_first(seeded: Seeded) {
    let user = *seeded.buyer.id();
    for (day, subject) in [(1, "First"), (3, "Third"), (2, "Second")] {
        let draft = HelpRequestDraft::try_new(IssueType::Other, subject, "details").expect("draft");
        let request = HelpRequest::file(HelpRequestId::random(), user, draft, at_day(day));
        HelpRequestRepository::insert(&seeded.store, &request)
            .await
            .expect("insert");
    }
    let subjects: Vec<String> = HelpRequestRepository::list_for_user(&seeded.store, &user)
        .await
        .expect("list")
        .iter()
        .map(|request| request.subject().to_owned())
        .collect();
    assert_eq!(subjects, vec!["Third", "Second", "First"]);
}

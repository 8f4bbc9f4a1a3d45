//! Tests for the transaction service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockTransactionLedger;
use crate::domain::{
    ErrorCode, Listing, ListingId, RequestNote, Settlement, SettlementParts, TransactionStatus,
    User, settle,
};
use crate::test_support::{MutableClock, at_day, sample_listing, sample_transaction, sample_user};
use rstest::{fixture, rstest};

type Service = TransactionService<MockTransactionLedger>;

fn make_service(ledger: MockTransactionLedger) -> Service {
    TransactionService::new(Arc::new(ledger), Arc::new(MutableClock::new(at_day(9))))
}

struct Parties {
    seller: User,
    buyer: User,
    listing: Listing,
}

#[fixture]
fn parties() -> Parties {
    let seller = sample_user("Mira", "mira@example.org");
    let buyer = sample_user("Kabir", "kabir@example.org");
    let listing = sample_listing(seller.id(), "Gitanjali", at_day(1));
    Parties {
        seller,
        buyer,
        listing,
    }
}

fn request(parties: &Parties) -> CreateTransactionRequest {
    CreateTransactionRequest {
        listing_id: *parties.listing.id(),
        buyer_id: *parties.buyer.id(),
        seller_id: *parties.seller.id(),
        note: RequestNote::default(),
    }
}

fn ledger_failing_open(error: TransactionLedgerError) -> MockTransactionLedger {
    let mut ledger = MockTransactionLedger::new();
    ledger.expect_open().times(1).return_once(move |_| Err(error));
    ledger
}

#[rstest]
#[tokio::test]
async fn create_opens_pending_transaction(parties: Parties) {
    let request = request(&parties);
    let mut ledger = MockTransactionLedger::new();
    ledger
        .expect_open()
        .withf(|tx| tx.status() == TransactionStatus::Pending)
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(ledger);

    let tx = service.create(request).await.expect("opened");
    assert_eq!(tx.status(), TransactionStatus::Pending);
    assert_eq!(tx.created_at(), at_day(9));
}

#[rstest]
#[tokio::test]
async fn create_records_the_buyers_note(parties: Parties) {
    let note = RequestNote::try_new(Some("Can collect on Sunday"), Some("+91 90000 11111"))
        .expect("valid note");
    let request = CreateTransactionRequest {
        note,
        ..request(&parties)
    };
    let mut ledger = MockTransactionLedger::new();
    ledger
        .expect_open()
        .withf(|tx| tx.note().message() == Some("Can collect on Sunday"))
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(ledger);

    let tx = service.create(request).await.expect("opened");
    assert_eq!(tx.note().contact_phone(), Some("+91 90000 11111"));
}

#[rstest]
#[case::sold(
    OpenTransactionError::ListingUnavailable { listing_id: ListingId::random() },
    ErrorCode::NotFound
)]
#[case::banned_seller(OpenTransactionError::SellerBanned, ErrorCode::NotFound)]
#[case::wrong_seller(OpenTransactionError::SellerMismatch, ErrorCode::InvalidRequest)]
#[case::duplicate(
    OpenTransactionError::AlreadyRequested { transaction_id: TransactionId::random() },
    ErrorCode::Conflict
)]
#[tokio::test]
async fn create_surfaces_ledger_refusals(
    parties: Parties,
    #[case] reason: OpenTransactionError,
    #[case] expected: ErrorCode,
) {
    let service = make_service(ledger_failing_open(TransactionLedgerError::not_admitted(reason)));

    let err = service.create(request(&parties)).await.expect_err("refused");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn wrong_seller_is_reported_against_seller_id(parties: Parties) {
    let service = make_service(ledger_failing_open(TransactionLedgerError::not_admitted(
        OpenTransactionError::SellerMismatch,
    )));

    let err = service.create(request(&parties)).await.expect_err("refused");
    let details = err.details().expect("field details");
    assert_eq!(details["field"], "sellerId");
}

#[rstest]
#[tokio::test]
async fn create_with_missing_listing_is_not_found(parties: Parties) {
    let listing_id = *parties.listing.id();
    let service =
        make_service(ledger_failing_open(TransactionLedgerError::unknown_listing(listing_id)));

    let err = service.create(request(&parties)).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "listing not found");
}

#[rstest]
#[tokio::test]
async fn missing_users_are_named_by_role(parties: Parties) {
    let buyer_id = *parties.buyer.id();
    let seller_id = *parties.seller.id();

    let service = make_service(ledger_failing_open(TransactionLedgerError::unknown_user(buyer_id)));
    let err = service.create(request(&parties)).await.expect_err("missing buyer");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "buyer not found");

    let service =
        make_service(ledger_failing_open(TransactionLedgerError::unknown_user(seller_id)));
    let err = service.create(request(&parties)).await.expect_err("missing seller");
    assert_eq!(err.message(), "seller not found");
}

#[rstest]
#[tokio::test]
async fn create_rejects_self_purchase(parties: Parties) {
    let request = CreateTransactionRequest {
        buyer_id: *parties.seller.id(),
        ..request(&parties)
    };
    let mut ledger = MockTransactionLedger::new();
    ledger.expect_open().never();
    let service = make_service(ledger);

    let err = service.create(request).await.expect_err("self purchase");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

fn ledger_with(transaction: Transaction) -> MockTransactionLedger {
    let mut ledger = MockTransactionLedger::new();
    ledger
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(transaction)));
    ledger
}

fn settled(parties: Parties, transaction: &Transaction, target: TransactionStatus) -> Settlement {
    settle(
        SettlementParts {
            transaction: transaction.clone(),
            seller: parties.seller,
            listing: parties.listing,
        },
        target,
        at_day(9),
    )
    .expect("settles")
}

#[rstest]
#[tokio::test]
async fn transition_returns_settled_transaction(parties: Parties) {
    let transaction = sample_transaction(&parties.listing, parties.buyer.id(), at_day(2));
    let id = *transaction.id();
    let seller_id = *parties.seller.id();
    let settlement = settled(parties, &transaction, TransactionStatus::Completed);
    let mut ledger = ledger_with(transaction);
    ledger
        .expect_settle()
        .withf(move |tx_id, target, at| {
            tx_id == &id && *target == TransactionStatus::Completed && *at == at_day(9)
        })
        .times(1)
        .return_once(move |_, _, _| Ok(settlement));
    let service = make_service(ledger);

    let settled = service
        .transition(TransitionRequest {
            actor: seller_id,
            transaction_id: id,
            target: TransactionStatus::Completed,
        })
        .await
        .expect("settled");
    assert_eq!(settled.status(), TransactionStatus::Completed);
}

#[rstest]
#[tokio::test]
async fn buyer_may_cancel_their_request(parties: Parties) {
    let transaction = sample_transaction(&parties.listing, parties.buyer.id(), at_day(2));
    let id = *transaction.id();
    let buyer_id = *parties.buyer.id();
    let settlement = settled(parties, &transaction, TransactionStatus::Cancelled);
    let mut ledger = ledger_with(transaction);
    ledger
        .expect_settle()
        .withf(|_, target, _| *target == TransactionStatus::Cancelled)
        .times(1)
        .return_once(move |_, _, _| Ok(settlement));
    let service = make_service(ledger);

    let cancelled = service
        .transition(TransitionRequest {
            actor: buyer_id,
            transaction_id: id,
            target: TransactionStatus::Cancelled,
        })
        .await
        .expect("cancelled");
    assert_eq!(cancelled.status(), TransactionStatus::Cancelled);
}

#[rstest]
#[case::buyer_rejects(false, TransactionStatus::Rejected)]
#[case::buyer_completes(false, TransactionStatus::Completed)]
#[case::seller_cancels(true, TransactionStatus::Cancelled)]
#[tokio::test]
async fn parties_may_only_choose_their_own_outcomes(
    parties: Parties,
    #[case] acting_as_seller: bool,
    #[case] target: TransactionStatus,
) {
    let transaction = sample_transaction(&parties.listing, parties.buyer.id(), at_day(2));
    let id = *transaction.id();
    let actor = if acting_as_seller {
        *parties.seller.id()
    } else {
        *parties.buyer.id()
    };
    let mut ledger = ledger_with(transaction);
    ledger.expect_settle().never();
    let service = make_service(ledger);

    let err = service
        .transition(TransitionRequest {
            actor,
            transaction_id: id,
            target,
        })
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn transition_by_outsider_is_forbidden(parties: Parties) {
    let transaction = sample_transaction(&parties.listing, parties.buyer.id(), at_day(2));
    let id = *transaction.id();
    let mut ledger = ledger_with(transaction);
    ledger.expect_settle().never();
    let service = make_service(ledger);

    let err = service
        .transition(TransitionRequest {
            actor: UserId::random(),
            transaction_id: id,
            target: TransactionStatus::Rejected,
        })
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn transition_of_unknown_transaction_is_not_found() {
    let mut ledger = MockTransactionLedger::new();
    ledger.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(ledger);

    let err = service
        .transition(TransitionRequest {
            actor: UserId::random(),
            transaction_id: TransactionId::random(),
            target: TransactionStatus::Completed,
        })
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::final_state(
    SettlementError::Transition(TransitionError::AlreadyFinal { current: TransactionStatus::Completed }),
    ErrorCode::Conflict
)]
#[case::pending_target(
    SettlementError::Transition(TransitionError::InvalidTarget { target: TransactionStatus::Pending }),
    ErrorCode::InvalidRequest
)]
#[case::sold(
    SettlementError::ListingAlreadySold { listing_id: ListingId::random() },
    ErrorCode::Conflict
)]
#[case::mismatch(SettlementError::MismatchedRecords, ErrorCode::InternalError)]
fn settlement_refusals_map_to_codes(#[case] reason: SettlementError, #[case] expected: ErrorCode) {
    let err = map_ledger_error(TransactionLedgerError::refused(reason));
    assert_eq!(err.code(), expected);
}

#[rstest]
#[case(TransactionLedgerError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(TransactionLedgerError::query("bad"), ErrorCode::InternalError)]
#[case(TransactionLedgerError::inconsistent("gone"), ErrorCode::InternalError)]
#[case(
    TransactionLedgerError::unknown_transaction(TransactionId::random()),
    ErrorCode::NotFound
)]
fn ledger_failures_map_to_codes(#[case] error: TransactionLedgerError, #[case] expected: ErrorCode) {
    assert_eq!(map_ledger_error(error).code(), expected);
}

#[rstest]
#[tokio::test]
async fn listing_other_users_transactions_is_forbidden() {
    let mut ledger = MockTransactionLedger::new();
    ledger.expect_list_for_user().never();
    let service = make_service(ledger);

    let err = service
        .list_for_user(&UserId::random(), &UserId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

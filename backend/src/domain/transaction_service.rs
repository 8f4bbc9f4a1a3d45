//! Transaction services: opening purchase requests and settling them.
//!
//! Both operations run as one ledger call. [`TransactionLedger::open`]
//! admits and records a request under the same write, and
//! [`TransactionLedger::settle`] applies the transaction status, seller
//! reputation and listing availability as one unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateTransactionRequest, TransactionCommand, TransactionLedger, TransactionLedgerError,
    TransactionQuery, TransitionRequest,
};
use crate::domain::{
    Error, OpenTransactionError, SettlementError, Transaction, TransactionId, TransitionError,
    UserId,
};

const LISTING_UNAVAILABLE: &str = "listing is not available";

/// Transaction service implementing the transaction command and query ports.
#[derive(Clone)]
pub struct TransactionService<T> {
    ledger: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TransactionService<T> {
    pub fn new(ledger: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

fn map_open_error(reason: OpenTransactionError) -> Error {
    match reason {
        OpenTransactionError::SelfPurchase => Error::invalid_request(reason.to_string()),
        OpenTransactionError::ListingUnavailable { .. } | OpenTransactionError::SellerBanned => {
            Error::not_found(LISTING_UNAVAILABLE)
        }
        OpenTransactionError::SellerMismatch => {
            Error::invalid_field("sellerId", "seller does not own the listing")
        }
        OpenTransactionError::AlreadyRequested { .. } => {
            Error::conflict("you already have a pending request for this listing")
        }
    }
}

fn map_settlement_error(reason: SettlementError) -> Error {
    match reason {
        SettlementError::Transition(TransitionError::AlreadyFinal { current }) => {
            Error::conflict(format!("transaction is already {current}"))
        }
        SettlementError::Transition(TransitionError::InvalidTarget { target }) => {
            Error::invalid_field("status", format!("transactions cannot be moved to {target}"))
        }
        SettlementError::ListingAlreadySold { .. } => {
            Error::conflict("listing has already been sold")
        }
        SettlementError::MismatchedRecords => {
            Error::internal("transaction records are inconsistent")
        }
    }
}

fn map_ledger_error(error: TransactionLedgerError) -> Error {
    match error {
        TransactionLedgerError::Connection { message } => {
            Error::service_unavailable(format!("transaction ledger unavailable: {message}"))
        }
        TransactionLedgerError::Query { message } => {
            Error::internal(format!("transaction ledger error: {message}"))
        }
        TransactionLedgerError::UnknownTransaction { .. } => {
            Error::not_found("transaction not found")
        }
        TransactionLedgerError::UnknownListing { .. } => Error::not_found("listing not found"),
        TransactionLedgerError::UnknownUser { .. } => Error::not_found("user not found"),
        TransactionLedgerError::NotAdmitted { reason } => map_open_error(reason),
        TransactionLedgerError::Refused { reason } => map_settlement_error(reason),
        TransactionLedgerError::Inconsistent { message } => {
            Error::internal(format!("transaction ledger is inconsistent: {message}"))
        }
    }
}

impl<T> TransactionService<T>
where
    T: TransactionLedger,
{
    async fn find_transaction(&self, id: &TransactionId) -> Result<Transaction, Error> {
        self.ledger
            .find_by_id(id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found("transaction not found"))
    }
}

#[async_trait]
impl<T> TransactionCommand for TransactionService<T>
where
    T: TransactionLedger,
{
    async fn create(&self, request: CreateTransactionRequest) -> Result<Transaction, Error> {
        let CreateTransactionRequest {
            listing_id,
            buyer_id,
            seller_id,
            note,
        } = request;
        let has_message = note.message().is_some();
        let transaction = Transaction::open(
            TransactionId::random(),
            listing_id,
            buyer_id,
            seller_id,
            self.clock.utc(),
        )
        .map_err(map_open_error)?
        .with_note(note);

        self.ledger
            .open(&transaction)
            .await
            .map_err(|err| match err {
                TransactionLedgerError::UnknownUser { user_id } if user_id == buyer_id => {
                    Error::not_found("buyer not found")
                }
                TransactionLedgerError::UnknownUser { .. } => Error::not_found("seller not found"),
                other => map_ledger_error(other),
            })?;
        info!(
            transaction_id = %transaction.id(),
            listing_id = %listing_id,
            buyer_id = %buyer_id,
            seller_id = %seller_id,
            has_message,
            "purchase request opened"
        );
        Ok(transaction)
    }

    async fn transition(&self, request: TransitionRequest) -> Result<Transaction, Error> {
        let TransitionRequest {
            actor,
            transaction_id,
            target,
        } = request;
        let transaction = self.find_transaction(&transaction_id).await?;
        let Some(party) = transaction.party_of(&actor) else {
            return Err(Error::forbidden(
                "only the buyer or seller may settle this transaction",
            ));
        };
        // Parties never change, so checking roles before the ledger write is safe.
        match target.settled_by() {
            Some(allowed) if allowed != party => {
                return Err(Error::forbidden(format!(
                    "only the {allowed} may mark a transaction {target}"
                )));
            }
            _ => {}
        }

        let settlement = self
            .ledger
            .settle(&transaction_id, target, self.clock.utc())
            .await
            .map_err(map_ledger_error)?;
        let reputation = settlement.seller.reputation();
        info!(
            transaction_id = %transaction_id,
            status = %target,
            actor = %party,
            seller_id = %settlement.seller.id(),
            stars = reputation.stars(),
            rejections = reputation.rejections(),
            "transaction settled"
        );
        if settlement.newly_banned {
            warn!(
                seller_id = %settlement.seller.id(),
                rejections = reputation.rejections(),
                "seller banned after repeated rejections"
            );
        }
        Ok(settlement.transaction)
    }
}

#[async_trait]
impl<T> TransactionQuery for TransactionService<T>
where
    T: TransactionLedger,
{
    async fn list_for_user(
        &self,
        actor: &UserId,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, Error> {
        if actor != user_id {
            return Err(Error::forbidden(
                "users may only read their own transactions",
            ));
        }
        self.ledger
            .list_for_user(user_id)
            .await
            .map_err(map_ledger_error)
    }
}

#[cfg(test)]
#[path = "transaction_service_tests.rs"]
mod tests;

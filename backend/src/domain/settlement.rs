//! Settlement of a purchase request.
//!
//! Settling moves a pending transaction to its final state and computes the
//! matching seller reputation and listing availability. The result is a set
//! of records the ledger writes together or not at all.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    Listing, ListingId, ListingStateError, Transaction, TransactionStatus, TransitionError, User,
};

/// Records read before settling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementParts {
    pub transaction: Transaction,
    pub seller: User,
    pub listing: Listing,
}

/// Records to persist after settling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub transaction: Transaction,
    pub seller: User,
    pub listing: Listing,
    /// Set when this settlement crossed the ban threshold.
    pub newly_banned: bool,
}

/// Reasons a settlement is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementError {
    Transition(TransitionError),
    ListingAlreadySold { listing_id: ListingId },
    MismatchedRecords,
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition(inner) => inner.fmt(f),
            Self::ListingAlreadySold { listing_id } => {
                write!(f, "listing {listing_id} has already been sold")
            }
            Self::MismatchedRecords => {
                write!(f, "seller or listing does not belong to the transaction")
            }
        }
    }
}

impl std::error::Error for SettlementError {}

impl From<TransitionError> for SettlementError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}

impl From<ListingStateError> for SettlementError {
    fn from(value: ListingStateError) -> Self {
        match value {
            ListingStateError::AlreadySold { listing_id } => Self::ListingAlreadySold { listing_id },
        }
    }
}

/// Settle `parts.transaction` into `target` at `at`.
///
/// Completing adds a star and marks the listing sold. Rejecting removes a
/// star (floored at zero), counts a rejection and bans the seller at the
/// threshold. A buyer's cancellation touches neither the seller nor the
/// listing. Nothing changes when an error is returned.
pub fn settle(
    parts: SettlementParts,
    target: TransactionStatus,
    at: DateTime<Utc>,
) -> Result<Settlement, SettlementError> {
    let SettlementParts {
        transaction,
        seller,
        listing,
    } = parts;
    if seller.id() != transaction.seller_id() || listing.id() != transaction.listing_id() {
        return Err(SettlementError::MismatchedRecords);
    }

    let transaction = transaction.transition(target, at)?;
    let was_banned = seller.is_banned();
    let reputation = *seller.reputation();

    let (seller, listing) = match target {
        TransactionStatus::Completed => {
            let listing = listing.mark_sold(at)?;
            (seller.with_reputation(reputation.after_completed_sale()), listing)
        }
        TransactionStatus::Rejected => (
            seller.with_reputation(reputation.after_rejection(at)),
            listing,
        ),
        // `transition` refuses `Pending`.
        TransactionStatus::Cancelled | TransactionStatus::Pending => (seller, listing),
    };
    let newly_banned = !was_banned && seller.is_banned();

    Ok(Settlement {
        transaction,
        seller,
        listing,
        newly_banned,
    })
}

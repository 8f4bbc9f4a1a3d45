//! Purchase requests and their lifecycle.
//!
//! A transaction opens as `pending` and settles once. The seller completes
//! or rejects it; the buyer may cancel it instead. Settled transactions are
//! final.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Listing, ListingId, MobileNumber, TransactionId, User, UserId};

/// Maximum length of the message a buyer attaches to a request.
pub const REQUEST_MESSAGE_MAX: usize = 500;

/// Lifecycle state of a purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The party allowed to settle a request into this status.
    ///
    /// `None` for `pending`, which is never a target.
    pub fn settled_by(self) -> Option<Party> {
        match self {
            Self::Pending => None,
            Self::Completed | Self::Rejected => Some(Party::Seller),
            Self::Cancelled => Some(Party::Buyer),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Side of a transaction a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Buyer,
    Seller,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        })
    }
}

/// Validation errors for [`RequestNote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestNoteError {
    MessageTooLong { max: usize },
    InvalidContactPhone,
}

impl RequestNoteError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MessageTooLong { .. } => "message",
            Self::InvalidContactPhone => "contactPhone",
        }
    }
}

impl fmt::Display for RequestNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageTooLong { max } => write!(f, "message must be at most {max} characters"),
            Self::InvalidContactPhone => write!(f, "contact phone is not a valid number"),
        }
    }
}

impl std::error::Error for RequestNoteError {}

/// What a buyer tells the seller when asking for a book.
///
/// Both parts are optional; blank input is dropped.
///
/// # Examples
/// ```
/// use bookshare::domain::RequestNote;
///
/// let note = RequestNote::try_new(Some(" Can collect on Sunday "), Some("")).expect("valid");
/// assert_eq!(note.message(), Some("Can collect on Sunday"));
/// assert_eq!(note.contact_phone(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_phone: Option<String>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

impl RequestNote {
    pub fn try_new(
        message: Option<&str>,
        contact_phone: Option<&str>,
    ) -> Result<Self, RequestNoteError> {
        let message = non_blank(message);
        if message.is_some_and(|text| text.chars().count() > REQUEST_MESSAGE_MAX) {
            return Err(RequestNoteError::MessageTooLong {
                max: REQUEST_MESSAGE_MAX,
            });
        }
        let contact_phone = non_blank(contact_phone)
            .map(MobileNumber::new)
            .transpose()
            .map_err(|_| RequestNoteError::InvalidContactPhone)?;
        Ok(Self {
            message: message.map(str::to_owned),
            contact_phone: contact_phone.map(|phone| phone.to_string()),
        })
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn contact_phone(&self) -> Option<&str> {
        self.contact_phone.as_deref()
    }
}

/// Reasons a purchase request cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTransactionError {
    SelfPurchase,
    /// The listing has been sold.
    ListingUnavailable { listing_id: ListingId },
    /// The named seller does not own the listing.
    SellerMismatch,
    /// The listing's seller is banned.
    SellerBanned,
    /// The buyer already has a pending request for the listing.
    AlreadyRequested { transaction_id: TransactionId },
}

impl fmt::Display for OpenTransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfPurchase => write!(f, "buyer and seller must be different users"),
            Self::ListingUnavailable { listing_id } => {
                write!(f, "listing {listing_id} is not available")
            }
            Self::SellerMismatch => write!(f, "seller does not own the listing"),
            Self::SellerBanned => write!(f, "seller is banned"),
            Self::AlreadyRequested { transaction_id } => {
                write!(f, "request {transaction_id} for this listing is still pending")
            }
        }
    }
}

impl std::error::Error for OpenTransactionError {}

/// Errors raised by [`Transaction::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The transaction has already settled.
    AlreadyFinal { current: TransactionStatus },
    /// The requested target is not a settlement state.
    InvalidTarget { target: TransactionStatus },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyFinal { current } => {
                write!(f, "transaction is already {current} and cannot change")
            }
            Self::InvalidTarget { target } => {
                write!(f, "transactions cannot be moved to {target}")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// A buyer's request to acquire a listing.
///
/// ## Invariants
/// - `buyer_id != seller_id`.
/// - `status` leaves `pending` at most once.
///
/// # Examples
/// ```
/// use bookshare::domain::{ListingId, Transaction, TransactionId, TransactionStatus, UserId};
/// use chrono::Utc;
///
/// let tx = Transaction::open(
///     TransactionId::random(),
///     ListingId::random(),
///     UserId::random(),
///     UserId::random(),
///     Utc::now(),
/// )
/// .expect("distinct users");
/// let done = tx.transition(TransactionStatus::Completed, Utc::now()).expect("pending");
/// assert!(done.transition(TransactionStatus::Rejected, Utc::now()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: TransactionId,
    listing_id: ListingId,
    buyer_id: UserId,
    seller_id: UserId,
    status: TransactionStatus,
    #[serde(flatten)]
    note: RequestNote,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Open a pending purchase request.
    pub fn open(
        id: TransactionId,
        listing_id: ListingId,
        buyer_id: UserId,
        seller_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OpenTransactionError> {
        if buyer_id == seller_id {
            return Err(OpenTransactionError::SelfPurchase);
        }
        Ok(Self {
            id,
            listing_id,
            buyer_id,
            seller_id,
            status: TransactionStatus::Pending,
            note: RequestNote::default(),
            created_at,
            updated_at: None,
        })
    }

    /// Attach the buyer's note.
    #[must_use]
    pub fn with_note(self, note: RequestNote) -> Self {
        Self { note, ..self }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    pub fn buyer_id(&self) -> &UserId {
        &self.buyer_id
    }

    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn note(&self) -> &RequestNote {
        &self.note
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Whether `user` is the buyer or the seller.
    pub fn involves(&self, user: &UserId) -> bool {
        self.party_of(user).is_some()
    }

    /// Which side of the transaction `user` is on, if any.
    pub fn party_of(&self, user: &UserId) -> Option<Party> {
        if self.buyer_id == *user {
            Some(Party::Buyer)
        } else if self.seller_id == *user {
            Some(Party::Seller)
        } else {
            None
        }
    }

    /// Check this new request against the records it references.
    ///
    /// `listing` and `seller` are the stored listing and its owner;
    /// `existing` are the transactions already recorded for the listing.
    pub fn admit<'a>(
        &self,
        listing: &Listing,
        seller: &User,
        existing: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<(), OpenTransactionError> {
        if !listing.is_available() {
            return Err(OpenTransactionError::ListingUnavailable {
                listing_id: *listing.id(),
            });
        }
        if listing.seller_id() != &self.seller_id || seller.id() != &self.seller_id {
            return Err(OpenTransactionError::SellerMismatch);
        }
        if seller.is_banned() {
            return Err(OpenTransactionError::SellerBanned);
        }
        let duplicate = existing.into_iter().find(|other| {
            other.listing_id == self.listing_id
                && other.buyer_id == self.buyer_id
                && other.status == TransactionStatus::Pending
        });
        if let Some(other) = duplicate {
            return Err(OpenTransactionError::AlreadyRequested {
                transaction_id: other.id,
            });
        }
        Ok(())
    }

    /// Settle a pending transaction into `target`.
    pub fn transition(
        &self,
        target: TransactionStatus,
        at: DateTime<Utc>,
    ) -> Result<Self, TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::AlreadyFinal {
                current: self.status,
            });
        }
        if !target.is_terminal() {
            return Err(TransitionError::InvalidTarget { target });
        }
        Ok(Self {
            status: target,
            updated_at: Some(at),
            ..self.clone()
        })
    }
}

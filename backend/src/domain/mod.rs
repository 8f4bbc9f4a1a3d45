//! Domain primitives, aggregates and services.
//!
//! Purpose: define the marketplace's strongly typed entities, the seller
//! reputation policy and the purchase-request state machine, plus the
//! services that implement the driving ports. Nothing here knows about HTTP
//! or storage.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Listing`, `Transaction`, `HelpRequest`: aggregates.
//! - `Reputation` and `settle`: the reputation engine.
//! - `AccountService`, `ListingService`, `TransactionService`,
//!   `HelpDeskService`: driving-port implementations.

pub mod accounts_service;
pub mod auth;
pub mod error;
pub mod help_desk_service;
pub mod help_request;
pub mod identifier;
pub mod listing;
pub mod listing_service;
pub mod ordering;
pub mod ports;
pub mod reputation;
pub mod settlement;
pub mod trace_id;
pub mod transaction;
pub mod transaction_service;
pub mod user;

pub use self::accounts_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN_LENGTH, Registration, RegistrationParts,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::help_desk_service::HelpDeskService;
pub use self::help_request::{
    HelpRequest, HelpRequestDraft, HelpRequestStatus, HelpRequestValidationError, IssueType,
};
pub use self::identifier::{HelpRequestId, IdentifierError, ListingId, TransactionId, UserId};
pub use self::listing::{
    DEFAULT_PRICE_CEILING, Listing, ListingChanges, ListingDetails, ListingDetailsInput,
    ListingPolicy, ListingStateError, ListingUpdate, ListingValidationError, MarketplaceListing,
    Price, SellerSummary, marketplace_view,
};
pub use self::listing_service::ListingService;
pub use self::ordering::newest_first;
pub use self::reputation::{BAN_THRESHOLD, Reputation, ReputationError};
pub use self::settlement::{Settlement, SettlementError, SettlementParts, settle};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{
    OpenTransactionError, Party, REQUEST_MESSAGE_MAX, RequestNote, RequestNoteError, Transaction,
    TransactionStatus, TransitionError, UnknownStatus,
};
pub use self::transaction_service::TransactionService;
pub use self::user::{
    ContactDetails, EmailAddress, MobileNumber, NewUser, PasswordHash, ProfileUpdate, RegionName,
    User, UserName, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use bookshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the ledger, the password hasher) are
//! implemented by outbound adapters. Driving ports are the use cases inbound
//! adapters call; domain services implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod help_desk_command;
mod help_desk_query;
mod help_request_repository;
mod listing_command;
mod listing_query;
mod listing_repository;
mod login_service;
mod password_hasher;
mod registration_command;
mod transaction_command;
mod transaction_ledger;
mod transaction_query;
mod user_profile_command;
mod user_profile_query;
mod user_repository;

pub use help_desk_command::HelpDeskCommand;
pub use help_desk_query::HelpDeskQuery;
#[cfg(test)]
pub use help_request_repository::MockHelpRequestRepository;
pub use help_request_repository::{HelpRequestPersistenceError, HelpRequestRepository};
pub use listing_command::{CreateListingRequest, ListingCommand, UpdateListingRequest};
pub use listing_query::ListingQuery;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use registration_command::RegistrationCommand;
pub use transaction_command::{CreateTransactionRequest, TransactionCommand, TransitionRequest};
#[cfg(test)]
pub use transaction_ledger::MockTransactionLedger;
pub use transaction_ledger::{TransactionLedger, TransactionLedgerError};
pub use transaction_query::TransactionQuery;
pub use user_profile_command::{UpdateProfileRequest, UserProfileCommand};
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};

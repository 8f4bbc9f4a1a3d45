//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local store for users, listings, the transaction
//!   ledger and the help desk log.
//! - **hashing**: salted SHA-256 password digests.
//!
//! Adapters translate between domain types and storage; they hold no
//! business rules beyond what the domain hands them.

pub mod hashing;
pub mod memory;

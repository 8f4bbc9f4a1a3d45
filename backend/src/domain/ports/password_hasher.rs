//! Port for deriving and checking password digests.
//!
//! Hashing is CPU bound and synchronous; adapters must never log or return
//! the plaintext.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// A digest could not be produced.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored digest is not in a recognised format.
        MalformedHash => "stored password hash is malformed",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a stored digest.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}

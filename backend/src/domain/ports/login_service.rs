//! Driving port for login.
//!
//! Inbound adapters call it to check credentials without knowing how users
//! or password digests are stored.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserProfile};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user's profile.
    ///
    /// Unknown emails and wrong passwords yield the same `Unauthorized`
    /// error; banned accounts yield `Forbidden`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error>;
}

//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, UserProfile};

#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create an account with a clean reputation.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;
}

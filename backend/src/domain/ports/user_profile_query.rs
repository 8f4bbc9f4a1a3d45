//! Driving port for user profile queries.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Domain use-case port for reading a user's public profile.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error>;
}

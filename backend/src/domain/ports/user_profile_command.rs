//! Driving port for profile edits.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, UserId, UserProfile};

/// A profile edit issued by `actor` against `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub actor: UserId,
    pub user_id: UserId,
    pub update: ProfileUpdate,
}

#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply the edit; only the profile owner may do so.
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<UserProfile, Error>;
}

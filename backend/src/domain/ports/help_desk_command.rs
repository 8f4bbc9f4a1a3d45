//! Driving port for filing help requests.

use async_trait::async_trait;

use crate::domain::{Error, HelpRequest, HelpRequestDraft, UserId};

#[async_trait]
pub trait HelpDeskCommand: Send + Sync {
    /// File an open request on behalf of `user_id`.
    async fn file(&self, user_id: &UserId, draft: HelpRequestDraft) -> Result<HelpRequest, Error>;
}

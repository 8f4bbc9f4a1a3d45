//! Driving port for reading the help desk log.

use async_trait::async_trait;

use crate::domain::{Error, HelpRequest, UserId};

#[async_trait]
pub trait HelpDeskQuery: Send + Sync {
    /// Requests filed by `user_id`, newest first.
    async fn list_own(&self, user_id: &UserId) -> Result<Vec<HelpRequest>, Error>;
}

//! Port abstraction for the help desk log.
use async_trait::async_trait;

use crate::domain::{HelpRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by help desk adapters.
    pub enum HelpRequestPersistenceError {
        Connection { message: String } => "help desk connection failed: {message}",
        Query { message: String } => "help desk query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpRequestRepository: Send + Sync {
    /// Append a request to the log.
    async fn insert(&self, request: &HelpRequest) -> Result<(), HelpRequestPersistenceError>;

    /// Requests filed by `user`, newest first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<HelpRequest>, HelpRequestPersistenceError>;
}

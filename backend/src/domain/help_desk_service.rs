//! Help desk service: filing and reading support requests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    HelpDeskCommand, HelpDeskQuery, HelpRequestPersistenceError, HelpRequestRepository,
};
use crate::domain::{Error, HelpRequest, HelpRequestDraft, HelpRequestId, UserId};

#[derive(Clone)]
pub struct HelpDeskService<R> {
    requests: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> HelpDeskService<R> {
    pub fn new(requests: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { requests, clock }
    }
}

fn map_help_error(error: HelpRequestPersistenceError) -> Error {
    match error {
        HelpRequestPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("help desk unavailable: {message}"))
        }
        HelpRequestPersistenceError::Query { message } => {
            Error::internal(format!("help desk error: {message}"))
        }
    }
}

#[async_trait]
impl<R> HelpDeskCommand for HelpDeskService<R>
where
    R: HelpRequestRepository,
{
    async fn file(&self, user_id: &UserId, draft: HelpRequestDraft) -> Result<HelpRequest, Error> {
        let request = HelpRequest::file(HelpRequestId::random(), *user_id, draft, self.clock.utc());
        self.requests
            .insert(&request)
            .await
            .map_err(map_help_error)?;
        info!(
            help_request_id = %request.id(),
            user_id = %user_id,
            issue_type = ?request.issue_type(),
            "help request filed"
        );
        Ok(request)
    }
}

#[async_trait]
impl<R> HelpDeskQuery for HelpDeskService<R>
where
    R: HelpRequestRepository,
{
    async fn list_own(&self, user_id: &UserId) -> Result<Vec<HelpRequest>, Error> {
        self.requests
            .list_for_user(user_id)
            .await
            .map_err(map_help_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockHelpRequestRepository;
    use crate::domain::{ErrorCode, HelpRequestStatus, IssueType};
    use crate::test_support::{MutableClock, at_day};
    use rstest::rstest;

    fn make_service(repo: MockHelpRequestRepository) -> HelpDeskService<MockHelpRequestRepository> {
        HelpDeskService::new(Arc::new(repo), Arc::new(MutableClock::new(at_day(3))))
    }

    fn draft() -> HelpRequestDraft {
        HelpRequestDraft::try_new(IssueType::Payment, "Refund", "Charged twice").expect("draft")
    }

    #[rstest]
    #[tokio::test]
    async fn file_stores_open_request_for_user() {
        let user_id = UserId::random();
        let mut repo = MockHelpRequestRepository::new();
        repo.expect_insert()
            .withf(move |request| request.user_id() == &user_id)
            .times(1)
            .return_once(|_| Ok(()));

        let request = make_service(repo)
            .file(&user_id, draft())
            .await
            .expect("filed");
        assert_eq!(request.status(), HelpRequestStatus::Open);
        assert_eq!(request.created_at(), at_day(3));
    }

    #[rstest]
    #[tokio::test]
    async fn file_maps_storage_failure() {
        let mut repo = MockHelpRequestRepository::new();
        repo.expect_insert()
            .return_once(|_| Err(HelpRequestPersistenceError::query("disk full")));

        let err = make_service(repo)
            .file(&UserId::random(), draft())
            .await
            .expect_err("failed");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}

//! Help desk handlers.
//!
//! ```text
//! POST /api/help {"issueType":"payment","subject":"...","description":"..."}
//! GET  /api/help
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, HelpRequestDraft, HelpRequestValidationError, IssueType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorSchema, HelpRequestSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/help`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HelpRequestPayload {
    /// One of `payment`, `account`, `book`, `technical`, `other`.
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl HelpRequestPayload {
    fn to_draft(
        &self,
        user_agent: Option<&str>,
    ) -> Result<HelpRequestDraft, HelpRequestValidationError> {
        let issue_type: IssueType = self.issue_type.parse()?;
        Ok(HelpRequestDraft::try_new(issue_type, &self.subject, &self.description)?
            .with_user_agent(user_agent))
    }
}

/// File a help request as the logged-in user.
///
/// The caller's `User-Agent` is stored alongside the request.
#[utoipa::path(
    post,
    path = "/api/help",
    request_body = HelpRequestPayload,
    responses(
        (status = 201, description = "Help request filed", body = HelpRequestSchema),
        (status = 400, description = "Invalid help request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["help"],
    operation_id = "fileHelpRequest"
)]
#[post("/help")]
pub async fn file_help_request(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HelpRequestPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let draft = payload
        .to_draft(user_agent)
        .map_err(|err| Error::invalid_field(err.field(), err.to_string()))?;
    let request = state.help_desk.file(&user_id, draft).await?;
    Ok(ApiResponse::created(request))
}

/// The caller's own help requests, newest first.
#[utoipa::path(
    get,
    path = "/api/help",
    responses(
        (status = 200, description = "Help requests", body = [HelpRequestSchema]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["help"],
    operation_id = "ownHelpRequests"
)]
#[get("/help")]
pub async fn own_help_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let requests = state.help_desk_query.list_own(&user_id).await?;
    Ok(ApiResponse::ok(requests))
}

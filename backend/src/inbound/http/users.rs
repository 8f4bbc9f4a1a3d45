//! User profile handlers.
//!
//! ```text
//! GET /api/user/{id}
//! PUT /api/user/{id} {"name":"Mira","district":"Kochi"}
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UpdateProfileRequest;
use crate::domain::{
    Error, MobileNumber, ProfileUpdate, RegionName, UserId, UserName, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `PUT /api/user/{id}`.
///
/// Reputation, email, password and timestamps are not editable; naming any
/// of them fails deserialisation.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

impl TryFrom<&UpdateProfilePayload> for ProfileUpdate {
    type Error = UserValidationError;

    fn try_from(value: &UpdateProfilePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.as_deref().map(UserName::new).transpose()?,
            mobile: value.mobile.as_deref().map(MobileNumber::new).transpose()?,
            state: value
                .state
                .as_deref()
                .map(|raw| RegionName::new("state", raw))
                .transpose()?,
            district: value
                .district
                .as_deref()
                .map(|raw| RegionName::new("district", raw))
                .transpose()?,
        })
    }
}

fn map_profile_validation_error(err: &UserValidationError) -> Error {
    Error::invalid_field(err.field(), err.to_string())
}

/// Read a user's public profile.
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserProfileSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let profile = state.profiles.fetch_profile(&path.into_inner()).await?;
    Ok(ApiResponse::ok(profile))
}

/// Update the caller's own name or contact details.
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Updated profile", body = UserProfileSchema),
        (status = 400, description = "Invalid or forbidden fields", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the profile owner", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
    payload: web::Json<UpdateProfilePayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let update =
        ProfileUpdate::try_from(&*payload).map_err(|err| map_profile_validation_error(&err))?;
    let profile = state
        .profile_updates
        .update_profile(UpdateProfileRequest {
            actor,
            user_id: path.into_inner(),
            update,
        })
        .await?;
    Ok(ApiResponse::ok(profile))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

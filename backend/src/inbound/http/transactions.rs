//! Purchase request handlers.
//!
//! ```text
//! POST /api/transactions {"listingId":"...","sellerId":"...","message":"..."}
//! PUT  /api/transactions/{id} {"status":"completed"}
//! GET  /api/transactions/user/{userId}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateTransactionRequest, TransitionRequest};
use crate::domain::{Error, ListingId, RequestNote, TransactionId, TransactionStatus, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorSchema, TransactionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/transactions`.
///
/// The buyer is the logged-in caller. `buyerId` is accepted for older
/// clients but must name the caller.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTransactionPayload {
    #[schema(value_type = String)]
    pub listing_id: ListingId,
    #[schema(value_type = String)]
    pub seller_id: UserId,
    #[schema(value_type = Option<String>)]
    pub buyer_id: Option<UserId>,
    /// Note for the seller, at most 500 characters.
    #[schema(example = "Can collect on Sunday morning")]
    pub message: Option<String>,
    /// Number the seller can call back on.
    #[schema(example = "+91 90000 11111")]
    pub contact_phone: Option<String>,
}

/// Request body for `PUT /api/transactions/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransitionPayload {
    /// `completed` or `rejected` for the seller, `cancelled` for the buyer.
    #[schema(example = "completed")]
    pub status: String,
}

fn parse_target(raw: &str) -> Result<TransactionStatus, Error> {
    raw.parse::<TransactionStatus>()
        .map_err(|err| Error::invalid_field("status", err.to_string()))
}

/// Ask a seller for one of their listings.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Pending purchase request", body = TransactionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "buyerId is not the caller", body = ErrorSchema),
        (status = 404, description = "Listing unavailable or user missing", body = ErrorSchema),
        (status = 409, description = "Caller already has a pending request for the listing", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "createTransaction"
)]
#[post("/transactions")]
pub async fn create_transaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTransactionPayload>,
) -> ApiResult<HttpResponse> {
    let buyer_id = session.require_user_id()?;
    let CreateTransactionPayload {
        listing_id,
        seller_id,
        buyer_id: claimed,
        message,
        contact_phone,
    } = payload.into_inner();
    if claimed.is_some_and(|claimed| claimed != buyer_id) {
        return Err(Error::forbidden("buyerId must match the logged-in user"));
    }
    let note = RequestNote::try_new(message.as_deref(), contact_phone.as_deref())
        .map_err(|err| Error::invalid_field(err.field(), err.to_string()))?;
    let transaction = state
        .transactions
        .create(CreateTransactionRequest {
            listing_id,
            buyer_id,
            seller_id,
            note,
        })
        .await?;
    Ok(ApiResponse::created(transaction))
}

/// Settle a pending purchase request.
///
/// Only the seller may complete or reject; only the buyer may cancel.
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(("id" = String, Path, description = "Transaction id")),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Settled transaction", body = TransactionSchema),
        (status = 400, description = "Unknown or pending target status", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller may not choose this outcome", body = ErrorSchema),
        (status = 404, description = "Unknown transaction", body = ErrorSchema),
        (status = 409, description = "Already settled or listing sold", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "transitionTransaction"
)]
#[put("/transactions/{id}")]
pub async fn transition_transaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TransactionId>,
    payload: web::Json<TransitionPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let target = parse_target(&payload.status)?;
    let transaction = state
        .transactions
        .transition(TransitionRequest {
            actor,
            transaction_id: path.into_inner(),
            target,
        })
        .await?;
    Ok(ApiResponse::ok(transaction))
}

/// Purchase requests where the caller is buyer or seller.
#[utoipa::path(
    get,
    path = "/api/transactions/user/{user_id}",
    params(("user_id" = String, Path, description = "User id; must be the caller")),
    responses(
        (status = 200, description = "Transactions", body = [TransactionSchema]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Another user's transactions", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "userTransactions"
)]
#[get("/transactions/user/{user_id}")]
pub async fn user_transactions(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let transactions = state
        .transactions_query
        .list_for_user(&actor, &path.into_inner())
        .await?;
    Ok(ApiResponse::ok(transactions))
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;

//! Book listing handlers.
//!
//! ```text
//! GET    /api/books?excludeUserId={userId}
//! POST   /api/books {"title":"Gitanjali","author":"Tagore",...,"price":0}
//! GET    /api/books/seller/{sellerId}
//! GET    /api/books/{id}
//! PUT    /api/books/{id} {"price":80}
//! DELETE /api/books/{id}
//! ```
//!
//! Field validation happens in the listing service so HTTP and any future
//! adapter share the same rules; these DTOs only reject unknown fields.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateListingRequest, UpdateListingRequest};
use crate::domain::{ListingChanges, ListingDetailsInput, ListingId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorSchema, ListingSchema, MarketplaceListingSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/books`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateListingPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Whole currency units; `0` donates the book.
    #[serde(default)]
    pub price: u32,
}

impl CreateListingPayload {
    fn into_request(self, seller_id: UserId) -> CreateListingRequest {
        let Self {
            title,
            author,
            category,
            language,
            condition,
            description,
            location,
            images,
            price,
        } = self;
        CreateListingRequest {
            seller_id,
            details: ListingDetailsInput {
                title,
                author,
                category,
                language,
                condition,
                description,
                location,
                images,
            },
            price,
        }
    }
}

/// Request body for `PUT /api/books/{id}`.
///
/// Absent fields stay unchanged; an empty string clears an optional field.
/// Availability is not client-editable.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateListingPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<u32>,
}

impl From<UpdateListingPayload> for ListingChanges {
    fn from(value: UpdateListingPayload) -> Self {
        Self {
            title: value.title,
            author: value.author,
            category: value.category,
            language: value.language,
            condition: value.condition,
            description: value.description,
            location: value.location,
            images: value.images,
            price: value.price,
        }
    }
}

/// Query string for the marketplace view.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MarketplaceQuery {
    /// Hide this user's own listings.
    #[param(value_type = Option<String>)]
    pub exclude_user_id: Option<UserId>,
}

/// Available listings from sellers in good standing, newest first.
#[utoipa::path(
    get,
    path = "/api/books",
    params(MarketplaceQuery),
    responses(
        (status = 200, description = "Marketplace listings", body = [MarketplaceListingSchema]),
        (status = 400, description = "Malformed query", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "marketplace",
    security([])
)]
#[get("/books")]
pub async fn marketplace(
    state: web::Data<HttpState>,
    query: web::Query<MarketplaceQuery>,
) -> ApiResult<HttpResponse> {
    let listings = state
        .listings_query
        .marketplace(query.into_inner().exclude_user_id)
        .await?;
    Ok(ApiResponse::ok(listings))
}

/// Publish a listing as the logged-in seller.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateListingPayload,
    responses(
        (status = 201, description = "Listing created", body = MarketplaceListingSchema),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Seller is banned", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/books")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateListingPayload>,
) -> ApiResult<HttpResponse> {
    let seller_id = session.require_user_id()?;
    let listing = state
        .listings
        .create(payload.into_inner().into_request(seller_id))
        .await?;
    Ok(ApiResponse::created(listing))
}

/// Every listing of a seller, sold or not.
#[utoipa::path(
    get,
    path = "/api/books/seller/{seller_id}",
    params(("seller_id" = String, Path, description = "Seller's user id")),
    responses(
        (status = 200, description = "Seller listings", body = [ListingSchema]),
        (status = 404, description = "Unknown seller", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listingsBySeller",
    security([])
)]
#[get("/books/seller/{seller_id}")]
pub async fn listings_by_seller(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let listings = state.listings_query.by_seller(&path.into_inner()).await?;
    Ok(ApiResponse::ok(listings))
}

/// A single listing with its seller card.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = MarketplaceListingSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<ListingId>,
) -> ApiResult<HttpResponse> {
    let listing = state.listings_query.get(&path.into_inner()).await?;
    Ok(ApiResponse::ok(listing))
}

/// Revise the caller's own unsold listing.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Listing id")),
    request_body = UpdateListingPayload,
    responses(
        (status = 200, description = "Updated listing", body = MarketplaceListingSchema),
        (status = 400, description = "Invalid update", body = ErrorSchema),
        (status = 403, description = "Not the seller", body = ErrorSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema),
        (status = 409, description = "Listing already sold", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing"
)]
#[put("/books/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListingId>,
    payload: web::Json<UpdateListingPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let listing = state
        .listings
        .update(UpdateListingRequest {
            actor,
            listing_id: path.into_inner(),
            changes: payload.into_inner().into(),
        })
        .await?;
    Ok(ApiResponse::ok(listing))
}

/// Withdraw the caller's own listing.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 204, description = "Listing withdrawn"),
        (status = 403, description = "Not the seller", body = ErrorSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema),
        (status = 409, description = "Sold or awaiting a decision", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "withdrawListing"
)]
#[delete("/books/{id}")]
pub async fn withdraw_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListingId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.listings.withdraw(&actor, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;

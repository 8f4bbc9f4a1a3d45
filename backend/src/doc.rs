//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the session cookie security scheme.
//! Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::help::HelpRequestPayload;
use crate::inbound::http::listings::{CreateListingPayload, UpdateListingPayload};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, HelpRequestSchema, ListingSchema, MarketplaceListingSchema,
    SellerSummarySchema, TransactionSchema, TransactionStatusSchema, UserProfileSchema,
};
use crate::inbound::http::transactions::{CreateTransactionPayload, TransitionPayload};
use crate::inbound::http::users::UpdateProfilePayload;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/register or /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookshare API",
        description = "Community marketplace for donating and selling second-hand books."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::listings::marketplace,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::listings_by_seller,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::withdraw_listing,
        crate::inbound::http::transactions::create_transaction,
        crate::inbound::http::transactions::transition_transaction,
        crate::inbound::http::transactions::user_transactions,
        crate::inbound::http::help::file_help_request,
        crate::inbound::http::help::own_help_requests,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserProfileSchema,
        ListingSchema,
        SellerSummarySchema,
        MarketplaceListingSchema,
        TransactionSchema,
        TransactionStatusSchema,
        HelpRequestSchema,
        RegisterRequest,
        LoginRequest,
        UpdateProfilePayload,
        CreateListingPayload,
        UpdateListingPayload,
        CreateTransactionPayload,
        TransitionPayload,
        HelpRequestPayload,
    )),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Profiles and seller reputation"),
        (name = "listings", description = "Books offered in the marketplace"),
        (name = "transactions", description = "Purchase requests and their settlement"),
        (name = "help", description = "Support requests"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their wire shape and live in the inbound adapter
//! where framework concerns belong.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in failure envelopes.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Failure envelope: `{"success": false, "code": ..., "message": ...}`.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "price must be below 400")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context, usually `{"field": "..."}` for validation failures.
    details: Option<serde_json::Value>,
}

/// Public view of a user returned inside `{"success": true, "data": ...}`.
#[derive(ToSchema)]
#[schema(as = UserProfile, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserProfileSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Mira Nair")]
    name: String,
    #[schema(example = "mira@example.org")]
    email: String,
    #[schema(example = "+919876543210")]
    mobile: String,
    state: String,
    district: String,
    /// Completed sales minus rejections, never below zero.
    stars: u32,
    rejections: u32,
    is_banned: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    banned_at: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// A book offered by a seller.
#[derive(ToSchema)]
#[schema(as = Listing, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ListingSchema {
    id: String,
    seller_id: String,
    #[schema(example = "Gitanjali")]
    title: String,
    author: String,
    category: String,
    language: String,
    condition: Option<String>,
    description: Option<String>,
    location: Option<String>,
    images: Vec<String>,
    /// Whole currency units; `0` marks a free donation.
    #[schema(example = 120)]
    price: u32,
    is_available: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
}

/// Seller contact card attached to marketplace listings.
#[derive(ToSchema)]
#[schema(as = SellerSummary, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SellerSummarySchema {
    id: String,
    name: String,
    email: String,
    mobile: String,
    stars: u32,
    is_banned: bool,
}

/// Listing fields plus a `seller` card, as shown in the marketplace.
#[derive(ToSchema)]
#[schema(as = MarketplaceListing, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MarketplaceListingSchema {
    id: String,
    seller_id: String,
    title: String,
    author: String,
    category: String,
    language: String,
    condition: Option<String>,
    description: Option<String>,
    location: Option<String>,
    images: Vec<String>,
    price: u32,
    is_available: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
    seller: SellerSummarySchema,
}

/// Purchase request lifecycle states.
#[derive(ToSchema)]
#[schema(as = TransactionStatus)]
pub enum TransactionStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "completed")]
    Completed,
    #[schema(rename = "rejected")]
    Rejected,
    #[schema(rename = "cancelled")]
    Cancelled,
}

/// A buyer's request to acquire a listing.
#[derive(ToSchema)]
#[schema(as = Transaction, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TransactionSchema {
    id: String,
    listing_id: String,
    buyer_id: String,
    seller_id: String,
    status: TransactionStatusSchema,
    message: Option<String>,
    contact_phone: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
}

/// A support ticket filed by a user.
#[derive(ToSchema)]
#[schema(as = HelpRequest, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct HelpRequestSchema {
    id: String,
    user_id: String,
    #[schema(example = "payment")]
    issue_type: String,
    subject: String,
    description: String,
    #[schema(example = "open")]
    status: String,
    user_agent: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert_eq!(ErrorCodeSchema::name(), "ErrorCode");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_fields() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "Error");
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("success"));
    }

    #[test]
    fn profile_schema_exposes_reputation_without_password() {
        let schema_json = schema_to_json::<UserProfileSchema>();
        assert!(schema_json.contains("isBanned"));
        assert!(schema_json.contains("stars"));
        assert!(!schema_json.to_lowercase().contains("password"));
    }
}

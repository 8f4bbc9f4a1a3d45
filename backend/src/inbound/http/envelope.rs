//! Success envelope shared by every JSON endpoint.
//!
//! Failures are rendered by the `ResponseError` impl in [`super::error`];
//! this module covers the `{"success": true, "data": ...}` half.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Wire shape of a successful request.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// `200 OK` carrying `data`.
    pub fn ok(data: T) -> HttpResponse {
        Self::with_status(StatusCode::OK, data)
    }

    /// `201 Created` carrying the new resource.
    pub fn created(data: T) -> HttpResponse {
        Self::with_status(StatusCode::CREATED, data)
    }

    fn with_status(status: StatusCode, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(data))
    }
}

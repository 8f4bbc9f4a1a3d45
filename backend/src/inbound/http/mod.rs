//! HTTP inbound adapter exposing the marketplace REST endpoints under `/api`.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod help;
pub mod listings;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod transactions;
pub mod users;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, path_error_handler, query_error_handler};

/// Register extractor error handlers and every `/api` route.
///
/// Callers supply `web::Data<HttpState>` and the session middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bookshare::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(users::get_user)
                .service(users::update_user)
                .service(listings::marketplace)
                .service(listings::create_listing)
                // Must precede `/books/{id}`.
                .service(listings::listings_by_seller)
                .service(listings::get_listing)
                .service(listings::update_listing)
                .service(listings::withdraw_listing)
                .service(transactions::create_transaction)
                .service(transactions::transition_transaction)
                .service(transactions::user_transactions)
                .service(help::file_help_request)
                .service(help::own_help_requests),
        );
}

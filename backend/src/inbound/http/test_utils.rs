//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use super::state::HttpState;
use crate::Trace;
use crate::domain::UserId;

/// Password accepted by every account the helpers register.
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Application wired like the server, minus health checks and Swagger UI.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .wrap(Trace)
        .configure(super::configure)
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Register an account through the API and return its id and session cookie.
pub async fn sign_up<S, B>(app: &S, name: &str, email: &str) -> (UserId, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD,
            "mobile": "+91 98765 43210",
            "state": "Kerala",
            "district": "Ernakulam",
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 201, "registration succeeds");
    let cookie = session_cookie(&response);
    let body: Value = test::read_body_json(response).await;
    let id = body["data"]["id"]
        .as_str()
        .and_then(|raw| UserId::new(raw).ok())
        .expect("profile id");
    (id, cookie)
}

/// Publish a listing as the cookie's owner and return the created body.
pub async fn publish<S, B>(app: &S, cookie: &Cookie<'static>, title: &str, price: u32) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/books")
        .cookie(cookie.clone())
        .set_json(json!({
            "title": title,
            "author": "Rabindranath Tagore",
            "category": "Poetry",
            "language": "Bengali",
            "price": price,
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 201, "listing created");
    let body: Value = test::read_body_json(response).await;
    body["data"].clone()
}

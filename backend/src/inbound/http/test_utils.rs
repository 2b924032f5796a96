//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    FixtureCommentRepository, FixtureFollowRepository, FixtureGroupRepository, FixtureImageStore,
    FixturePostRepository, FixtureUserRepository, NoopFeedCache,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

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

/// Build the full application over the given state for handler tests.
pub fn test_app(
    state: HttpState,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(actix_web::web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(crate::inbound::http::configure_routes)
}

/// Register an account through the HTTP surface and return its session cookie.
pub async fn signup_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
) -> actix_web::cookie::Cookie<'static> {
    let request = actix_web::test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.org"),
            "password": "correct-horse-battery",
        }))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(
        response.status().is_redirection(),
        "signup should redirect, got {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Build handler state over fresh in-memory adapters.
pub fn fixture_state() -> HttpState {
    HttpState::new(HttpStatePorts {
        users: Arc::new(FixtureUserRepository::new()),
        posts: Arc::new(FixturePostRepository::new()),
        groups: Arc::new(FixtureGroupRepository::new()),
        comments: Arc::new(FixtureCommentRepository::new()),
        follows: Arc::new(FixtureFollowRepository::new()),
        images: Arc::new(FixtureImageStore::new()),
        cache: Arc::new(NoopFeedCache),
        page_size: pagination::DEFAULT_PAGE_SIZE,
    })
}

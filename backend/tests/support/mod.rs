//! Shared fixtures for HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::Value;
use uuid::Uuid;

use backend::domain::ports::{
    FeedCache, FixtureCommentRepository, FixtureFollowRepository, FixtureGroupRepository,
    FixtureImageStore, FixturePostRepository, FixtureUserRepository,
};
use backend::inbound::http::configure_routes;
use backend::inbound::http::state::{HttpState, HttpStatePorts};

/// Handler state plus handles to the adapters behind it, so tests can seed
/// data that has no public write endpoint.
pub struct TestBackend {
    pub state: HttpState,
    pub groups: Arc<FixtureGroupRepository>,
}

/// Build a fixture-backed state around the given cache implementation.
pub fn backend_with_cache(cache: Arc<dyn FeedCache>, page_size: u64) -> TestBackend {
    let groups = Arc::new(FixtureGroupRepository::new());
    let state = HttpState::new(HttpStatePorts {
        users: Arc::new(FixtureUserRepository::new()),
        posts: Arc::new(FixturePostRepository::new()),
        groups: groups.clone(),
        comments: Arc::new(FixtureCommentRepository::new()),
        follows: Arc::new(FixtureFollowRepository::new()),
        images: Arc::new(FixtureImageStore::new()),
        cache,
        page_size,
    });
    TestBackend { state, groups }
}

/// Build the application over the given state, with the same routing table
/// and session cookie settings as the real server.
pub fn app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session)
        .configure(configure_routes)
}

/// Register an account and return its session cookie.
pub async fn signup(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let request = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.org"),
            "password": "correct-horse-battery",
        }))
        .to_request();
    let response = test::call_service(app, request).await;
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

/// Publish a post as the cookie's user, asserting the redirect.
pub async fn publish(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    text: &str,
    group: Option<Uuid>,
) {
    let request = test::TestRequest::post()
        .uri("/create/")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "text": text, "group": group }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(
        response.status().is_redirection(),
        "publish should redirect, got {}",
        response.status()
    );
}

/// GET a JSON document, optionally authenticated.
pub async fn get_json(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
) -> Value {
    let mut request = test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let response = test::call_service(app, request.to_request()).await;
    assert!(
        response.status().is_success(),
        "GET {uri} should succeed, got {}",
        response.status()
    );
    test::read_body_json(response).await
}

/// Texts of the posts on a feed page, newest first.
pub fn item_texts(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["text"].as_str().expect("text").to_owned())
        .collect()
}

//! Tests for the account handlers.

use actix_web::http::{StatusCode, header};
use actix_web::test;
use base64::Engine as _;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{fixture_state, signup_and_get_cookie, test_app};

const GIF: &[u8] = &[b'G', b'I', b'F', b'8', b'9', b'a', 0x3B];

fn location(response: &actix_web::dev::ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
}

#[actix_web::test]
async fn signup_opens_a_session_and_lands_on_the_feed() {
    let app = test::init_service(test_app(fixture_state())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup/")
            .set_json(json!({
                "username": "leo",
                "email": "leo@example.org",
                "password": "correct-horse-battery",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    assert!(response
        .response()
        .cookies()
        .any(|cookie| cookie.name() == "session"));
}

#[actix_web::test]
async fn duplicate_signup_is_rejected() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "leo").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup/")
            .set_json(json!({
                "username": "leo",
                "email": "again@example.org",
                "password": "correct-horse-battery",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("username")
    );
}

#[actix_web::test]
async fn short_password_is_rejected() {
    let app = test::init_service(test_app(fixture_state())).await;
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup/")
            .set_json(json!({
                "username": "leo",
                "email": "leo@example.org",
                "password": "short",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_honours_a_same_site_next_path() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "leo").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({
                "username": "leo",
                "password": "correct-horse-battery",
                "next": "/create/",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/create/");
}

#[actix_web::test]
async fn login_ignores_an_offsite_next_target() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "leo").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({
                "username": "leo",
                "password": "correct-horse-battery",
                "next": "//evil.example.org/",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(location(&response), "/");
}

#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "leo").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({ "username": "leo", "password": "not-it-at-all" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_closes_the_session() {
    let app = test::init_service(test_app(fixture_state())).await;
    let cookie = signup_and_get_cookie(&app, "leo").await;

    let logout = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::FOUND);
    let cleared = logout
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie reset")
        .into_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .cookie(cleared)
            .set_json(json!({ "text": "after logout" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=/create/");
}

#[actix_web::test]
async fn owner_updates_their_profile() {
    let app = test::init_service(test_app(fixture_state())).await;
    let cookie = signup_and_get_cookie(&app, "leo").await;
    let payload = base64::engine::general_purpose::STANDARD.encode(GIF);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/leo/edit/")
            .cookie(cookie)
            .set_json(json!({ "email": "new@example.org", "avatar": payload }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile/leo/");
}

#[actix_web::test]
async fn editing_another_users_profile_is_forbidden() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "owner").await;
    let cookie = signup_and_get_cookie(&app, "mallory").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/owner/edit/")
            .cookie(cookie)
            .set_json(json!({ "email": "stolen@example.org" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unauthenticated_profile_edit_redirects_to_login() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "leo").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/leo/edit/")
            .set_json(json!({ "email": "new@example.org" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=/profile/leo/edit/");
}

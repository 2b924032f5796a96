//! Tests for the subscription handlers.

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{fixture_state, signup_and_get_cookie, test_app};

fn location(response: &actix_web::dev::ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
}

async fn feed_texts(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: actix_web::cookie::Cookie<'static>,
) -> Vec<String> {
    let response = test::call_service(
        app,
        test::TestRequest::get()
            .uri("/follow/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    body.get("items")
        .and_then(Value::as_array)
        .expect("items array")
        .iter()
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

#[actix_web::test]
async fn subscription_feed_requires_login() {
    let app = test::init_service(test_app(fixture_state())).await;
    let response =
        test::call_service(&app, test::TestRequest::get().uri("/follow/").to_request()).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=/follow/");
}

#[actix_web::test]
async fn followed_authors_posts_appear_newest_first() {
    let app = test::init_service(test_app(fixture_state())).await;
    let author = signup_and_get_cookie(&app, "writer").await;
    let noise = signup_and_get_cookie(&app, "stranger").await;
    let reader = signup_and_get_cookie(&app, "reader").await;

    for (cookie, text) in [
        (author.clone(), "early"),
        (noise, "noise"),
        (author, "late"),
    ] {
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/")
                .cookie(cookie)
                .set_json(json!({ "text": text }))
                .to_request(),
        )
        .await;
    }

    let follow = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/writer/follow/")
            .cookie(reader.clone())
            .to_request(),
    )
    .await;
    assert_eq!(follow.status(), StatusCode::FOUND);
    assert_eq!(location(&follow), "/profile/writer/");

    assert_eq!(feed_texts(&app, reader).await, vec!["late", "early"]);
}

#[actix_web::test]
async fn unfollowing_empties_the_feed() {
    let app = test::init_service(test_app(fixture_state())).await;
    let author = signup_and_get_cookie(&app, "writer").await;
    let reader = signup_and_get_cookie(&app, "reader").await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .cookie(author)
            .set_json(json!({ "text": "fleeting" }))
            .to_request(),
    )
    .await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/writer/follow/")
            .cookie(reader.clone())
            .to_request(),
    )
    .await;
    assert_eq!(feed_texts(&app, reader.clone()).await, vec!["fleeting"]);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/writer/unfollow/")
            .cookie(reader.clone())
            .to_request(),
    )
    .await;
    assert!(feed_texts(&app, reader).await.is_empty());
}

#[actix_web::test]
async fn self_follow_redirects_but_never_takes_effect() {
    let app = test::init_service(test_app(fixture_state())).await;
    let cookie = signup_and_get_cookie(&app, "narcissus").await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .cookie(cookie.clone())
            .set_json(json!({ "text": "reflection" }))
            .to_request(),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/narcissus/follow/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    assert!(feed_texts(&app, cookie).await.is_empty());
}

#[actix_web::test]
async fn following_an_unknown_author_is_a_404() {
    let app = test::init_service(test_app(fixture_state())).await;
    let cookie = signup_and_get_cookie(&app, "reader").await;
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/ghost/follow/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn profile_reports_the_follow_state() {
    let app = test::init_service(test_app(fixture_state())).await;
    signup_and_get_cookie(&app, "writer").await;
    let reader = signup_and_get_cookie(&app, "reader").await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/writer/follow/")
            .cookie(reader.clone())
            .to_request(),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/writer/")
            .cookie(reader)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("following"), Some(&Value::Bool(true)));
}

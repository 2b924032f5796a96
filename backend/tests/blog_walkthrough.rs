//! End-to-end walkthrough of the blogging flow over HTTP.
//!
//! Exercises signup, publishing, group and author feeds, comments, follows,
//! and editing through the same routing table the server runs.

mod support;

use std::sync::Arc;

use actix_web::test;
use backend::domain::ports::{GroupRepository, NoopFeedCache};
use backend::domain::{Group, GroupSlug};
use pagination::DEFAULT_PAGE_SIZE;
use uuid::Uuid;

use support::{app, backend_with_cache, get_json, item_texts, publish, signup};

async fn seed_group(backend: &support::TestBackend, title: &str, slug: &str) -> Uuid {
    let group = Group::new(title, GroupSlug::new(slug).expect("slug"), "a test community")
        .expect("valid group");
    let id = *group.id.as_uuid();
    backend.groups.create(&group).await.expect("seed group");
    id
}

#[actix_web::test]
async fn publishing_commenting_and_following_round_trip() {
    let backend = backend_with_cache(Arc::new(NoopFeedCache), DEFAULT_PAGE_SIZE);
    let rust_group = seed_group(&backend, "Rustaceans", "rust").await;
    let app = test::init_service(app(backend.state.clone())).await;

    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    publish(&app, &alice, "hello from alice", Some(rust_group)).await;
    publish(&app, &bob, "hello from bob", None).await;

    // Global feed lists both posts, newest first, with authors resolved.
    let global = get_json(&app, "/", None).await;
    assert_eq!(
        item_texts(&global),
        vec!["hello from bob", "hello from alice"]
    );
    assert_eq!(global["items"][1]["author"], "alice");
    assert_eq!(global["items"][1]["group"]["slug"], "rust");
    assert_eq!(global["totalItems"], 2);

    // The group feed carries the header and only the grouped post.
    let group_feed = get_json(&app, "/group/rust/", None).await;
    assert_eq!(group_feed["title"], "Rustaceans");
    assert_eq!(item_texts(&group_feed["page"]), vec!["hello from alice"]);

    // Bob comments on alice's post.
    let alice_post = global["items"][1]["id"].as_str().expect("post id").to_owned();
    let comment = test::TestRequest::post()
        .uri(&format!("/posts/{alice_post}/comment/"))
        .cookie(bob.clone())
        .set_json(serde_json::json!({ "text": "nice one" }))
        .to_request();
    let response = test::call_service(&app, comment).await;
    assert!(response.status().is_redirection());

    let detail = get_json(&app, &format!("/posts/{alice_post}/"), Some(&bob)).await;
    assert_eq!(detail["comments"][0]["text"], "nice one");
    assert_eq!(detail["comments"][0]["author"], "bob");
    assert_eq!(detail["owner"], false);
    let detail_for_alice = get_json(&app, &format!("/posts/{alice_post}/"), Some(&alice)).await;
    assert_eq!(detail_for_alice["owner"], true);

    // Bob follows alice; the subscription feed lists her post only.
    let follow = test::TestRequest::post()
        .uri("/profile/alice/follow/")
        .cookie(bob.clone())
        .to_request();
    let response = test::call_service(&app, follow).await;
    assert!(response.status().is_redirection());

    let subscriptions = get_json(&app, "/follow/", Some(&bob)).await;
    assert_eq!(item_texts(&subscriptions), vec!["hello from alice"]);

    let profile = get_json(&app, "/profile/alice/", Some(&bob)).await;
    assert_eq!(profile["following"], true);
    assert_eq!(profile["postCount"], 1);

    // Alice edits her post; everyone sees the new text.
    let edit = test::TestRequest::post()
        .uri(&format!("/posts/{alice_post}/edit/"))
        .cookie(alice.clone())
        .set_json(serde_json::json!({ "text": "hello again", "group": rust_group }))
        .to_request();
    let response = test::call_service(&app, edit).await;
    assert!(response.status().is_redirection());

    let detail = get_json(&app, &format!("/posts/{alice_post}/"), Some(&bob)).await;
    assert_eq!(detail["post"]["text"], "hello again");
}

#[actix_web::test]
async fn unauthenticated_writes_bounce_to_login() {
    let backend = backend_with_cache(Arc::new(NoopFeedCache), DEFAULT_PAGE_SIZE);
    let app = test::init_service(app(backend.state.clone())).await;

    let request = test::TestRequest::post()
        .uri("/create/")
        .set_json(serde_json::json!({ "text": "anonymous" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::FOUND);
    let location = response
        .headers()
        .get(actix_web::http::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location");
    assert_eq!(location, "/auth/login/?next=/create/");

    let global = get_json(&app, "/", None).await;
    assert_eq!(global["totalItems"], 0);
}

#[actix_web::test]
async fn feeds_paginate_at_the_configured_size() {
    let backend = backend_with_cache(Arc::new(NoopFeedCache), 3);
    let app = test::init_service(app(backend.state.clone())).await;

    let alice = signup(&app, "alice").await;
    for n in 1..=7 {
        publish(&app, &alice, &format!("post {n}"), None).await;
    }

    let first = get_json(&app, "/", None).await;
    assert_eq!(item_texts(&first), vec!["post 7", "post 6", "post 5"]);
    assert_eq!(first["totalPages"], 3);

    // Requests beyond the last page clamp instead of failing.
    let beyond = get_json(&app, "/?page=99", None).await;
    assert_eq!(beyond["number"], 3);
    assert_eq!(item_texts(&beyond), vec!["post 1"]);

    let junk = get_json(&app, "/?page=banana", None).await;
    assert_eq!(junk["number"], 1);
}

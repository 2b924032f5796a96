//! Subscription handlers.
//!
//! ```text
//! GET  /follow/                        Posts by followed authors
//! POST /profile/{username}/follow/     Subscribe to an author
//! POST /profile/{username}/unfollow/   Unsubscribe from an author
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, Username};
use crate::inbound::http::posts::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, login_redirect, redirect};

fn parse_username(raw: String) -> ApiResult<Username> {
    Username::new(raw).map_err(|_| Error::not_found("user not found"))
}

/// Posts authored by anyone the requester follows, newest first.
#[get("/follow/")]
pub async fn subscription_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.user_id()? else {
        return Ok(login_redirect("/follow/"));
    };
    let page = state
        .feeds
        .subscriptions(viewer, pagination::PageNumber::parse(query.page.as_deref()))
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Subscribe and land back on the author's profile.
#[post("/profile/{username}/follow/")]
pub async fn follow_author(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let Some(follower) = session.user_id()? else {
        return Ok(login_redirect(&format!("/profile/{raw}/follow/")));
    };
    let username = parse_username(raw)?;
    let author = state.follows.follow(follower, &username).await?;
    Ok(redirect(format!("/profile/{}/", author.username.as_ref())))
}

/// Unsubscribe and land back on the author's profile.
#[post("/profile/{username}/unfollow/")]
pub async fn unfollow_author(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let Some(follower) = session.user_id()? else {
        return Ok(login_redirect(&format!("/profile/{raw}/unfollow/")));
    };
    let username = parse_username(raw)?;
    let author = state.follows.unfollow(follower, &username).await?;
    Ok(redirect(format!("/profile/{}/", author.username.as_ref())))
}

#[cfg(test)]
#[path = "follows_tests.rs"]
mod tests;

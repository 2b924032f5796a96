//! Feed and post handlers.
//!
//! ```text
//! GET  /                      Global feed, cached per page
//! GET  /group/{slug}/         Group feed
//! GET  /profile/{username}/   Author feed
//! GET  /posts/{id}/           Post detail with comments
//! POST /create/               Publish a post
//! POST /posts/{id}/edit/      Edit a post (author only)
//! POST /posts/{id}/comment/   Append a comment
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use pagination::PageNumber;

use crate::domain::image::ImageValidationError;
use crate::domain::post::PostValidationError;
use crate::domain::{Error, ErrorCode, GroupId, GroupSlug, ImageData, PostDraft, PostId, PostText, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, login_redirect, redirect};

/// Page selector accepted by every feed endpoint.
///
/// Kept as a raw string so malformed values clamp to the first page instead
/// of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Requested 1-indexed page.
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    fn number(&self) -> PageNumber {
        PageNumber::parse(self.page.as_deref())
    }
}

/// Post submission body, shared by create and edit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    /// Body text.
    pub text: String,
    /// Optional group to publish into.
    #[serde(default)]
    pub group: Option<Uuid>,
    /// Optional base64-encoded image payload.
    #[serde(default)]
    pub image: Option<String>,
}

/// Comment submission body.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    /// Body text.
    pub text: String,
}

fn map_text_error(error: PostValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "text", "code": "invalid" }))
}

fn map_image_error(error: ImageValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "image", "code": "invalid" }))
}

fn draft_from(form: PostForm) -> ApiResult<PostDraft> {
    let text = PostText::new(form.text).map_err(map_text_error)?;
    let image = form
        .image
        .as_deref()
        .map(ImageData::from_base64)
        .transpose()
        .map_err(map_image_error)?;
    Ok(PostDraft {
        text,
        group: form.group.map(GroupId::from_uuid),
        image,
    })
}

/// Global feed. Slug and username feeds resolve on every request; this page
/// is the only one served through the cache.
#[get("/")]
pub async fn index(state: web::Data<HttpState>, query: web::Query<PageQuery>) -> ApiResult<HttpResponse> {
    let feed = state.feeds.global(query.number()).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// Posts in one group. An unknown or malformed slug is a 404.
#[get("/group/{slug}/")]
pub async fn group_feed(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let slug = GroupSlug::new(path.into_inner())
        .map_err(|_| Error::not_found("group not found"))?;
    let feed = state.feeds.group(&slug, query.number()).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// An author's posts with profile context.
#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let username =
        Username::new(path.into_inner()).map_err(|_| Error::not_found("user not found"))?;
    let viewer = session.user_id()?;
    let feed = state.feeds.author(&username, query.number(), viewer).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// One post with its comments.
#[get("/posts/{id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let viewer = session.user_id()?;
    let detail = state
        .feeds
        .post_detail(PostId::from_uuid(path.into_inner()), viewer)
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Publish a post and land on the author's profile.
#[post("/create/")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Json<PostForm>,
) -> ApiResult<HttpResponse> {
    let Some(author) = session.user_id()? else {
        return Ok(login_redirect("/create/"));
    };
    let draft = draft_from(form.into_inner())?;
    state.posts.create(author, draft).await?;
    let target = match session.username()? {
        Some(name) => format!("/profile/{}/", name.as_ref()),
        None => "/".to_owned(),
    };
    Ok(redirect(target))
}

/// Edit a post in place and land back on its detail page.
///
/// A non-author is bounced to the detail page unchanged, mirroring the
/// guard-and-redirect flow of the original site.
#[post("/posts/{id}/edit/")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    form: web::Json<PostForm>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let Some(actor) = session.user_id()? else {
        return Ok(login_redirect(&format!("/posts/{id}/edit/")));
    };
    let draft = draft_from(form.into_inner())?;
    match state
        .posts
        .edit(PostId::from_uuid(id), actor, draft)
        .await
    {
        Ok(_) => Ok(redirect(format!("/posts/{id}/"))),
        Err(error) if error.code() == ErrorCode::Forbidden => {
            Ok(redirect(format!("/posts/{id}/")))
        }
        Err(error) => Err(error),
    }
}

/// Append a comment and land back on the post.
#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    form: web::Json<CommentForm>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let Some(author) = session.user_id()? else {
        return Ok(login_redirect(&format!("/posts/{id}/comment/")));
    };
    let text = crate::domain::CommentText::new(form.into_inner().text).map_err(|error| {
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "text", "code": "invalid" }))
    })?;
    state
        .comments
        .add(PostId::from_uuid(id), author, text)
        .await?;
    Ok(redirect(format!("/posts/{id}/")))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;

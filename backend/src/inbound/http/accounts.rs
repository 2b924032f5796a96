//! Account handlers.
//!
//! ```text
//! POST /auth/signup/               Register and log in
//! POST /auth/login/                Open a session
//! POST /auth/logout/               Close the session
//! POST /profile/{username}/edit/   Update the profile (owner only)
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::image::ImageValidationError;
use crate::domain::user::UserValidationError;
use crate::domain::{Email, Error, ImageData, ProfileUpdate, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, login_redirect, redirect};

/// Registration body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Requested username.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Cleartext password, hashed before storage.
    pub password: String,
}

/// Login body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Account username.
    pub username: String,
    /// Cleartext password.
    pub password: String,
    /// Path to land on after login; defaults to the global feed.
    #[serde(default)]
    pub next: Option<String>,
}

/// Profile update body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Replacement contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Replacement avatar as a base64 payload.
    #[serde(default)]
    pub avatar: Option<String>,
}

fn field_error(field: &str, error: &UserValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "invalid" }))
}

fn map_avatar_error(error: ImageValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "avatar", "code": "invalid" }))
}

/// Register a new account, open a session for it, and land on the feed.
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Json<SignupForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let username =
        Username::new(form.username).map_err(|error| field_error("username", &error))?;
    let email = Email::new(form.email).map_err(|error| field_error("email", &error))?;
    let user = state
        .accounts
        .register(username, email, &form.password)
        .await?;
    session.persist_user(user.id, &user.username)?;
    Ok(redirect("/"))
}

/// Open a session and land on `next` or the feed.
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Json<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let username = Username::new(form.username)
        .map_err(|_| Error::unauthorized("invalid username or password"))?;
    let user_id = state.accounts.login(&username, &form.password).await?;
    session.persist_user(user_id, &username)?;
    // Only same-site paths are honoured; anything else falls back to the feed.
    let target = match form.next.as_deref() {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_owned(),
        _ => "/".to_owned(),
    };
    Ok(redirect(target))
}

/// Close the session and land on the feed.
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(redirect("/"))
}

/// Update the profile owned by `username` and land back on it.
#[post("/profile/{username}/edit/")]
pub async fn edit_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Json<ProfileForm>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let Some(actor) = session.user_id()? else {
        return Ok(login_redirect(&format!("/profile/{raw}/edit/")));
    };
    let username = Username::new(raw).map_err(|_| Error::not_found("user not found"))?;
    let form = form.into_inner();
    let update = ProfileUpdate {
        email: form
            .email
            .map(Email::new)
            .transpose()
            .map_err(|error| field_error("email", &error))?,
        avatar: form
            .avatar
            .as_deref()
            .map(ImageData::from_base64)
            .transpose()
            .map_err(map_avatar_error)?,
    };
    state.accounts.update_profile(actor, &username, update).await?;
    Ok(redirect(format!("/profile/{}/", username.as_ref())))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;

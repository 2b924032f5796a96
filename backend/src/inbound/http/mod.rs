//! HTTP inbound adapter exposing the blogging endpoints.
//!
//! Mutating endpoints answer with `302 Found` redirects rather than entity
//! bodies, keeping the navigation flow of a classic server-rendered blog:
//! publishing lands on the author's profile, commenting lands back on the
//! post, and unauthenticated writes bounce to the login form with a `next`
//! parameter.

pub mod accounts;
pub mod admin;
pub mod error;
pub mod follows;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};

/// A `302 Found` redirect to `location`.
pub(crate) fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

/// Redirect an unauthenticated request to the login form, preserving the
/// originally requested path.
pub(crate) fn login_redirect(next: &str) -> HttpResponse {
    redirect(format!("/auth/login/?next={next}"))
}

/// Fallback handler answering any unrouted path with a JSON 404.
pub async fn not_found(request: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "code": "not_found",
        "message": format!("no route for {}", request.path()),
    }))
}

/// Register every application route on a service config.
///
/// Shared by the server bootstrap and the integration tests so both run the
/// same routing table.
pub fn configure_routes(config: &mut web::ServiceConfig) {
    config
        .service(posts::index)
        .service(posts::group_feed)
        .service(posts::profile)
        .service(posts::post_detail)
        .service(posts::create_post)
        .service(posts::edit_post)
        .service(posts::add_comment)
        .service(follows::subscription_feed)
        .service(follows::follow_author)
        .service(follows::unfollow_author)
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::edit_profile)
        .service(admin::invalidate_cache)
        .default_service(web::route().to(not_found));
}

//! Operational endpoints kept off the public navigation flow.

use actix_web::{HttpResponse, post, web};
use tracing::info;

use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Drop every cached feed page so the next read renders fresh data.
///
/// Requires a session; the cache never holds per-user data, so any
/// authenticated account may flush it.
#[post("/internal/cache/invalidate/")]
pub async fn invalidate_cache(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.cache.invalidate().await;
    info!(%actor, "feed cache invalidated");
    Ok(HttpResponse::NoContent().finish())
}

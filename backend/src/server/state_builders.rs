//! Builders for the HTTP state and its port implementations.

use std::io;
use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    CommentRepository, FixtureCommentRepository, FixtureFollowRepository, FixtureGroupRepository,
    FixturePostRepository, FixtureUserRepository, FollowRepository, GroupRepository,
    PostRepository, UserRepository,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::cache::MemoryFeedCache;
use backend::outbound::persistence::{
    DieselCommentRepository, DieselFollowRepository, DieselGroupRepository, DieselPostRepository,
    DieselUserRepository,
};
use backend::outbound::storage::DirImageStore;

use super::ServerConfig;

/// Repository set selected from the configuration.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

/// Select PostgreSQL-backed repositories when a pool is configured, falling
/// back to the in-memory fixtures otherwise.
fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            groups: Arc::new(DieselGroupRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            follows: Arc::new(DieselFollowRepository::new(pool.clone())),
        },
        None => Repositories {
            users: Arc::new(FixtureUserRepository::new()),
            posts: Arc::new(FixturePostRepository::new()),
            groups: Arc::new(FixtureGroupRepository::new()),
            comments: Arc::new(FixtureCommentRepository::new()),
            follows: Arc::new(FixtureFollowRepository::new()),
        },
    }
}

/// Build the shared HTTP state from the configured ports.
///
/// # Errors
///
/// Returns [`io::Error`] when the media root cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let Repositories {
        users,
        posts,
        groups,
        comments,
        follows,
    } = build_repositories(config);
    let images = DirImageStore::open(&config.media_root)
        .map_err(|err| io::Error::other(format!("failed to open media root: {err}")))?;

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        users,
        posts,
        groups,
        comments,
        follows,
        images: Arc::new(images),
        cache: Arc::new(MemoryFeedCache::with_ttl(config.cache_ttl)),
        page_size: config.page_size,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use pagination::PageNumber;

    fn fixture_config(media_root: std::path::PathBuf) -> ServerConfig {
        let bind_addr = "127.0.0.1:0".parse().expect("loopback addr");
        ServerConfig::new(Key::generate(), false, SameSite::Lax, bind_addr, media_root)
    }

    #[tokio::test]
    async fn fixture_state_serves_an_empty_global_feed() {
        let media = tempfile::tempdir().expect("tempdir");
        let config = fixture_config(media.path().to_path_buf());

        let state = build_http_state(&config).expect("state");
        let feed = state.feeds.global(PageNumber::FIRST).await.expect("feed");
        assert_eq!(feed["totalItems"], 0);
    }

    #[tokio::test]
    async fn missing_media_parent_is_created() {
        let media = tempfile::tempdir().expect("tempdir");
        let nested = media.path().join("var/media");
        let config = fixture_config(nested.clone());

        build_http_state(&config).expect("state");
        assert!(nested.is_dir());
    }
}

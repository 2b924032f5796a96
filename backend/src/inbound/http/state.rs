//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CommentRepository, FeedCache, FollowRepository, GroupRepository, ImageStore, PostRepository,
    UserRepository,
};
use crate::domain::{
    AccountService, CommentService, FeedService, FollowService, PostService,
};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub images: Arc<dyn ImageStore>,
    pub cache: Arc<dyn FeedCache>,
    /// Items per feed page.
    pub page_size: u64,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub feeds: FeedService,
    pub accounts: AccountService,
    pub cache: Arc<dyn FeedCache>,
}

impl HttpState {
    /// Wire the use-case services from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            posts,
            groups,
            comments,
            follows,
            images,
            cache,
            page_size,
        } = ports;
        Self {
            posts: PostService::new(posts.clone(), groups.clone(), images.clone()),
            comments: CommentService::new(posts.clone(), comments.clone()),
            follows: FollowService::new(users.clone(), follows.clone()),
            feeds: FeedService::new(
                posts,
                comments,
                groups,
                users.clone(),
                follows,
                cache.clone(),
                page_size,
            ),
            accounts: AccountService::new(users, images),
            cache,
        }
    }
}

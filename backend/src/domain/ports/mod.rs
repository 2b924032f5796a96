//! Domain ports and their in-memory fixture adapters.
//!
//! Each port is an `async_trait` boundary the outbound adapters implement.
//! The `Fixture*` types are stateful in-memory stands-ins used by tests and
//! by the server when no database pool is configured.

mod comment_repository;
mod feed_cache;
mod follow_repository;
mod group_repository;
mod image_store;
mod post_repository;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{
    CommentRepository, CommentRepositoryError, FixtureCommentRepository,
};
#[cfg(test)]
pub use feed_cache::MockFeedCache;
pub use feed_cache::{FeedCache, NoopFeedCache};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FixtureFollowRepository, FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{FixtureGroupRepository, GroupRepository, GroupRepositoryError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError, MediaKind};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{
    FeedQuery, FixturePostRepository, PostRepository, PostRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};

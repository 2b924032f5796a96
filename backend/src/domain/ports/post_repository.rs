//! Port for post persistence and feed queries.
//!
//! Feeds are always ordered newest first; the repository applies the filter
//! and window, the caller handles page clamping.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::group::GroupId;
use crate::domain::post::{Post, PostId};
use crate::domain::user::UserId;

/// Filter selecting which posts a feed query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    /// Every post.
    Global,
    /// Posts belonging to one group.
    Group(GroupId),
    /// Posts written by one author.
    Author(UserId),
    /// Posts written by any of the given authors (subscription feed).
    AuthoredByAny(Vec<UserId>),
}

/// Errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostRepositoryError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl PostRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for post storage and feed retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Overwrite an existing post's mutable fields.
    ///
    /// `published_at` is immutable; adapters must not touch it.
    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Count the posts matching a feed filter.
    async fn count(&self, query: &FeedQuery) -> Result<u64, PostRepositoryError>;

    /// List matching posts, newest first, within the given window.
    async fn list(
        &self,
        query: &FeedQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError>;
}

/// Stateful in-memory adapter used by tests and the database-less server.
#[derive(Debug, Default)]
pub struct FixturePostRepository {
    posts: Mutex<Vec<Post>>,
}

impl FixturePostRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Post>> {
        self.posts.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn matches(query: &FeedQuery, post: &Post) -> bool {
        match query {
            FeedQuery::Global => true,
            FeedQuery::Group(group) => post.group.as_ref() == Some(group),
            FeedQuery::Author(author) => &post.author == author,
            FeedQuery::AuthoredByAny(authors) => authors.contains(&post.author),
        }
    }

    fn ordered(&self, query: &FeedQuery) -> Vec<Post> {
        let posts = self.lock();
        // Reverse insertion order first so a stable sort keeps the newest
        // insertion ahead when timestamps collide.
        let mut selected: Vec<Post> = posts
            .iter()
            .rev()
            .filter(|post| Self::matches(query, post))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        selected
    }
}

#[async_trait]
impl PostRepository for FixturePostRepository {
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.lock().push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut posts = self.lock();
        match posts.iter_mut().find(|stored| stored.id == post.id) {
            Some(stored) => {
                let published_at = stored.published_at;
                *stored = post.clone();
                stored.published_at = published_at;
                Ok(())
            }
            None => Err(PostRepositoryError::query("post not found")),
        }
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.lock().iter().find(|post| &post.id == id).cloned())
    }

    async fn count(&self, query: &FeedQuery) -> Result<u64, PostRepositoryError> {
        Ok(self
            .lock()
            .iter()
            .filter(|post| Self::matches(query, post))
            .count() as u64)
    }

    async fn list(
        &self,
        query: &FeedQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        Ok(self
            .ordered(query)
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }
}

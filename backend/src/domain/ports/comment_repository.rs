//! Port for comment persistence.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::post::PostId;

/// Errors raised by comment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentRepositoryError {
    /// Repository connection could not be established.
    #[error("comment repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("comment repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl CommentRepositoryError {
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

/// Port for comment storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment.
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// List a post's comments, oldest first.
    async fn list_for_post(&self, post: &PostId)
    -> Result<Vec<Comment>, CommentRepositoryError>;
}

/// Stateful in-memory adapter used by tests and the database-less server.
#[derive(Debug, Default)]
pub struct FixtureCommentRepository {
    comments: Mutex<Vec<Comment>>,
}

impl FixtureCommentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Comment>> {
        self.comments.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        self.lock().push(comment.clone());
        Ok(())
    }

    async fn list_for_post(
        &self,
        post: &PostId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        // Insertion order already matches creation order; a stable sort on
        // the timestamp keeps it for equal stamps.
        let mut comments: Vec<Comment> = self
            .lock()
            .iter()
            .filter(|comment| &comment.post == post)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

//! Comment authoring use case.

use std::sync::Arc;

use tracing::info;

use crate::domain::comment::{Comment, CommentText};
use crate::domain::error::Error;
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, PostRepository, PostRepositoryError,
};
use crate::domain::post::PostId;
use crate::domain::user::UserId;

/// Service appending comments to existing posts.
#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

impl CommentService {
    /// Create a new service over the given adapters.
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Append a comment to an existing post.
    pub async fn add(
        &self,
        post_id: PostId,
        author: UserId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        let post = self
            .posts
            .find_by_id(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("post not found"))?;

        let comment = Comment::new(post.id, author, text);
        self.comments
            .create(&comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, post_id = %post.id, "comment added");
        Ok(comment)
    }
}

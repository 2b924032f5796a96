//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::comment::{Comment, CommentId, CommentText};
use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::post::PostId;
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::CommentRow;
use super::pool::DbPool;
use super::schema::comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    Ok(Comment {
        id: CommentId::from_uuid(row.id),
        post: PostId::from_uuid(row.post_id),
        author: UserId::from_uuid(row.author_id),
        text: CommentText::new(row.text).map_err(|error| {
            CommentRepositoryError::query(format!("corrupt comment text: {error}"))
        })?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, CommentRepositoryError::connection))?;

        diesel::insert_into(comments::table)
            .values(CommentRow {
                id: *comment.id.as_uuid(),
                post_id: *comment.post.as_uuid(),
                author_id: *comment.author.as_uuid(),
                text: comment.text.as_ref().to_owned(),
                created_at: comment.created_at,
            })
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn list_for_post(
        &self,
        post: &PostId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, CommentRepositoryError::connection))?;

        let rows = comments::table
            .filter(comments::post_id.eq(post.as_uuid()))
            .order(comments::created_at.asc())
            .select(CommentRow::as_select())
            .load::<CommentRow>(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }
}

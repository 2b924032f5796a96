//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::group::GroupId;
use crate::domain::image::ImageRef;
use crate::domain::ports::{FeedQuery, PostRepository, PostRepositoryError};
use crate::domain::post::{Post, PostId, PostText};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::DbPool;
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    Ok(Post {
        id: PostId::from_uuid(row.id),
        text: PostText::new(row.text)
            .map_err(|error| PostRepositoryError::query(format!("corrupt post text: {error}")))?,
        published_at: row.published_at,
        author: UserId::from_uuid(row.author_id),
        group: row.group_id.map(GroupId::from_uuid),
        image: row.image.map(ImageRef::new),
    })
}

/// Apply a feed filter to a boxed posts query.
fn filtered(query: &FeedQuery) -> posts::BoxedQuery<'static, Pg> {
    let base = posts::table.into_boxed();
    match query {
        FeedQuery::Global => base,
        FeedQuery::Group(group) => base.filter(posts::group_id.eq(Some(*group.as_uuid()))),
        FeedQuery::Author(author) => base.filter(posts::author_id.eq(*author.as_uuid())),
        FeedQuery::AuthoredByAny(authors) => {
            let ids: Vec<Uuid> = authors.iter().map(|id| *id.as_uuid()).collect();
            base.filter(posts::author_id.eq_any(ids))
        }
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, PostRepositoryError::connection))?;

        diesel::insert_into(posts::table)
            .values(NewPostRow {
                id: *post.id.as_uuid(),
                text: post.text.as_ref(),
                published_at: post.published_at,
                author_id: *post.author.as_uuid(),
                group_id: post.group.map(|g| *g.as_uuid()),
                image: post.image.as_ref().map(AsRef::as_ref),
            })
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, PostRepositoryError::connection))?;

        let updated = diesel::update(posts::table.filter(posts::id.eq(post.id.as_uuid())))
            .set(PostUpdate {
                text: post.text.as_ref(),
                group_id: post.group.map(|g| *g.as_uuid()),
                image: post.image.as_ref().map(AsRef::as_ref),
            })
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        if updated == 0 {
            return Err(PostRepositoryError::query("post not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, PostRepositoryError::connection))?;

        let row = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_post).transpose()
    }

    async fn count(&self, query: &FeedQuery) -> Result<u64, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, PostRepositoryError::connection))?;

        let total = filtered(query)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list(
        &self,
        query: &FeedQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, PostRepositoryError::connection))?;

        let rows = filtered(query)
            .order((posts::published_at.desc(), posts::id.desc()))
            .offset(i64::try_from(offset).unwrap_or(i64::MAX))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(PostRow::as_select())
            .load::<PostRow>(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_post).collect()
    }
}

//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.
//!
//! The table carries the integrity rules: a composite primary key makes the
//! pair unique and a check constraint rejects self-follows. Both surface as
//! [`FollowRepositoryError::IntegrityViolation`] naming the constraint.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::follow::Follow;
use crate::domain::ports::{FollowRepository, FollowRepositoryError};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error, violated_constraint};
use super::models::FollowRow;
use super::pool::DbPool;
use super::schema::follows;

/// Diesel-backed implementation of the `FollowRepository` port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> FollowRepositoryError {
    map_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert(&self, follow: &Follow) -> Result<(), FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, FollowRepositoryError::connection))?;

        diesel::insert_into(follows::table)
            .values(FollowRow {
                follower_id: *follow.follower.as_uuid(),
                author_id: *follow.author.as_uuid(),
            })
            .execute(&mut conn)
            .await
            .map_err(|error| match violated_constraint(&error) {
                Some(constraint) => FollowRepositoryError::integrity_violation(constraint),
                None => map_error(error),
            })?;
        Ok(())
    }

    async fn delete(
        &self,
        follower: &UserId,
        author: &UserId,
    ) -> Result<(), FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, FollowRepositoryError::connection))?;

        diesel::delete(
            follows::table.filter(
                follows::follower_id
                    .eq(follower.as_uuid())
                    .and(follows::author_id.eq(author.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        Ok(())
    }

    async fn exists(
        &self,
        follower: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, FollowRepositoryError::connection))?;

        diesel::select(exists(
            follows::table.filter(
                follows::follower_id
                    .eq(follower.as_uuid())
                    .and(follows::author_id.eq(author.as_uuid())),
            ),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_error)
    }

    async fn followed_authors(
        &self,
        follower: &UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, FollowRepositoryError::connection))?;

        let ids = follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .select(follows::author_id)
            .load::<Uuid>(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}

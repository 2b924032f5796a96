//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::group::{Group, GroupId, GroupSlug};
use crate::domain::ports::{GroupRepository, GroupRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error, violated_constraint};
use super::models::GroupRow;
use super::pool::DbPool;
use super::schema::groups;

const SLUG_UNIQUE: &str = "groups_slug_key";

/// Diesel-backed implementation of the `GroupRepository` port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> GroupRepositoryError {
    map_diesel_error(
        error,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

fn row_to_group(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    Ok(Group {
        id: GroupId::from_uuid(row.id),
        title: row.title,
        slug: GroupSlug::new(row.slug)
            .map_err(|error| GroupRepositoryError::query(format!("corrupt slug: {error}")))?,
        description: row.description,
    })
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, GroupRepositoryError::connection))?;

        diesel::insert_into(groups::table)
            .values(GroupRow {
                id: *group.id.as_uuid(),
                title: group.title.clone(),
                slug: group.slug.as_ref().to_owned(),
                description: group.description.clone(),
            })
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if violated_constraint(&error).as_deref() == Some(SLUG_UNIQUE) {
                    GroupRepositoryError::duplicate_slug(group.slug.as_ref())
                } else {
                    map_error(error)
                }
            })?;
        Ok(())
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, GroupRepositoryError::connection))?;

        let row = groups::table
            .filter(groups::slug.eq(slug.as_ref()))
            .select(GroupRow::as_select())
            .first::<GroupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_group).transpose()
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, GroupRepositoryError::connection))?;

        let row = groups::table
            .filter(groups::id.eq(id.as_uuid()))
            .select(GroupRow::as_select())
            .first::<GroupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_group).transpose()
    }
}

//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account creation inserts the user row and its empty profile row in one
//! transaction, so a half-created account can never be observed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::auth::PasswordHash;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{Email, Profile, User, UserId, Username};
use crate::domain::ImageRef;

use super::error_mapping::{map_diesel_error, map_pool_error, violated_constraint};
use super::models::{NewUserRow, ProfileRow, UserRow};
use super::pool::DbPool;
use super::schema::{profiles, users};

const USERNAME_UNIQUE: &str = "users_username_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    Ok(User {
        id: UserId::from_uuid(row.id),
        username: Username::new(row.username)
            .map_err(|error| UserRepositoryError::query(format!("corrupt username: {error}")))?,
        email: Email::new(row.email)
            .map_err(|error| UserRepositoryError::query(format!("corrupt email: {error}")))?,
        joined_at: row.joined_at,
    })
}

fn row_to_profile(row: ProfileRow) -> Profile {
    Profile {
        user_id: UserId::from_uuid(row.user_id),
        avatar: row.avatar.map(ImageRef::new),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let user_row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_salt: password.salt(),
            password_digest: password.digest(),
            joined_at: user.joined_at,
        };
        let profile_row = ProfileRow {
            user_id: *user.id.as_uuid(),
            avatar: None,
        };

        let result = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::insert_into(users::table)
                        .values(&user_row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(profiles::table)
                        .values(&profile_row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|error| {
            if violated_constraint(&error).as_deref() == Some(USERNAME_UNIQUE) {
                UserRepositoryError::duplicate_username(user.username.as_ref())
            } else {
                map_error(error)
            }
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(UserId, PasswordHash)>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select((users::id, users::password_salt, users::password_digest))
            .first::<(uuid::Uuid, String, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(|(id, salt, digest)| {
            (UserId::from_uuid(id), PasswordHash::from_parts(salt, digest))
        }))
    }

    async fn update_account(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let updated = diesel::update(users::table.filter(users::id.eq(user.id.as_uuid())))
            .set(users::email.eq(user.email.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        if updated == 0 {
            return Err(UserRepositoryError::query("account not found"));
        }
        Ok(())
    }

    async fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let row = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first::<ProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, UserRepositoryError::connection))?;

        let avatar = profile.avatar.as_ref().map(|a| a.as_ref().to_owned());
        diesel::insert_into(profiles::table)
            .values(ProfileRow {
                user_id: *profile.user_id.as_uuid(),
                avatar: avatar.clone(),
            })
            .on_conflict(profiles::user_id)
            .do_update()
            .set(profiles::avatar.eq(avatar))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

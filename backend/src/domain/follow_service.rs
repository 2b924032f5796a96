//! Follow and unfollow use cases.
//!
//! The follow insert is attempted after an existence pre-check and storage
//! constraint violations (self-follow, racing duplicate) are logged and
//! swallowed, so the operation is idempotent and a self-follow never
//! persists nor crashes the request.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::error::Error;
use crate::domain::follow::Follow;
use crate::domain::ports::{
    FollowRepository, FollowRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserId, Username};

/// Service maintaining the directed follow relation.
#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { username } => {
            Error::internal(format!("unexpected duplicate username: {username}"))
        }
    }
}

fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowRepositoryError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
        FollowRepositoryError::IntegrityViolation { constraint } => {
            Error::internal(format!("unexpected integrity violation: {constraint}"))
        }
    }
}

impl FollowService {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Subscribe `follower` to the author named `author_name`.
    ///
    /// No-op when the pair already exists. A storage rejection (self-follow
    /// included) is logged and swallowed rather than surfaced.
    pub async fn follow(&self, follower: UserId, author_name: &Username) -> Result<User, Error> {
        let author = self.resolve_author(author_name).await?;
        let exists = self
            .follows
            .exists(&follower, &author.id)
            .await
            .map_err(map_follow_error)?;
        if exists {
            return Ok(author);
        }

        match self.follows.insert(&Follow::new(follower, author.id)).await {
            Ok(()) => {
                info!(%follower, author = %author.id, "follow created");
                Ok(author)
            }
            Err(FollowRepositoryError::IntegrityViolation { constraint }) => {
                error!(%follower, author = %author.id, %constraint, "follow insert rejected");
                Ok(author)
            }
            Err(other) => Err(map_follow_error(other)),
        }
    }

    /// Remove the subscription; no-op when the pair is absent.
    pub async fn unfollow(&self, follower: UserId, author_name: &Username) -> Result<User, Error> {
        let author = self.resolve_author(author_name).await?;
        let exists = self
            .follows
            .exists(&follower, &author.id)
            .await
            .map_err(map_follow_error)?;
        if exists {
            self.follows
                .delete(&follower, &author.id)
                .await
                .map_err(map_follow_error)?;
            info!(%follower, author = %author.id, "follow removed");
        }
        Ok(author)
    }

    /// Whether `viewer` currently follows `author`.
    pub async fn is_following(&self, viewer: &UserId, author: &UserId) -> Result<bool, Error> {
        self.follows
            .exists(viewer, author)
            .await
            .map_err(map_follow_error)
    }

    async fn resolve_author(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

//! Port for follow-pair persistence.
//!
//! Storage owns the integrity constraints: the (follower, author) pair is
//! unique and self-follow pairs are rejected at insert time. Callers decide
//! whether a rejection is surfaced or swallowed.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::follow::Follow;
use crate::domain::user::UserId;

/// Errors raised by follow repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowRepositoryError {
    /// Repository connection could not be established.
    #[error("follow repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("follow repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// A storage constraint rejected the mutation.
    #[error("follow integrity constraint violated: {constraint}")]
    IntegrityViolation {
        /// Name of the violated constraint.
        constraint: String,
    },
}

impl FollowRepositoryError {
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

    /// Create an integrity-violation error naming the constraint.
    pub fn integrity_violation(constraint: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            constraint: constraint.into(),
        }
    }
}

/// Port for follow-pair storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert a follow pair.
    ///
    /// Returns [`FollowRepositoryError::IntegrityViolation`] for self-follow
    /// pairs and for duplicates of an existing pair.
    async fn insert(&self, follow: &Follow) -> Result<(), FollowRepositoryError>;

    /// Delete a follow pair; succeeds even when the pair is absent.
    async fn delete(&self, follower: &UserId, author: &UserId)
    -> Result<(), FollowRepositoryError>;

    /// Whether the pair exists.
    async fn exists(
        &self,
        follower: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Authors the given user follows.
    async fn followed_authors(
        &self,
        follower: &UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError>;
}

/// Stateful in-memory adapter used by tests and the database-less server.
///
/// Mirrors the database constraints: a unique pair index and a
/// `follower <> author` check.
#[derive(Debug, Default)]
pub struct FixtureFollowRepository {
    pairs: Mutex<HashSet<(Uuid, Uuid)>>,
}

impl FixtureFollowRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<(Uuid, Uuid)>> {
        self.pairs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl FollowRepository for FixtureFollowRepository {
    async fn insert(&self, follow: &Follow) -> Result<(), FollowRepositoryError> {
        if follow.is_self_follow() {
            return Err(FollowRepositoryError::integrity_violation(
                "follows_no_self_follow",
            ));
        }
        let mut pairs = self.lock();
        if !pairs.insert((*follow.follower.as_uuid(), *follow.author.as_uuid())) {
            return Err(FollowRepositoryError::integrity_violation("follows_pkey"));
        }
        Ok(())
    }

    async fn delete(
        &self,
        follower: &UserId,
        author: &UserId,
    ) -> Result<(), FollowRepositoryError> {
        self.lock().remove(&(*follower.as_uuid(), *author.as_uuid()));
        Ok(())
    }

    async fn exists(
        &self,
        follower: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .lock()
            .contains(&(*follower.as_uuid(), *author.as_uuid())))
    }

    async fn followed_authors(
        &self,
        follower: &UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        Ok(self
            .lock()
            .iter()
            .filter(|(f, _)| f == follower.as_uuid())
            .map(|(_, a)| UserId::from_uuid(*a))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn self_follow_is_an_integrity_violation() {
        let repo = FixtureFollowRepository::new();
        let user = UserId::random();
        let err = repo
            .insert(&Follow::new(user, user))
            .await
            .expect_err("self follow rejected");
        assert!(matches!(err, FollowRepositoryError::IntegrityViolation { .. }));
        assert!(!repo.exists(&user, &user).await.expect("exists"));
    }

    #[tokio::test]
    async fn duplicate_pairs_are_rejected() {
        let repo = FixtureFollowRepository::new();
        let (follower, author) = (UserId::random(), UserId::random());
        repo.insert(&Follow::new(follower, author))
            .await
            .expect("first insert");
        let err = repo
            .insert(&Follow::new(follower, author))
            .await
            .expect_err("duplicate rejected");
        assert!(matches!(err, FollowRepositoryError::IntegrityViolation { .. }));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = FixtureFollowRepository::new();
        let (follower, author) = (UserId::random(), UserId::random());
        repo.insert(&Follow::new(follower, author))
            .await
            .expect("insert");
        repo.delete(&follower, &author).await.expect("delete");
        repo.delete(&follower, &author).await.expect("second delete");
        assert!(!repo.exists(&follower, &author).await.expect("exists"));
    }
}

//! Port for account and profile persistence.
//!
//! Creating an account persists the [`User`], its credentials, and an empty
//! [`Profile`] as one operation; there is no separate profile-creation step
//! for adapters to forget.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::auth::PasswordHash;
use crate::domain::user::{Profile, User, UserId, Username};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The username is already taken.
    #[error("username {username} is already taken")]
    DuplicateUsername {
        /// The conflicting username.
        username: String,
    },
}

impl UserRepositoryError {
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

    /// Create a duplicate-username error.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }
}

/// Port for account storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, their credentials, and an empty profile.
    async fn create_account(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the stored credentials for a username.
    async fn credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(UserId, PasswordHash)>, UserRepositoryError>;

    /// Update mutable account fields (email).
    async fn update_account(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch the profile owned by a user.
    async fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, UserRepositoryError>;

    /// Persist profile changes.
    async fn save_profile(&self, profile: &Profile) -> Result<(), UserRepositoryError>;
}

#[derive(Debug)]
struct Account {
    user: User,
    password: PasswordHash,
    profile: Profile,
}

/// Stateful in-memory adapter used by tests and the database-less server.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl FixtureUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Account>> {
        self.accounts.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create_account(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut accounts = self.lock();
        if accounts
            .values()
            .any(|account| account.user.username == user.username)
        {
            return Err(UserRepositoryError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        accounts.insert(
            *user.id.as_uuid(),
            Account {
                user: user.clone(),
                password: password.clone(),
                profile: Profile::empty(user.id),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().get(id.as_uuid()).map(|a| a.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()
            .values()
            .find(|a| &a.user.username == username)
            .map(|a| a.user.clone()))
    }

    async fn credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(UserId, PasswordHash)>, UserRepositoryError> {
        Ok(self
            .lock()
            .values()
            .find(|a| &a.user.username == username)
            .map(|a| (a.user.id, a.password.clone())))
    }

    async fn update_account(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut accounts = self.lock();
        match accounts.get_mut(user.id.as_uuid()) {
            Some(account) => {
                account.user = user.clone();
                Ok(())
            }
            None => Err(UserRepositoryError::query("account not found")),
        }
    }

    async fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, UserRepositoryError> {
        Ok(self
            .lock()
            .get(user_id.as_uuid())
            .map(|a| a.profile.clone()))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), UserRepositoryError> {
        let mut accounts = self.lock();
        match accounts.get_mut(profile.user_id.as_uuid()) {
            Some(account) => {
                account.profile = profile.clone();
                Ok(())
            }
            None => Err(UserRepositoryError::query("account not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Email;

    fn sample_user(name: &str) -> User {
        User::new(
            Username::new(name).expect("username"),
            Email::new(format!("{name}@example.org")).expect("email"),
        )
    }

    #[tokio::test]
    async fn creating_an_account_also_creates_an_empty_profile() {
        let repo = FixtureUserRepository::new();
        let user = sample_user("leo");
        repo.create_account(&user, &PasswordHash::derive("secret"))
            .await
            .expect("create account");

        let profile = repo
            .profile(&user.id)
            .await
            .expect("profile lookup")
            .expect("profile exists");
        assert_eq!(profile.user_id, user.id);
        assert!(profile.avatar.is_none());
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repo = FixtureUserRepository::new();
        repo.create_account(&sample_user("leo"), &PasswordHash::derive("a"))
            .await
            .expect("first account");
        let err = repo
            .create_account(&sample_user("leo"), &PasswordHash::derive("b"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserRepositoryError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn credentials_round_trip() {
        let repo = FixtureUserRepository::new();
        let user = sample_user("leo");
        repo.create_account(&user, &PasswordHash::derive("secret"))
            .await
            .expect("create account");

        let (id, hash) = repo
            .credentials(&user.username)
            .await
            .expect("lookup")
            .expect("credentials exist");
        assert_eq!(id, user.id);
        assert!(hash.verify("secret"));
    }
}

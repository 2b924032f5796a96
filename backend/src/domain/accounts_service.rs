//! Account registration, login, and profile editing use cases.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::auth::PasswordHash;
use crate::domain::error::Error;
use crate::domain::image::ImageData;
use crate::domain::ports::{
    ImageStore, ImageStoreError, MediaKind, UserRepository, UserRepositoryError,
};
use crate::domain::user::{Email, Profile, User, UserId, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Changes applied to an account by its owner.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Replacement contact address, when changing.
    pub email: Option<Email>,
    /// Replacement avatar payload, when changing.
    pub avatar: Option<ImageData>,
}

/// Service owning the account lifecycle.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
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
            Error::invalid_request(format!("username {username} is already taken"))
                .with_details(json!({ "field": "username", "code": "taken" }))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Io { message } => {
            Error::internal(format!("image store error: {message}"))
        }
    }
}

impl AccountService {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<dyn UserRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { users, images }
    }

    /// Register a new account and return the created user.
    ///
    /// The stored credential is a salted digest; the cleartext password is
    /// never persisted.
    pub async fn register(
        &self,
        username: Username,
        email: Email,
        password: &str,
    ) -> Result<User, Error> {
        if password.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ))
            .with_details(json!({ "field": "password", "code": "too_short" })));
        }

        let user = User::new(username, email);
        self.users
            .create_account(&user, &PasswordHash::derive(password))
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, username = %user.username.as_ref(), "account registered");
        Ok(user)
    }

    /// Verify a username/password pair and return the account identifier.
    ///
    /// An unknown username and a wrong password produce the same error, so
    /// the response does not reveal which usernames exist.
    pub async fn login(&self, username: &Username, password: &str) -> Result<UserId, Error> {
        let found = self
            .users
            .credentials(username)
            .await
            .map_err(map_user_error)?;
        match found {
            Some((id, hash)) if hash.verify(password) => {
                info!(user_id = %id, "login succeeded");
                Ok(id)
            }
            _ => Err(Error::unauthorized("invalid username or password")),
        }
    }

    /// Apply profile changes on behalf of `actor`.
    ///
    /// Only the account owner may edit; a replacement avatar deletes the
    /// previously stored file.
    pub async fn update_profile(
        &self,
        actor: UserId,
        username: &Username,
        update: ProfileUpdate,
    ) -> Result<Profile, Error> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if user.id != actor {
            return Err(Error::forbidden("only the owner may edit this profile"));
        }

        if let Some(email) = update.email {
            let changed = User { email, ..user.clone() };
            self.users
                .update_account(&changed)
                .await
                .map_err(map_user_error)?;
        }

        let mut profile = self
            .users
            .profile(&user.id)
            .await
            .map_err(map_user_error)?
            .unwrap_or_else(|| Profile::empty(user.id));
        if let Some(data) = update.avatar {
            let replacement = self
                .images
                .store(MediaKind::Avatar, &data)
                .await
                .map_err(map_image_error)?;
            if let Some(previous) = profile.avatar.replace(replacement) {
                if let Err(error) = self.images.remove(&previous).await {
                    warn!(reference = %previous, %error, "failed to delete replaced avatar");
                }
            }
            self.users
                .save_profile(&profile)
                .await
                .map_err(map_user_error)?;
        }

        info!(user_id = %user.id, "profile updated");
        Ok(profile)
    }

    /// Fetch the profile owned by `username`.
    pub async fn profile_of(&self, username: &Username) -> Result<Profile, Error> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let profile = self
            .users
            .profile(&user.id)
            .await
            .map_err(map_user_error)?
            .unwrap_or_else(|| Profile::empty(user.id));
        Ok(profile)
    }
}

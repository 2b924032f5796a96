//! Post data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::GroupId;
use super::image::{ImageData, ImageRef};
use super::user::UserId;

/// Maximum allowed length for post text.
pub const POST_TEXT_MAX: usize = 4000;

/// Validation errors returned by post value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// The text is empty after trimming.
    EmptyText,
    /// The text exceeds [`POST_TEXT_MAX`].
    TextTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "post text must not be empty"),
            Self::TextTooLong { max } => {
                write!(f, "post text must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated post body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostText(String);

impl PostText {
    /// Validate and construct a [`PostText`].
    pub fn new(text: impl Into<String>) -> Result<Self, PostValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        if text.chars().count() > POST_TEXT_MAX {
            return Err(PostValidationError::TextTooLong { max: POST_TEXT_MAX });
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for PostText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostText> for String {
    fn from(value: PostText) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostText {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Submitted fields for creating or editing a post.
///
/// The image payload, if any, has already passed magic-byte validation; the
/// group reference is resolved against storage by the service layer.
#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Body text.
    pub text: PostText,
    /// Optional group the post belongs to.
    pub group: Option<GroupId>,
    /// Optional image upload.
    pub image: Option<ImageData>,
}

/// A published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier.
    pub id: PostId,
    /// Body text.
    pub text: PostText,
    /// Publication timestamp, server-assigned and never reset by edits.
    pub published_at: DateTime<Utc>,
    /// Authoring user.
    pub author: UserId,
    /// Group the post belongs to, if any.
    pub group: Option<GroupId>,
    /// Stored image, if one was uploaded.
    pub image: Option<ImageRef>,
}

impl Post {
    /// Construct a new post stamped with the current server time.
    pub fn new(
        author: UserId,
        text: PostText,
        group: Option<GroupId>,
        image: Option<ImageRef>,
    ) -> Self {
        Self {
            id: PostId::random(),
            text,
            published_at: Utc::now(),
            author,
            group,
            image,
        }
    }
}

//! Comment data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::PostId;
use super::user::UserId;

/// Maximum allowed length for comment text.
pub const COMMENT_TEXT_MAX: usize = 2000;

/// Validation errors returned by comment value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// The text is empty after trimming.
    EmptyText,
    /// The text exceeds [`COMMENT_TEXT_MAX`].
    TextTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "comment text must not be empty"),
            Self::TextTooLong { max } => {
                write!(f, "comment text must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Stable comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
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

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated comment body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct a [`CommentText`].
    pub fn new(text: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        if text.chars().count() > COMMENT_TEXT_MAX {
            return Err(CommentValidationError::TextTooLong {
                max: COMMENT_TEXT_MAX,
            });
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A comment appended to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Stable identifier.
    pub id: CommentId,
    /// Post the comment belongs to.
    pub post: PostId,
    /// Authoring user.
    pub author: UserId,
    /// Body text.
    pub text: CommentText,
    /// Creation timestamp, server-assigned and immutable.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Construct a new comment stamped with the current server time.
    pub fn new(post: PostId, author: UserId, text: CommentText) -> Self {
        Self {
            id: CommentId::random(),
            post,
            author,
            text,
            created_at: Utc::now(),
        }
    }
}

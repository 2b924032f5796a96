//! Group data model.
//!
//! A group is a named category that posts may belong to, addressed by a
//! unique slug.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::is_valid_slug;

/// Maximum allowed length for a group title.
pub const GROUP_TITLE_MAX: usize = 200;
/// Maximum allowed length for a group slug.
pub const GROUP_SLUG_MAX: usize = 255;

/// Validation errors returned by group value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    /// The title is empty after trimming.
    EmptyTitle,
    /// The title exceeds [`GROUP_TITLE_MAX`].
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The slug is empty, untrimmed, or contains invalid characters.
    InvalidSlug,
    /// The slug exceeds [`GROUP_SLUG_MAX`].
    SlugTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "group title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "group title must be at most {max} characters")
            }
            Self::InvalidSlug => write!(
                f,
                "group slug may only contain lowercase letters, digits, or hyphens"
            ),
            Self::SlugTooLong { max } => {
                write!(f, "group slug must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for GroupValidationError {}

/// Stable group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Uuid);

impl GroupId {
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

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique, URL-safe group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a [`GroupSlug`].
    pub fn new(slug: impl Into<String>) -> Result<Self, GroupValidationError> {
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(GroupValidationError::InvalidSlug);
        }
        if slug.chars().count() > GROUP_SLUG_MAX {
            return Err(GroupValidationError::SlugTooLong {
                max: GROUP_SLUG_MAX,
            });
        }
        Ok(Self(slug))
    }
}

impl AsRef<str> for GroupSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A named category for posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Stable identifier.
    pub id: GroupId,
    /// Display title.
    pub title: String,
    /// Unique URL slug.
    pub slug: GroupSlug,
    /// Free-form description.
    pub description: String,
}

impl Group {
    /// Validate fields and construct a new group.
    pub fn new(
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Result<Self, GroupValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX,
            });
        }
        Ok(Self {
            id: GroupId::random(),
            title,
            slug,
            description: description.into(),
        })
    }
}

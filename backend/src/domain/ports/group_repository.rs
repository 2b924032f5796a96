//! Port for group persistence.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::group::{Group, GroupId, GroupSlug};

/// Errors raised by group repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupRepositoryError {
    /// Repository connection could not be established.
    #[error("group repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("group repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The slug is already taken by another group.
    #[error("group slug {slug} is already taken")]
    DuplicateSlug {
        /// The conflicting slug.
        slug: String,
    },
}

impl GroupRepositoryError {
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

    /// Create a duplicate-slug error.
    pub fn duplicate_slug(slug: impl Into<String>) -> Self {
        Self::DuplicateSlug { slug: slug.into() }
    }
}

/// Port for group storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Persist a new group.
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError>;

    /// Fetch a group by slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError>;

    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError>;
}

/// Stateful in-memory adapter used by tests and the database-less server.
#[derive(Debug, Default)]
pub struct FixtureGroupRepository {
    groups: Mutex<Vec<Group>>,
}

impl FixtureGroupRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Group>> {
        self.groups.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl GroupRepository for FixtureGroupRepository {
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError> {
        let mut groups = self.lock();
        if groups.iter().any(|stored| stored.slug == group.slug) {
            return Err(GroupRepositoryError::duplicate_slug(group.slug.as_ref()));
        }
        groups.push(group.clone());
        Ok(())
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self.lock().iter().find(|g| &g.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self.lock().iter().find(|g| &g.id == id).cloned())
    }
}

//! Follow relation between users.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A directed subscription from one user to an author.
///
/// ## Invariants
///
/// - The (follower, author) pair is unique in storage.
/// - `follower != author`; storage rejects self-follow inserts and the
///   service layer swallows that rejection, so the pair never persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    /// The subscribing user.
    pub follower: UserId,
    /// The followed author.
    pub author: UserId,
}

impl Follow {
    /// Build the pair record.
    pub fn new(follower: UserId, author: UserId) -> Self {
        Self { follower, author }
    }

    /// Whether the pair would violate the self-follow constraint.
    pub fn is_self_follow(&self) -> bool {
        self.follower == self.author
    }
}

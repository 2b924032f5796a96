//! Post authoring and editing use cases.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::error::Error;
use crate::domain::group::GroupId;
use crate::domain::image::ImageRef;
use crate::domain::ports::{
    GroupRepository, GroupRepositoryError, ImageStore, ImageStoreError, MediaKind,
    PostRepository, PostRepositoryError,
};
use crate::domain::post::{Post, PostDraft, PostId};
use crate::domain::user::UserId;

/// Service implementing post creation and author-only editing.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    images: Arc<dyn ImageStore>,
}

fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

fn map_group_error(error: GroupRepositoryError) -> Error {
    match error {
        GroupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("group repository unavailable: {message}"))
        }
        GroupRepositoryError::Query { message }
        | GroupRepositoryError::DuplicateSlug { slug: message } => {
            Error::internal(format!("group repository error: {message}"))
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

impl PostService {
    /// Create a new service over the given adapters.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            groups,
            images,
        }
    }

    /// Create a post for `author` from a validated draft.
    ///
    /// The group reference, when present, must name an existing group.
    pub async fn create(&self, author: UserId, draft: PostDraft) -> Result<Post, Error> {
        let group = self.resolve_group(draft.group).await?;
        let image = match draft.image {
            Some(data) => Some(
                self.images
                    .store(MediaKind::Post, &data)
                    .await
                    .map_err(map_image_error)?,
            ),
            None => None,
        };
        let post = Post::new(author, draft.text, group, image);
        self.posts.create(&post).await.map_err(map_post_error)?;
        info!(post_id = %post.id, author = %author, "post created");
        Ok(post)
    }

    /// Edit an existing post in place.
    ///
    /// Only the author may edit; anyone else gets a `Forbidden` error that
    /// the HTTP layer turns into a redirect to the detail view. The
    /// publication timestamp is never reset. A replacement image deletes the
    /// previously stored file.
    pub async fn edit(
        &self,
        post_id: PostId,
        actor: UserId,
        draft: PostDraft,
    ) -> Result<Post, Error> {
        let existing = self
            .posts
            .find_by_id(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("post not found"))?;
        if existing.author != actor {
            return Err(Error::forbidden("only the author may edit this post")
                .with_details(json!({ "postId": post_id.as_uuid() })));
        }

        let group = self.resolve_group(draft.group).await?;
        let image = match draft.image {
            Some(data) => {
                let replacement = self
                    .images
                    .store(MediaKind::Post, &data)
                    .await
                    .map_err(map_image_error)?;
                self.discard(existing.image.as_ref()).await;
                Some(replacement)
            }
            None => existing.image.clone(),
        };

        let updated = Post {
            id: existing.id,
            text: draft.text,
            published_at: existing.published_at,
            author: existing.author,
            group,
            image,
        };
        self.posts.update(&updated).await.map_err(map_post_error)?;
        info!(post_id = %updated.id, "post edited");
        Ok(updated)
    }

    async fn resolve_group(&self, group: Option<GroupId>) -> Result<Option<GroupId>, Error> {
        let Some(id) = group else { return Ok(None) };
        let found = self
            .groups
            .find_by_id(&id)
            .await
            .map_err(map_group_error)?;
        match found {
            Some(group) => Ok(Some(group.id)),
            None => Err(Error::invalid_request("group does not exist")
                .with_details(json!({ "field": "group", "code": "unknown_group" }))),
        }
    }

    async fn discard(&self, image: Option<&ImageRef>) {
        let Some(reference) = image else { return };
        if let Err(error) = self.images.remove(reference).await {
            // The replacement is already stored; a stale file is not fatal.
            warn!(%reference, %error, "failed to delete replaced image");
        }
    }
}

#[cfg(test)]
#[path = "posts_service_tests.rs"]
mod tests;

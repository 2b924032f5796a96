//! Feed composition: global, group, author, and subscription listings.
//!
//! Every feed selects posts newest first, clamps the requested page via the
//! pagination crate, and resolves author/group references into view structs.
//! The global feed alone is served through the page-level cache; see the
//! [`FeedCache`] port for the staleness contract.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::{Page, PageBounds, PageNumber};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::error::Error;
use crate::domain::group::{Group, GroupId, GroupSlug};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FeedCache, FeedQuery, FollowRepository,
    FollowRepositoryError, GroupRepository, GroupRepositoryError, PostRepository,
    PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::post::{Post, PostId};
use crate::domain::user::{UserId, Username};

/// A post resolved for rendering: references replaced with display values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Post identifier.
    pub id: Uuid,
    /// Body text.
    pub text: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// Author's username.
    pub author: String,
    /// Group slug and title, when the post is grouped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
    /// Stored image path, when the post is illustrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Minimal group reference embedded in a [`PostView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    /// Group slug.
    pub slug: String,
    /// Group title.
    pub title: String,
}

/// A comment resolved for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment identifier.
    pub id: Uuid,
    /// Author's username.
    pub author: String,
    /// Body text.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Group feed: the group header plus one page of its posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFeed {
    /// Group slug.
    pub slug: String,
    /// Group title.
    pub title: String,
    /// Group description.
    pub description: String,
    /// Current page of posts.
    pub page: Page<PostView>,
}

/// Author feed: profile header plus one page of the author's posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFeed {
    /// Author's username.
    pub author: String,
    /// Total number of posts by this author.
    pub post_count: u64,
    /// Whether the requesting user follows this author.
    pub following: bool,
    /// Current page of posts.
    pub page: Page<PostView>,
}

/// Post detail: the post, its comments, and ownership context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    /// The post itself.
    pub post: PostView,
    /// Comments, oldest first.
    pub comments: Vec<CommentView>,
    /// Total number of posts by the same author.
    pub author_post_count: u64,
    /// Whether the requesting user authored the post.
    pub owner: bool,
}

/// Service assembling paginated feed views.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    cache: Arc<dyn FeedCache>,
    page_size: u64,
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

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
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

impl FeedService {
    /// Create a new service over the given adapters.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        cache: Arc<dyn FeedCache>,
        page_size: u64,
    ) -> Self {
        Self {
            posts,
            comments,
            groups,
            users,
            follows,
            cache,
            page_size,
        }
    }

    /// Global feed, served through the page-level cache.
    ///
    /// Returns the rendered JSON value so cache hits skip view resolution
    /// entirely, matching a full-page cache.
    pub async fn global(&self, page: PageNumber) -> Result<Value, Error> {
        let key = format!("feed:global:{}", page.get());
        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "global feed served from cache");
            return Ok(hit);
        }

        let rendered = self.feed_page(&FeedQuery::Global, page).await?;
        let value = serde_json::to_value(&rendered)
            .map_err(|err| Error::internal(format!("failed to serialize feed: {err}")))?;
        self.cache.put(&key, value.clone()).await;
        Ok(value)
    }

    /// Posts belonging to the group addressed by `slug`.
    pub async fn group(&self, slug: &GroupSlug, page: PageNumber) -> Result<GroupFeed, Error> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await
            .map_err(map_group_error)?
            .ok_or_else(|| Error::not_found("group not found"))?;
        let rendered = self.feed_page(&FeedQuery::Group(group.id), page).await?;
        Ok(GroupFeed {
            slug: group.slug.as_ref().to_owned(),
            title: group.title,
            description: group.description,
            page: rendered,
        })
    }

    /// Posts written by the author addressed by `username`.
    pub async fn author(
        &self,
        username: &Username,
        page: PageNumber,
        viewer: Option<UserId>,
    ) -> Result<AuthorFeed, Error> {
        let author = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let query = FeedQuery::Author(author.id);
        let post_count = self.posts.count(&query).await.map_err(map_post_error)?;
        let rendered = self.feed_page(&query, page).await?;
        let following = match viewer {
            Some(viewer) => self
                .follows
                .exists(&viewer, &author.id)
                .await
                .map_err(map_follow_error)?,
            None => false,
        };
        Ok(AuthorFeed {
            author: author.username.as_ref().to_owned(),
            post_count,
            following,
            page: rendered,
        })
    }

    /// Posts authored by anyone the requester follows.
    pub async fn subscriptions(
        &self,
        viewer: UserId,
        page: PageNumber,
    ) -> Result<Page<PostView>, Error> {
        let authors = self
            .follows
            .followed_authors(&viewer)
            .await
            .map_err(map_follow_error)?;
        self.feed_page(&FeedQuery::AuthoredByAny(authors), page).await
    }

    /// One post with its comments and ownership context.
    pub async fn post_detail(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Result<PostDetail, Error> {
        let post = self
            .posts
            .find_by_id(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("post not found"))?;
        let author_post_count = self
            .posts
            .count(&FeedQuery::Author(post.author))
            .await
            .map_err(map_post_error)?;
        let comments = self
            .comments
            .list_for_post(&post.id)
            .await
            .map_err(map_comment_error)?;

        let owner = viewer.is_some_and(|viewer| viewer == post.author);
        let mut resolver = ViewResolver::new(self);
        let post_view = resolver.post(&post).await?;
        let mut comment_views = Vec::with_capacity(comments.len());
        for comment in &comments {
            comment_views.push(resolver.comment(comment).await?);
        }
        Ok(PostDetail {
            post: post_view,
            comments: comment_views,
            author_post_count,
            owner,
        })
    }

    async fn feed_page(
        &self,
        query: &FeedQuery,
        page: PageNumber,
    ) -> Result<Page<PostView>, Error> {
        let total = self.posts.count(query).await.map_err(map_post_error)?;
        let bounds = PageBounds::clamp(total, self.page_size, page)
            .map_err(|err| Error::internal(format!("pagination misconfigured: {err}")))?;
        let posts = self
            .posts
            .list(query, bounds.offset, bounds.limit)
            .await
            .map_err(map_post_error)?;

        let mut resolver = ViewResolver::new(self);
        let mut views = Vec::with_capacity(posts.len());
        for post in &posts {
            views.push(resolver.post(post).await?);
        }
        Ok(Page::from_window(views, bounds, total))
    }
}

/// Resolves user and group references, memoising lookups within one render.
struct ViewResolver<'a> {
    service: &'a FeedService,
    usernames: HashMap<UserId, String>,
    groups: HashMap<GroupId, Option<GroupRef>>,
}

impl<'a> ViewResolver<'a> {
    fn new(service: &'a FeedService) -> Self {
        Self {
            service,
            usernames: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    async fn post(&mut self, post: &Post) -> Result<PostView, Error> {
        let author = self.username(post.author).await?;
        let group = match post.group {
            Some(id) => self.group(id).await?,
            None => None,
        };
        Ok(PostView {
            id: *post.id.as_uuid(),
            text: post.text.as_ref().to_owned(),
            published_at: post.published_at,
            author,
            group,
            image: post.image.as_ref().map(|i| i.as_ref().to_owned()),
        })
    }

    async fn comment(&mut self, comment: &Comment) -> Result<CommentView, Error> {
        let author = self.username(comment.author).await?;
        Ok(CommentView {
            id: *comment.id.as_uuid(),
            author,
            text: comment.text.as_ref().to_owned(),
            created_at: comment.created_at,
        })
    }

    async fn username(&mut self, id: UserId) -> Result<String, Error> {
        if let Some(name) = self.usernames.get(&id) {
            return Ok(name.clone());
        }
        let name = self
            .service
            .users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .map_or_else(|| id.to_string(), |user| user.username.as_ref().to_owned());
        self.usernames.insert(id, name.clone());
        Ok(name)
    }

    async fn group(&mut self, id: GroupId) -> Result<Option<GroupRef>, Error> {
        if let Some(group) = self.groups.get(&id) {
            return Ok(group.clone());
        }
        let group = self
            .service
            .groups
            .find_by_id(&id)
            .await
            .map_err(map_group_error)?
            .map(|group: Group| GroupRef {
                slug: group.slug.as_ref().to_owned(),
                title: group.title,
            });
        self.groups.insert(id, group.clone());
        Ok(group)
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;

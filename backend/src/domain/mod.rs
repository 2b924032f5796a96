//! Core domain model and use-case services.
//!
//! Entities carry validated newtypes; services orchestrate the ports in
//! [`ports`] and stay transport-agnostic. The HTTP layer owns status codes
//! and redirects, adapters own storage details.

pub mod auth;
pub mod comment;
pub mod error;
pub mod follow;
pub mod group;
pub mod image;
pub mod post;
pub mod user;

mod slug;

pub mod ports;

mod accounts_service;
mod comments_service;
mod feed_service;
mod follow_service;
mod posts_service;

pub use accounts_service::{AccountService, ProfileUpdate, PASSWORD_MIN};
pub use auth::PasswordHash;
pub use comment::{Comment, CommentId, CommentText};
pub use comments_service::CommentService;
pub use error::{Error, ErrorCode};
pub use feed_service::{
    AuthorFeed, CommentView, FeedService, GroupFeed, GroupRef, PostDetail, PostView,
};
pub use follow::Follow;
pub use follow_service::FollowService;
pub use group::{Group, GroupId, GroupSlug};
pub use image::{ImageData, ImageFormat, ImageRef};
pub use post::{Post, PostDraft, PostId, PostText};
pub use posts_service::PostService;
pub use user::{Email, Profile, User, UserId, Username};

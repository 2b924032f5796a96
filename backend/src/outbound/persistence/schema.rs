//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Registered accounts with their credential material.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 32 characters).
        username -> Varchar,
        /// Contact address.
        email -> Varchar,
        /// Hex-encoded password salt.
        password_salt -> Varchar,
        /// Hex-encoded salted SHA-256 digest.
        password_digest -> Varchar,
        /// Registration timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per account, created alongside it.
    profiles (user_id) {
        /// Owning account, primary key and foreign key.
        user_id -> Uuid,
        /// Stored avatar path, when set.
        avatar -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Thematic communities posts may belong to.
    groups (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display title (max 200 characters).
        title -> Varchar,
        /// Unique URL-safe slug.
        slug -> Varchar,
        /// Free-form description.
        description -> Text,
    }
}

diesel::table! {
    /// Published posts.
    posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Body text.
        text -> Text,
        /// Publication timestamp, immutable after insert.
        published_at -> Timestamptz,
        /// Authoring account.
        author_id -> Uuid,
        /// Optional owning group.
        group_id -> Nullable<Uuid>,
        /// Stored image path, when attached.
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments appended to posts.
    comments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Commented post.
        post_id -> Uuid,
        /// Authoring account.
        author_id -> Uuid,
        /// Body text.
        text -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow pairs; the composite key enforces uniqueness and a
    /// check constraint (`follows_no_self_follow`) rejects self-follows.
    follows (follower_id, author_id) {
        /// Subscribing account.
        follower_id -> Uuid,
        /// Followed account.
        author_id -> Uuid,
    }
}

diesel::joinable!(profiles -> users (user_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, profiles, groups, posts, comments, follows);

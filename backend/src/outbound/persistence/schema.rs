//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Accounts owned by the identity subsystem.
    users (id) {
        id -> Int8,
        /// Unique login name (max 150 characters).
        username -> Varchar,
    }
}

diesel::table! {
    /// Topic groups, managed by administrators.
    groups (id) {
        id -> Int8,
        title -> Varchar,
        /// Unique URL slug (max 50 characters).
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Published posts.
    posts (id) {
        id -> Int8,
        text -> Text,
        pub_date -> Timestamptz,
        author_id -> Int8,
        group_id -> Nullable<Int8>,
        /// Image path relative to the media root, under `posts/`.
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments on posts.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Int8,
        text -> Text,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Directional subscriptions; unique per pair, never to self.
    follows (id) {
        id -> Int8,
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);

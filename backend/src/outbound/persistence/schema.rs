//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Application profiles, one per authenticated account.
    users (id) {
        id -> Int8,
        /// Identity issued by the login provider.
        account_id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        user_email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Admin set: a row grants privilege to the referenced profile.
    admins (user_id) {
        user_id -> Int8,
        granted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Suggested and approved caches. `valid` is false while pending review.
    caches (id) {
        id -> Int8,
        cache_name -> Varchar,
        lat -> Float8,
        long -> Float8,
        description -> Text,
        hint -> Text,
        author -> Int8,
        creation_date -> Timestamptz,
        difficulty -> Int2,
        terrain -> Int2,
        size -> Int2,
        valid -> Bool,
    }
}

diesel::table! {
    /// Append-only discovery logs.
    logs (id) {
        id -> Int8,
        logger -> Int8,
        cache -> Int8,
        discover_date -> Timestamptz,
    }
}

diesel::table! {
    /// Unique (profile, cache) bookmark pairs.
    bookmarks (id) {
        id -> Int8,
        user_id -> Int8,
        cache_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(admins -> users (user_id));
diesel::joinable!(caches -> users (author));
diesel::joinable!(logs -> caches (cache));
diesel::joinable!(bookmarks -> caches (cache_id));

diesel::allow_tables_to_appear_in_same_query!(admins, bookmarks, caches, logs, users);

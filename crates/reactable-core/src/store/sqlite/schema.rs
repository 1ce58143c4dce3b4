//! Canonical SQLite schema for the reaction store.
//!
//! - `subjects` keeps each reactable subject with its cached count map
//!   (`reactions_counts`, a JSON object whose key order is significant)
//! - `reactions` holds one row per (subject, actor, symbol); exactly one of
//!   `emoji` and `custom_emoji_id` is set
//! - `actors` and `custom_emojis` are joined in for reactor identity and
//!   custom emoji definitions
//! - `store_meta` records the applied schema version

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS actors (
    actor_id TEXT PRIMARY KEY,
    username TEXT NOT NULL CHECK (length(trim(username)) > 0),
    name TEXT,
    iri TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS custom_emojis (
    custom_emoji_id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    image_url TEXT NOT NULL,
    iri TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id TEXT PRIMARY KEY,
    reactions_counts TEXT NOT NULL DEFAULT '{}' CHECK (json_valid(reactions_counts)),
    updated_at_us INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS reactions (
    reaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id TEXT NOT NULL REFERENCES subjects(subject_id) ON DELETE CASCADE,
    actor_id TEXT NOT NULL REFERENCES actors(actor_id) ON DELETE CASCADE,
    emoji TEXT,
    custom_emoji_id TEXT,
    created_at_us INTEGER NOT NULL,
    CHECK ((emoji IS NULL) <> (custom_emoji_id IS NULL))
);

CREATE UNIQUE INDEX IF NOT EXISTS ux_reactions_emoji
    ON reactions(subject_id, actor_id, emoji) WHERE emoji IS NOT NULL;

CREATE UNIQUE INDEX IF NOT EXISTS ux_reactions_custom_emoji
    ON reactions(subject_id, actor_id, custom_emoji_id) WHERE custom_emoji_id IS NOT NULL;

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    last_import_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (
    id,
    schema_version,
    last_import_at_us
) VALUES (1, 1, 0);
"#;

/// Migration v2: read-path indexes for windowed group reads.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_reactions_emoji_page
    ON reactions(subject_id, emoji, created_at_us, actor_id)
    WHERE emoji IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_reactions_custom_emoji_page
    ON reactions(subject_id, custom_emoji_id, created_at_us, actor_id)
    WHERE custom_emoji_id IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_reactions_actor
    ON reactions(actor_id);
"#;

/// Indexes expected to exist after all migrations.
pub const REQUIRED_INDEXES: &[&str] = &[
    "ux_reactions_emoji",
    "ux_reactions_custom_emoji",
    "idx_reactions_emoji_page",
    "idx_reactions_custom_emoji_page",
    "idx_reactions_actor",
];

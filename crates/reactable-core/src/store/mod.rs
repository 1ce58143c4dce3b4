//! Store contracts consumed by the resolution layer, plus the bundled
//! SQLite implementation.
//!
//! Traits take `&self` and return `anyhow::Result` so that any backend's
//! failures flow through unchanged. Absence is `Ok(None)`, never an error.

pub mod sqlite;

use uuid::Uuid;

use crate::group::ReactionFilter;
use crate::model::{Actor, CustomEmoji, ReactableSubject};
use crate::pagination::Window;
use crate::pagination::cursor::CursorKey;

/// A group filter composed with a pagination window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionQuery {
    pub filter: ReactionFilter,
    pub window: Window,
}

impl ReactionQuery {
    #[must_use]
    pub const fn new(filter: ReactionFilter, window: Window) -> Self {
        Self { filter, window }
    }
}

/// A reaction record joined to the identity of its reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorRow {
    pub key: CursorKey,
    pub actor: Actor,
}

/// Reaction records, read through a filter and a cursor window.
pub trait ReactionStore {
    /// Return up to `query.window.fetch_limit()` rows matching the filter,
    /// strictly past the window boundary, in window order.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    fn find_reactors(&self, query: &ReactionQuery) -> anyhow::Result<Vec<ReactorRow>>;
}

/// Registry of custom emoji definitions.
pub trait CustomEmojiRegistry {
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    fn find_custom_emoji(&self, id: Uuid) -> anyhow::Result<Option<CustomEmoji>>;
}

/// Lookup of reactable subjects and their cached count maps.
pub trait SubjectStore {
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    fn find_subject(&self, id: Uuid) -> anyhow::Result<Option<ReactableSubject>>;
}

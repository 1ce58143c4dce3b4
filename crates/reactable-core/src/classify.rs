//! Reaction key classification.
//!
//! A key in a subject's count map names either a standard emoji literal or a
//! custom emoji by its UUID. Classification is total: every string maps to
//! one of the two, and anything that is not a strictly formatted UUID is
//! treated as an emoji literal without further validation.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Length of the canonical hyphenated UUID spelling (8-4-4-4-12).
const HYPHENATED_UUID_LEN: usize = 36;

/// The symbol a reaction group is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReactionSymbol {
    /// A standard emoji, taken verbatim from the count map key.
    Emoji(String),
    /// A reference into the custom emoji registry.
    CustomEmoji(Uuid),
}

impl ReactionSymbol {
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::CustomEmoji(_))
    }
}

impl fmt::Display for ReactionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emoji(emoji) => f.write_str(emoji),
            Self::CustomEmoji(id) => write!(f, "{id}"),
        }
    }
}

/// Returns the custom emoji id if `key` is a hyphenated UUID.
///
/// Braced, URN and unhyphenated spellings are rejected even though they
/// denote valid UUIDs.
#[must_use]
pub fn parse_custom_emoji_id(key: &str) -> Option<Uuid> {
    if key.len() != HYPHENATED_UUID_LEN {
        return None;
    }
    Uuid::try_parse(key).ok()
}

/// Classify a count map key.
#[must_use]
pub fn classify(key: &str) -> ReactionSymbol {
    parse_custom_emoji_id(key).map_or_else(
        || ReactionSymbol::Emoji(key.to_string()),
        ReactionSymbol::CustomEmoji,
    )
}

//! Concrete type resolution for reaction groups and their kind-specific
//! fields.

use serde::Serialize;
use std::{fmt, str::FromStr};
use tracing::warn;

use crate::error::ReactionError;
use crate::group::{CustomEmojiReactionGroup, ReactionGroup};
use crate::model::CustomEmoji;
use crate::store::CustomEmojiRegistry;

/// Exposed type name of a reaction group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupType {
    EmojiReactionGroup,
    CustomEmojiReactionGroup,
}

impl GroupType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmojiReactionGroup => "EmojiReactionGroup",
            Self::CustomEmojiReactionGroup => "CustomEmojiReactionGroup",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupType {
    type Err = ReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emoji" | "emojireactiongroup" => Ok(Self::EmojiReactionGroup),
            "custom" | "custom_emoji" | "custom-emoji" | "customemoji"
            | "customemojireactiongroup" => Ok(Self::CustomEmojiReactionGroup),
            _ => Err(ReactionError::UnknownGroupType(s.to_string())),
        }
    }
}

/// Map a group to its concrete exposed type.
///
/// The match is exhaustive over the closed set of group variants, so there
/// is no unknown-kind case to handle at runtime.
#[must_use]
pub const fn resolve_type(group: &ReactionGroup<'_>) -> GroupType {
    match group {
        ReactionGroup::Emoji(_) => GroupType::EmojiReactionGroup,
        ReactionGroup::CustomEmoji(_) => GroupType::CustomEmojiReactionGroup,
    }
}

/// Fetch the registry entry a custom emoji group refers to.
///
/// # Errors
///
/// Returns [`ReactionError::CustomEmojiNotFound`] when the registry has no
/// such entry. A group pointing at a missing emoji means the registry and
/// the reaction data disagree, so no placeholder is substituted. Registry
/// failures are returned as [`ReactionError::Store`].
pub fn resolve_custom_emoji<R>(
    group: &CustomEmojiReactionGroup<'_>,
    registry: &R,
) -> Result<CustomEmoji, ReactionError>
where
    R: CustomEmojiRegistry + ?Sized,
{
    let id = group.custom_emoji_id;
    match registry.find_custom_emoji(id)? {
        Some(emoji) => Ok(emoji),
        None => {
            warn!(
                subject = %group.subject.id,
                custom_emoji = %id,
                "reaction group references missing custom emoji"
            );
            Err(ReactionError::CustomEmojiNotFound { id })
        }
    }
}

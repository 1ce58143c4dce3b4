//! Reaction groups and their aggregation from a subject's count map.

use serde::Serialize;
use uuid::Uuid;

use crate::classify::{ReactionSymbol, classify};
use crate::model::ReactableSubject;

/// Selects exactly the reaction records that belong to one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReactionFilter {
    pub subject_id: Uuid,
    pub symbol: SymbolFilter,
}

/// The symbol half of a [`ReactionFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolFilter {
    Emoji(String),
    CustomEmojiId(Uuid),
}

impl ReactionFilter {
    #[must_use]
    pub fn emoji(subject_id: Uuid, emoji: impl Into<String>) -> Self {
        Self {
            subject_id,
            symbol: SymbolFilter::Emoji(emoji.into()),
        }
    }

    #[must_use]
    pub const fn custom_emoji(subject_id: Uuid, custom_emoji_id: Uuid) -> Self {
        Self {
            subject_id,
            symbol: SymbolFilter::CustomEmojiId(custom_emoji_id),
        }
    }
}

/// Group of standard emoji reactions sharing one literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiReactionGroup<'s> {
    pub subject: &'s ReactableSubject,
    pub count: u64,
    pub emoji: String,
    pub filter: ReactionFilter,
}

/// Group of reactions sharing one custom emoji.
///
/// Only the id is held; the registry entry is fetched when asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEmojiReactionGroup<'s> {
    pub subject: &'s ReactableSubject,
    pub count: u64,
    pub custom_emoji_id: Uuid,
    pub filter: ReactionFilter,
}

/// All reactions on a subject that share one symbol key.
///
/// The group borrows its subject and cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionGroup<'s> {
    Emoji(EmojiReactionGroup<'s>),
    CustomEmoji(CustomEmojiReactionGroup<'s>),
}

impl<'s> ReactionGroup<'s> {
    /// Build the group for one count map entry.
    #[must_use]
    pub fn new(subject: &'s ReactableSubject, key: &str, count: u64) -> Self {
        match classify(key) {
            ReactionSymbol::Emoji(emoji) => Self::Emoji(EmojiReactionGroup {
                subject,
                count,
                filter: ReactionFilter::emoji(subject.id, emoji.clone()),
                emoji,
            }),
            ReactionSymbol::CustomEmoji(custom_emoji_id) => {
                Self::CustomEmoji(CustomEmojiReactionGroup {
                    subject,
                    count,
                    custom_emoji_id,
                    filter: ReactionFilter::custom_emoji(subject.id, custom_emoji_id),
                })
            }
        }
    }

    #[must_use]
    pub const fn subject(&self) -> &'s ReactableSubject {
        match self {
            Self::Emoji(group) => group.subject,
            Self::CustomEmoji(group) => group.subject,
        }
    }

    /// Aggregate count copied from the subject when the group was built.
    #[must_use]
    pub const fn count(&self) -> u64 {
        match self {
            Self::Emoji(group) => group.count,
            Self::CustomEmoji(group) => group.count,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &ReactionFilter {
        match self {
            Self::Emoji(group) => &group.filter,
            Self::CustomEmoji(group) => &group.filter,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> ReactionSymbol {
        match self {
            Self::Emoji(group) => ReactionSymbol::Emoji(group.emoji.clone()),
            Self::CustomEmoji(group) => ReactionSymbol::CustomEmoji(group.custom_emoji_id),
        }
    }
}

/// Derive one group per entry of the subject's count map, in map order.
///
/// Zero counts are kept; the map is trusted to hold only meaningful keys.
#[must_use]
pub fn reaction_groups(subject: &ReactableSubject) -> Vec<ReactionGroup<'_>> {
    subject
        .reactions_counts
        .iter()
        .map(|(key, count)| ReactionGroup::new(subject, key, count))
        .collect()
}

/// Find the group for `key`, classifying it the same way aggregation does.
#[must_use]
pub fn find_group<'s>(subject: &'s ReactableSubject, key: &str) -> Option<ReactionGroup<'s>> {
    let wanted = classify(key);
    reaction_groups(subject)
        .into_iter()
        .find(|group| group.symbol() == wanted)
}

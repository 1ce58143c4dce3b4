//! Serializable subject views with per-field failure reporting.
//!
//! A subject resolves into its reaction groups, each with kind-specific
//! fields and optionally a page of reactors. A failure while resolving one
//! field (a missing custom emoji, a store error on one group's reactors) is
//! recorded in [`Resolved::errors`] with the path of that field; the field
//! is left empty and every sibling still resolves.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::ReactionError;
use crate::group::{ReactionGroup, reaction_groups};
use crate::model::{Actor, CustomEmoji, ReactableSubject};
use crate::pagination::{Connection, ConnectionArgs, PageLimits};
use crate::reactors::reactors;
use crate::resolve::{GroupType, resolve_custom_emoji, resolve_type};
use crate::store::{CustomEmojiRegistry, ReactionStore, SubjectStore};

/// Stores and limits shared by every field of one resolution.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub reactions: &'a dyn ReactionStore,
    pub registry: &'a dyn CustomEmojiRegistry,
    pub limits: PageLimits,
}

/// Which optional parts of a subject view to resolve.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Fetch a reactor page for every group with these arguments.
    pub reactors: Option<ConnectionArgs>,
    /// Only keep groups of this type.
    pub group_type: Option<GroupType>,
}

/// A resolved value together with the failures of its individual fields.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub data: T,
    pub errors: Vec<FieldFailure>,
}

impl<T> Resolved<T> {
    /// True when every requested field resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A single field that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    /// Field path, e.g. `reaction_groups[1].custom_emoji`.
    pub path: String,
    /// Stable `E####` code.
    pub code: &'static str,
    pub message: String,
}

impl FieldFailure {
    fn new(path: String, err: &ReactionError) -> Self {
        Self {
            path,
            code: err.code().code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectView {
    pub id: Uuid,
    pub node_id: String,
    /// Sum of all cached group counts.
    pub total: u64,
    pub reaction_groups: Vec<GroupView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub count: u64,
    #[serde(flatten)]
    pub symbol: SymbolView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactors: Option<Connection<Actor>>,
}

/// Kind-specific group fields.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SymbolView {
    Emoji {
        emoji: String,
    },
    Custom {
        custom_emoji_id: Uuid,
        /// `None` when the registry lookup failed.
        custom_emoji: Option<CustomEmojiView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomEmojiView {
    pub id: Uuid,
    pub node_id: String,
    pub name: String,
    pub image_url: String,
    pub iri: String,
}

impl From<CustomEmoji> for CustomEmojiView {
    fn from(emoji: CustomEmoji) -> Self {
        Self {
            node_id: emoji.node_id(),
            id: emoji.id,
            name: emoji.name,
            image_url: emoji.image_url,
            iri: emoji.iri,
        }
    }
}

/// Resolve every reaction group of `subject`.
///
/// Never fails as a whole: field failures land in [`Resolved::errors`].
#[must_use]
pub fn resolve_subject(
    subject: &ReactableSubject,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> Resolved<SubjectView> {
    let mut errors = Vec::new();
    let groups = reaction_groups(subject)
        .into_iter()
        .filter(|group| options.group_type.is_none_or(|wanted| resolve_type(group) == wanted))
        .enumerate()
        .map(|(index, group)| resolve_group(&group, index, ctx, options, &mut errors))
        .collect();

    Resolved {
        data: SubjectView {
            id: subject.id,
            node_id: subject.node_id(),
            total: subject.reactions_counts.total(),
            reaction_groups: groups,
        },
        errors,
    }
}

/// Look up a subject and resolve it.
///
/// # Errors
///
/// Returns [`ReactionError::SubjectNotFound`] when the subject does not
/// exist and [`ReactionError::Store`] when the lookup itself fails.
pub fn resolve_subject_by_id<S>(
    id: Uuid,
    subjects: &S,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> Result<Resolved<SubjectView>, ReactionError>
where
    S: SubjectStore + ?Sized,
{
    let subject = subjects
        .find_subject(id)?
        .ok_or(ReactionError::SubjectNotFound { id })?;
    Ok(resolve_subject(&subject, ctx, options))
}

fn resolve_group(
    group: &ReactionGroup<'_>,
    index: usize,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
    errors: &mut Vec<FieldFailure>,
) -> GroupView {
    let mut fail = |field: &str, err: &ReactionError| {
        let path = format!("reaction_groups[{index}].{field}");
        warn!(path = %path, code = %err.code(), error = %err, "field failed to resolve");
        errors.push(FieldFailure::new(path, err));
    };

    let symbol = match group {
        ReactionGroup::Emoji(group) => SymbolView::Emoji {
            emoji: group.emoji.clone(),
        },
        ReactionGroup::CustomEmoji(custom) => {
            let custom_emoji = match resolve_custom_emoji(custom, ctx.registry) {
                Ok(emoji) => Some(CustomEmojiView::from(emoji)),
                Err(err) => {
                    fail("custom_emoji", &err);
                    None
                }
            };
            SymbolView::Custom {
                custom_emoji_id: custom.custom_emoji_id,
                custom_emoji,
            }
        }
    };

    let reactors = options.reactors.as_ref().and_then(|args| {
        reactors(group, args, ctx.reactions, ctx.limits)
            .map_err(|err| fail("reactors", &err))
            .ok()
    });

    GroupView {
        group_type: resolve_type(group),
        count: group.count(),
        symbol,
        reactors,
    }
}

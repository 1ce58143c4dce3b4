use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reactor's reaction on one subject with one symbol.
///
/// Exactly one of `emoji` and `custom_emoji_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub subject_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_emoji_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Reaction {
    /// The key this reaction is counted under in the subject's count map.
    #[must_use]
    pub fn symbol_key(&self) -> Option<String> {
        match (&self.emoji, self.custom_emoji_id) {
            (Some(emoji), None) => Some(emoji.clone()),
            (None, Some(id)) => Some(id.to_string()),
            _ => None,
        }
    }
}

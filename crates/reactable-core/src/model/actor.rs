use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an account that reacted to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iri: String,
}

impl Actor {
    /// Display label: the name when set, otherwise `@username`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| format!("@{}", self.username), str::to_string)
    }
}

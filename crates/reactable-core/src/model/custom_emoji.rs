use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::{self, NodeType};

/// A registry entry for an uploaded or federated emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEmoji {
    pub id: Uuid,
    /// Short code shown to users, e.g. `:blobcat:`.
    pub name: String,
    pub image_url: String,
    /// Canonical identifier of the emoji on its origin server.
    pub iri: String,
}

impl CustomEmoji {
    /// Global node id for this emoji.
    #[must_use]
    pub fn node_id(&self) -> String {
        node::encode(NodeType::CustomEmoji, self.id)
    }
}

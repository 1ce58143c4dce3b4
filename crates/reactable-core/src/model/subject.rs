use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::{self, NodeType};

/// Cached per-symbol reaction totals for one subject.
///
/// Keys are either standard emoji literals or hyphenated custom-emoji UUIDs.
/// Iteration follows insertion order, which is also the order reaction
/// groups are reported in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionCounts(IndexMap<String, u64>);

impl ReactionCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for `key`, keeping its original position if present.
    pub fn insert(&mut self, key: impl Into<String>, count: u64) -> Option<u64> {
        self.0.insert(key.into(), count)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Sum of all group counts, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0, |sum, count| sum.saturating_add(*count))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for ReactionCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, count)| (key.into(), count)).collect())
    }
}

/// A post that accumulates reactions.
///
/// Notes, articles and questions are all posts, so every subject is
/// addressed through the `Post` node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactableSubject {
    pub id: Uuid,
    #[serde(default)]
    pub reactions_counts: ReactionCounts,
}

impl ReactableSubject {
    #[must_use]
    pub const fn new(id: Uuid, reactions_counts: ReactionCounts) -> Self {
        Self {
            id,
            reactions_counts,
        }
    }

    /// Global node id for this subject.
    #[must_use]
    pub fn node_id(&self) -> String {
        node::encode(NodeType::Post, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_insertion_order() {
        let counts: ReactionCounts = [("🎉", 1), ("👍", 3), ("❤️", 2)].into_iter().collect();
        let keys: Vec<&str> = counts.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["🎉", "👍", "❤️"]);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let counts: ReactionCounts = [("👍", u64::MAX), ("❤️", 1)].into_iter().collect();
        assert_eq!(counts.total(), u64::MAX);
    }

    #[test]
    fn subject_node_id_is_a_post() {
        let subject = ReactableSubject::new(Uuid::from_u128(7), ReactionCounts::new());
        assert_eq!(
            node::decode(&subject.node_id()).unwrap(),
            (NodeType::Post, Uuid::from_u128(7))
        );
    }

    #[test]
    fn reinserting_a_key_keeps_its_position() {
        let mut counts = ReactionCounts::new();
        counts.insert("a", 1);
        counts.insert("b", 1);
        assert_eq!(counts.insert("a", 5), Some(1));

        let entries: Vec<(&str, u64)> = counts.iter().collect();
        assert_eq!(entries, [("a", 5), ("b", 1)]);
    }

    #[test]
    fn counts_json_roundtrip_preserves_order() {
        let json = r#"{"👀":4,"2b1a4b3c-6a8e-4f2e-9a55-0c1c5e3b7d11":1,"🙏":0}"#;
        let counts: ReactionCounts = serde_json::from_str(json).unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(serde_json::to_string(&counts).unwrap(), json);
    }

    #[test]
    fn subject_defaults_to_empty_counts() {
        let subject: ReactableSubject =
            serde_json::from_str(r#"{"id":"2b1a4b3c-6a8e-4f2e-9a55-0c1c5e3b7d11"}"#).unwrap();
        assert!(subject.reactions_counts.is_empty());
    }
}

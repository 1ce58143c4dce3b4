//! Bulk loading of a JSON dataset into the SQLite store.
//!
//! A dataset is a snapshot: actors, custom emoji, subjects with their cached
//! count maps, and reaction records. Loading does not derive or reconcile
//! counts; each subject's `reactions_counts` is stored exactly as given.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::model::{Actor, CustomEmoji, ReactableSubject, Reaction};

/// Everything needed to populate a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub custom_emojis: Vec<CustomEmoji>,
    #[serde(default)]
    pub subjects: Vec<ReactableSubject>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Dataset {
    /// Read a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Row counts written by [`import_dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub actors: usize,
    pub custom_emojis: usize,
    pub subjects: usize,
    pub reactions: usize,
    /// Reaction rows already present for the same (subject, actor, symbol).
    pub duplicate_reactions: usize,
}

/// Load `dataset` in a single transaction.
///
/// Actors, custom emoji and subjects are upserted by id. Reaction rows that
/// already exist are skipped and counted in
/// [`ImportStats::duplicate_reactions`].
///
/// # Errors
///
/// Returns an error if any record is invalid or a write fails; nothing is
/// committed in that case.
pub fn import_dataset(conn: &mut Connection, dataset: &Dataset) -> Result<ImportStats> {
    let tx = conn.transaction().context("begin import transaction")?;
    let mut stats = ImportStats::default();

    for actor in &dataset.actors {
        validate_iri(&actor.iri).with_context(|| format!("actor {}", actor.id))?;
        tx.execute(
            "INSERT INTO actors (actor_id, username, name, iri) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(actor_id) DO UPDATE SET \
             username = excluded.username, name = excluded.name, iri = excluded.iri",
            params![actor.id.to_string(), actor.username, actor.name, actor.iri],
        )
        .with_context(|| format!("insert actor {}", actor.id))?;
        stats.actors += 1;
    }

    for emoji in &dataset.custom_emojis {
        validate_iri(&emoji.iri).with_context(|| format!("custom emoji {}", emoji.id))?;
        tx.execute(
            "INSERT INTO custom_emojis (custom_emoji_id, name, image_url, iri) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(custom_emoji_id) DO UPDATE SET \
             name = excluded.name, image_url = excluded.image_url, iri = excluded.iri",
            params![emoji.id.to_string(), emoji.name, emoji.image_url, emoji.iri],
        )
        .with_context(|| format!("insert custom emoji {}", emoji.id))?;
        stats.custom_emojis += 1;
    }

    let now_us = chrono::Utc::now().timestamp_micros();
    for subject in &dataset.subjects {
        let counts = serde_json::to_string(&subject.reactions_counts)
            .with_context(|| format!("serialize counts for subject {}", subject.id))?;
        tx.execute(
            "INSERT INTO subjects (subject_id, reactions_counts, updated_at_us) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT(subject_id) DO UPDATE SET \
             reactions_counts = excluded.reactions_counts, updated_at_us = excluded.updated_at_us",
            params![subject.id.to_string(), counts, now_us],
        )
        .with_context(|| format!("insert subject {}", subject.id))?;
        stats.subjects += 1;
    }

    for reaction in &dataset.reactions {
        if reaction.symbol_key().is_none() {
            bail!(
                "reaction by {} on {} must set exactly one of emoji and custom_emoji_id",
                reaction.actor_id,
                reaction.subject_id
            );
        }

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO reactions \
                 (subject_id, actor_id, emoji, custom_emoji_id, created_at_us) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    reaction.subject_id.to_string(),
                    reaction.actor_id.to_string(),
                    reaction.emoji,
                    reaction.custom_emoji_id.map(|id| id.to_string()),
                    reaction.created_at.timestamp_micros(),
                ],
            )
            .with_context(|| {
                format!(
                    "insert reaction by {} on {}",
                    reaction.actor_id, reaction.subject_id
                )
            })?;

        if inserted == 0 {
            debug!(
                subject = %reaction.subject_id,
                actor = %reaction.actor_id,
                "skipping duplicate reaction"
            );
            stats.duplicate_reactions += 1;
        } else {
            stats.reactions += 1;
        }
    }

    tx.execute(
        "UPDATE store_meta SET last_import_at_us = ?1 WHERE id = 1",
        params![now_us],
    )
    .context("update store_meta")?;
    tx.commit().context("commit import transaction")?;

    info!(
        actors = stats.actors,
        custom_emojis = stats.custom_emojis,
        subjects = stats.subjects,
        reactions = stats.reactions,
        duplicates = stats.duplicate_reactions,
        "dataset imported"
    );
    Ok(stats)
}

/// An IRI must carry a scheme (`scheme:rest`) to be resolvable.
fn validate_iri(iri: &str) -> Result<()> {
    let Some((scheme, rest)) = iri.split_once(':') else {
        bail!("IRI '{iri}' has no scheme");
    };

    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if !scheme_ok || rest.is_empty() {
        bail!("IRI '{iri}' is not absolute");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReactionCounts;
    use crate::store::sqlite::{migrations, query};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn test_db() -> Connection {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        migrations::migrate(&mut conn).expect("migrate");
        conn
    }

    fn dataset() -> Dataset {
        let subject = Uuid::from_u128(1);
        let actor = Uuid::from_u128(2);
        let emoji = Uuid::from_u128(3);
        let counts: ReactionCounts = [("👍".to_string(), 1), (emoji.to_string(), 1)]
            .into_iter()
            .collect();

        Dataset {
            actors: vec![Actor {
                id: actor,
                username: "alice".into(),
                name: Some("Alice".into()),
                iri: "https://example.com/@alice".into(),
            }],
            custom_emojis: vec![CustomEmoji {
                id: emoji,
                name: ":party:".into(),
                image_url: "https://cdn.example.com/party.png".into(),
                iri: "https://example.com/emojis/party".into(),
            }],
            subjects: vec![ReactableSubject::new(subject, counts)],
            reactions: vec![
                Reaction {
                    subject_id: subject,
                    actor_id: actor,
                    emoji: Some("👍".into()),
                    custom_emoji_id: None,
                    created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                },
                Reaction {
                    subject_id: subject,
                    actor_id: actor,
                    emoji: None,
                    custom_emoji_id: Some(emoji),
                    created_at: Utc.timestamp_opt(1_700_000_001, 0).unwrap(),
                },
            ],
        }
    }

    #[test]
    fn import_writes_all_records() {
        let mut conn = test_db();
        let stats = import_dataset(&mut conn, &dataset()).unwrap();

        assert_eq!(
            stats,
            ImportStats {
                actors: 1,
                custom_emojis: 1,
                subjects: 1,
                reactions: 2,
                duplicate_reactions: 0,
            }
        );

        let subject = query::get_subject(&conn, Uuid::from_u128(1)).unwrap().unwrap();
        assert_eq!(subject.reactions_counts.len(), 2);
        assert!(query::get_custom_emoji(&conn, Uuid::from_u128(3)).unwrap().is_some());
    }

    #[test]
    fn reimport_skips_duplicate_reactions() {
        let mut conn = test_db();
        import_dataset(&mut conn, &dataset()).unwrap();
        let stats = import_dataset(&mut conn, &dataset()).unwrap();

        assert_eq!(stats.reactions, 0);
        assert_eq!(stats.duplicate_reactions, 2);
    }

    #[test]
    fn reaction_without_symbol_aborts_import() {
        let mut conn = test_db();
        let mut data = dataset();
        data.reactions[0].emoji = None;

        assert!(import_dataset(&mut conn, &data).is_err());
        let actors: i64 = conn
            .query_row("SELECT COUNT(*) FROM actors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(actors, 0, "failed import must not leave partial rows");
    }

    #[test]
    fn relative_iri_is_rejected() {
        let mut conn = test_db();
        let mut data = dataset();
        data.custom_emojis[0].iri = "/emojis/party".into();
        assert!(import_dataset(&mut conn, &data).is_err());
    }

    #[test]
    fn validate_iri_accepts_common_schemes() {
        for iri in ["https://example.com/a", "http://x", "tag:example.com,2024:emoji"] {
            assert!(validate_iri(iri).is_ok(), "{iri}");
        }
        for iri in ["", "example.com", "1http://x", "https:"] {
            assert!(validate_iri(iri).is_err(), "{iri}");
        }
    }
}

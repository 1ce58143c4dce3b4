//! `SQLite` read queries behind the store traits.
//!
//! All functions take a shared `&Connection` and return typed structs
//! (never raw rows).

use anyhow::{Context, Result};
use rusqlite::{Connection, params, params_from_iter, types::Type};
use uuid::Uuid;

use crate::group::SymbolFilter;
use crate::model::{Actor, CustomEmoji, ReactableSubject, ReactionCounts};
use crate::pagination::Direction;
use crate::pagination::cursor::CursorKey;
use crate::store::{ReactionQuery, ReactorRow};

// ---------------------------------------------------------------------------
// Reactor pages
// ---------------------------------------------------------------------------

/// Fetch one window of reactors for a group filter.
///
/// Rows are ordered by `(created_at_us, actor_id)`, ascending for forward
/// windows and descending for backward ones, and limited to
/// `window.fetch_limit()`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_reactors(conn: &Connection, query: &ReactionQuery) -> Result<Vec<ReactorRow>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    param_values.push(Box::new(query.filter.subject_id.to_string()));
    conditions.push(format!("r.subject_id = ?{}", param_values.len()));

    match &query.filter.symbol {
        SymbolFilter::Emoji(emoji) => {
            param_values.push(Box::new(emoji.clone()));
            conditions.push(format!("r.emoji = ?{}", param_values.len()));
        }
        SymbolFilter::CustomEmojiId(id) => {
            param_values.push(Box::new(id.to_string()));
            conditions.push(format!("r.custom_emoji_id = ?{}", param_values.len()));
        }
    }

    let window = &query.window;
    let (cmp, order) = match window.direction {
        Direction::Forward => (">", "ASC"),
        Direction::Backward => ("<", "DESC"),
    };

    if let Some(boundary) = window.boundary {
        param_values.push(Box::new(boundary.created_at_us));
        let created = param_values.len();
        param_values.push(Box::new(boundary.actor_id.to_string()));
        let actor = param_values.len();
        conditions.push(format!(
            "(r.created_at_us {cmp} ?{created} \
             OR (r.created_at_us = ?{created} AND r.actor_id {cmp} ?{actor}))"
        ));
    }

    let sql = format!(
        "SELECT r.created_at_us, a.actor_id, a.username, a.name, a.iri \
         FROM reactions r \
         INNER JOIN actors a ON a.actor_id = r.actor_id \
         WHERE {} \
         ORDER BY r.created_at_us {order}, r.actor_id {order} \
         LIMIT {}",
        conditions.join(" AND "),
        window.fetch_limit()
    );

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("prepare find_reactors query: {sql}"))?;

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(AsRef::as_ref).collect();

    let rows = stmt
        .query_map(params_from_iter(params_ref), |row| {
            let actor = Actor {
                id: uuid_column(row, 1)?,
                username: row.get(2)?,
                name: row.get(3)?,
                iri: row.get(4)?,
            };
            Ok(ReactorRow {
                key: CursorKey::new(row.get(0)?, actor.id),
                actor,
            })
        })
        .context("execute find_reactors query")?;

    let mut reactors = Vec::new();
    for row in rows {
        reactors.push(row.context("read find_reactors row")?);
    }
    Ok(reactors)
}

/// Count live reaction records matching a group filter.
///
/// Diagnostic only; reactor pages report the subject's cached count.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_reactions(conn: &Connection, subject_id: Uuid, symbol: &SymbolFilter) -> Result<u64> {
    let (sql, value) = match symbol {
        SymbolFilter::Emoji(emoji) => (
            "SELECT COUNT(*) FROM reactions WHERE subject_id = ?1 AND emoji = ?2",
            emoji.clone(),
        ),
        SymbolFilter::CustomEmojiId(id) => (
            "SELECT COUNT(*) FROM reactions WHERE subject_id = ?1 AND custom_emoji_id = ?2",
            id.to_string(),
        ),
    };

    let count: i64 = conn
        .query_row(sql, params![subject_id.to_string(), value], |row| row.get(0))
        .context("execute count_reactions")?;
    Ok(u64::try_from(count).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Point lookups
// ---------------------------------------------------------------------------

/// Fetch a custom emoji by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_custom_emoji(conn: &Connection, id: Uuid) -> Result<Option<CustomEmoji>> {
    let sql = "SELECT custom_emoji_id, name, image_url, iri \
               FROM custom_emojis WHERE custom_emoji_id = ?1";

    let result = conn.query_row(sql, params![id.to_string()], |row| {
        Ok(CustomEmoji {
            id: uuid_column(row, 0)?,
            name: row.get(1)?,
            image_url: row.get(2)?,
            iri: row.get(3)?,
        })
    });

    match result {
        Ok(emoji) => Ok(Some(emoji)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_custom_emoji for '{id}'")),
    }
}

/// Fetch a reactable subject with its cached count map.
///
/// # Errors
///
/// Returns an error if the query fails or the stored count map is not a
/// JSON object of non-negative integers.
pub fn get_subject(conn: &Connection, id: Uuid) -> Result<Option<ReactableSubject>> {
    let sql = "SELECT subject_id, reactions_counts FROM subjects WHERE subject_id = ?1";

    let result = conn.query_row(sql, params![id.to_string()], |row| {
        let raw: String = row.get(1)?;
        let reactions_counts: ReactionCounts = serde_json::from_str(&raw).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
        })?;
        Ok(ReactableSubject {
            id: uuid_column(row, 0)?,
            reactions_counts,
        })
    });

    match result {
        Ok(subject) => Ok(Some(subject)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_subject for '{id}'")),
    }
}

/// Read the schema version recorded in `store_meta`.
///
/// # Errors
///
/// Returns an error if the query fails or no `store_meta` row exists.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version: i64 = conn
        .query_row(
            "SELECT schema_version FROM store_meta WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .context("read store schema version")?;
    u32::try_from(version).context("schema version out of range")
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::try_parse(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

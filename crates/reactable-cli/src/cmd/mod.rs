//! Subcommand handlers.
//!
//! Every handler that reads the store goes through [`Project`], which loads
//! `.reactable/config.toml` and opens the database, reporting a coded error
//! when the store is missing or unreadable.

pub mod emoji;
pub mod groups;
pub mod import;
pub mod init;
pub mod reactors;

use crate::output::{CliError, OutputMode, report};
use reactable_core::config::{ProjectConfig, load_project_config};
use reactable_core::error::{ErrorCode, ReactionError};
use reactable_core::model::ReactableSubject;
use reactable_core::model::node::{self, NodeType};
use reactable_core::store::SubjectStore;
use reactable_core::store::sqlite::{SqliteStore, try_open_store};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A project root with its loaded configuration.
#[derive(Debug)]
pub struct Project {
    pub config: ProjectConfig,
    pub db_path: PathBuf,
}

impl Project {
    /// Load project config, with `--db` taking precedence over `[store] path`.
    ///
    /// # Errors
    ///
    /// Reports an error if the config file is malformed.
    pub fn load(root: &Path, db_override: Option<&Path>, output: OutputMode) -> anyhow::Result<Self> {
        let config = match load_project_config(root) {
            Ok(config) => config,
            Err(e) => {
                return report(
                    output,
                    CliError::coded(ErrorCode::ConfigParseError, format!("{e:#}")),
                );
            }
        };
        let db_path = db_override.map_or_else(|| config.store_path(root), Path::to_path_buf);
        Ok(Self { config, db_path })
    }

    /// Open the existing store.
    ///
    /// # Errors
    ///
    /// Reports an error if the store is missing or corrupt.
    pub fn open_store(&self, output: OutputMode) -> anyhow::Result<SqliteStore> {
        if let Some(conn) = try_open_store(&self.db_path)? {
            return Ok(SqliteStore::new(conn));
        }

        let (code, message) = if self.db_path.exists() {
            (ErrorCode::CorruptStore, "reaction store is unreadable")
        } else {
            (ErrorCode::NotInitialized, "reaction store not found")
        };
        report(
            output,
            CliError::coded(code, format!("{message}: {}", self.db_path.display())),
        )
    }
}

/// Render a resolution error and fail the command.
pub fn fail<T>(output: OutputMode, err: ReactionError) -> anyhow::Result<T> {
    report(output, CliError::from(&err))
}

/// Parse a raw UUID or global node id of the expected type.
///
/// # Errors
///
/// Reports an error for unparseable ids.
pub fn parse_node_arg(input: &str, expected: NodeType, output: OutputMode) -> anyhow::Result<Uuid> {
    match node::parse_id(input, expected) {
        Ok(id) => Ok(id),
        Err(e) => report(
            output,
            CliError::new(format!("invalid {expected} id '{input}': {e}")),
        ),
    }
}

/// Fetch a subject by id.
///
/// # Errors
///
/// Reports an error if the subject is missing or the lookup fails.
pub fn load_subject(
    store: &SqliteStore,
    id: Uuid,
    output: OutputMode,
) -> anyhow::Result<ReactableSubject> {
    match store.find_subject(id) {
        Ok(Some(subject)) => Ok(subject),
        Ok(None) => fail(output, ReactionError::SubjectNotFound { id }),
        Err(e) => fail(output, ReactionError::Store(e)),
    }
}

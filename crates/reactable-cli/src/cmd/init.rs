use crate::cmd::Project;
use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::{Context as _, Result};
use clap::Args;
use reactable_core::config::PROJECT_DIR;
use reactable_core::store::sqlite::{open_store, query};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.reactable/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[pagination]\n\
    default_page_size = 20\n\
    max_page_size = 100\n\
    \n\
    [store]\n\
    path = \".reactable/reactions.db\"\n";

const GITIGNORE: &str = "reactions.db\nreactions.db-wal\nreactions.db-shm\n";

#[derive(Debug, Serialize)]
struct InitReport {
    project_dir: PathBuf,
    db_path: PathBuf,
    schema_version: u32,
}

/// Execute `rx init`. Creates the project skeleton:
///
/// ```text
/// .reactable/
///   config.toml     (default project config)
///   .gitignore      (database files)
///   reactions.db    (migrated, empty store)
/// ```
///
/// The database goes to `--db` if given, else to the configured store path.
/// An existing `config.toml` is kept on `--force`.
///
/// # Errors
///
/// Returns an error if `.reactable/` already exists and `--force` is not
/// set, or if any filesystem or database operation fails.
pub fn run_init(
    args: &InitArgs,
    project_root: &Path,
    project: &Project,
    output: OutputMode,
) -> Result<()> {
    let project_dir = project_root.join(PROJECT_DIR);

    if project_dir.exists() && !args.force {
        anyhow::bail!(".reactable/ already exists. Use `rx init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let config_path = project_dir.join("config.toml");
    if !config_path.exists() {
        std::fs::write(&config_path, CONFIG_TOML)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }
    std::fs::write(project_dir.join(".gitignore"), GITIGNORE)
        .context("Failed to write .reactable/.gitignore")?;

    let db_path = project.db_path.clone();
    let conn = open_store(&db_path)?;
    let schema_version = query::schema_version(&conn)?;
    info!(db = %db_path.display(), schema_version, "reaction store initialized");

    let report = InitReport {
        project_dir,
        db_path,
        schema_version,
    };
    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "initialized {}", r.db_path.display()),
        |r, w| {
            writeln!(w, "Initialized reactable project")?;
            pretty_kv(w, "directory", r.project_dir.display().to_string())?;
            pretty_kv(w, "store", r.db_path.display().to_string())?;
            pretty_kv(w, "schema", format!("v{}", r.schema_version))
        },
    )
}

use crate::cmd::Project;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use reactable_core::store::sqlite::import::{Dataset, import_dataset};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON dataset with `actors`, `custom_emojis`, `subjects` and `reactions`.
    pub file: PathBuf,
}

/// Execute `rx import <file>`.
///
/// # Errors
///
/// Returns an error if the store is not initialized, the file is invalid,
/// or the import transaction fails.
pub fn run_import(args: &ImportArgs, project: &Project, output: OutputMode) -> Result<()> {
    let dataset = Dataset::from_path(&args.file)?;
    let mut store = project.open_store(output)?;
    let stats = import_dataset(store.connection_mut(), &dataset)?;

    render_mode(
        output,
        &stats,
        |s, w| {
            writeln!(
                w,
                "actors={} custom_emojis={} subjects={} reactions={} duplicates={}",
                s.actors, s.custom_emojis, s.subjects, s.reactions, s.duplicate_reactions
            )
        },
        |s, w| {
            pretty_section(w, &format!("Imported {}", args.file.display()))?;
            pretty_kv(w, "actors", s.actors.to_string())?;
            pretty_kv(w, "emoji", s.custom_emojis.to_string())?;
            pretty_kv(w, "subjects", s.subjects.to_string())?;
            pretty_kv(w, "reactions", s.reactions.to_string())?;
            if s.duplicate_reactions > 0 {
                pretty_kv(w, "duplicates", format!("{} skipped", s.duplicate_reactions))?;
            }
            Ok(())
        },
    )
}

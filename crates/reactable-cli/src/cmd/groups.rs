//! `rx groups`: a subject's reaction groups, resolved per kind.
//!
//! Field failures (a custom emoji missing from the registry, a reactor page
//! that could not be read) do not fail the command. They are listed in the
//! `errors` array in JSON mode and as warnings on stderr otherwise.

use crate::cmd::{Project, fail, parse_node_arg};
use crate::output::{OutputMode, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use reactable_core::model::node::NodeType;
use reactable_core::pagination::ConnectionArgs;
use reactable_core::resolve::GroupType;
use reactable_core::view::{
    GroupView, ResolveContext, ResolveOptions, Resolved, SubjectView, SymbolView,
    resolve_subject_by_id,
};
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Subject UUID or global node id.
    pub subject: String,

    /// Include the first N reactors of every group.
    #[arg(long, value_name = "N")]
    pub reactors: Option<u32>,

    /// Only show groups of this type (`emoji` or `custom_emoji`).
    #[arg(long = "type", value_name = "TYPE")]
    pub group_type: Option<GroupType>,
}

/// Execute `rx groups <subject>`.
///
/// # Errors
///
/// Returns an error if the subject id is invalid, the store is unavailable,
/// or the subject does not exist.
pub fn run_groups(args: &GroupsArgs, project: &Project, output: OutputMode) -> Result<()> {
    let id = parse_node_arg(&args.subject, NodeType::Post, output)?;
    let store = project.open_store(output)?;

    let ctx = ResolveContext {
        reactions: &store,
        registry: &store,
        limits: project.config.pagination,
    };
    let options = ResolveOptions {
        reactors: args.reactors.map(ConnectionArgs::first),
        group_type: args.group_type,
    };

    let resolved = match resolve_subject_by_id(id, &store, &ctx, &options) {
        Ok(resolved) => resolved,
        Err(e) => return fail(output, e),
    };

    render_mode(
        output,
        &resolved,
        |r, w| render_text(&r.data, w),
        |r, w| render_pretty(&r.data, w),
    )?;

    if !output.is_json() {
        report_field_failures(&resolved)?;
    }
    Ok(())
}

fn symbol_label(group: &GroupView) -> String {
    match &group.symbol {
        SymbolView::Emoji { emoji } => emoji.clone(),
        SymbolView::Custom {
            custom_emoji: Some(emoji),
            ..
        } => emoji.name.clone(),
        SymbolView::Custom {
            custom_emoji_id, ..
        } => custom_emoji_id.to_string(),
    }
}

fn render_text(view: &SubjectView, w: &mut dyn Write) -> io::Result<()> {
    if view.reaction_groups.is_empty() {
        return Ok(());
    }
    writeln!(w, "type  symbol  count  reactors")?;
    for group in &view.reaction_groups {
        let reactors = group.reactors.as_ref().map_or_else(String::new, |page| {
            page.nodes()
                .map(|actor| actor.username.as_str())
                .collect::<Vec<_>>()
                .join(",")
        });
        writeln!(
            w,
            "{}  {}  {}  {}",
            group.group_type,
            symbol_label(group),
            group.count,
            reactors
        )?;
    }
    Ok(())
}

fn render_pretty(view: &SubjectView, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!("Subject {} ({} reactions)", view.id, view.total),
    )?;
    if view.reaction_groups.is_empty() {
        return writeln!(w, "no reactions");
    }

    for group in &view.reaction_groups {
        let kind = match &group.symbol {
            SymbolView::Emoji { .. } => "emoji".to_string(),
            SymbolView::Custom {
                custom_emoji_id,
                custom_emoji,
            } => {
                let missing = if custom_emoji.is_none() { " (missing)" } else { "" };
                format!("custom {custom_emoji_id}{missing}")
            }
        };
        writeln!(w, "{:<20} {:>6}  {kind}", symbol_label(group), group.count)?;

        if let Some(page) = &group.reactors {
            let names: Vec<String> = page.nodes().map(|actor| actor.display_name()).collect();
            let more = if page.page_info.has_next_page { ", ..." } else { "" };
            writeln!(w, "    by {}{more}", names.join(", "))?;
        }
    }
    Ok(())
}

fn report_field_failures(resolved: &Resolved<SubjectView>) -> io::Result<()> {
    let stderr = io::stderr();
    let mut err = stderr.lock();
    for failure in &resolved.errors {
        writeln!(
            err,
            "warning[{}]: {}: {}",
            failure.code, failure.path, failure.message
        )?;
    }
    Ok(())
}
